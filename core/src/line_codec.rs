//! One table row ⇄ one text line.
//!
//! Encoding is plain comma-separated with necessary quoting: a field holding
//! `,`, `"`, `\n` or `\r` is wrapped in quotes with inner quotes doubled.
//!
//! Decoding is deliberately looser than RFC 4180. A `"` anywhere toggles the
//! quoted state (a doubled `""` inside quotes is a literal quote), an
//! unterminated quote closes at end of line, and only the last field on the
//! line is whitespace-trimmed.
//!
//! A quoted field may hold a line break, so a file is cut into records with
//! [`split_records`] before each record is decoded.

/// A decoded row: the ordered text fields of one line.
pub type Row = Vec<String>;

#[must_use]
pub fn encode_row(fields: &[String]) -> String {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    let encoded = wtr
        .write_record(fields)
        .ok()
        .and_then(|()| wtr.into_inner().ok())
        .and_then(|bytes| String::from_utf8(bytes).ok());

    match encoded {
        Some(line) => line.trim_end_matches(['\r', '\n']).to_string(),
        None => encode_row_fallback(fields),
    }
}

// In-memory writes into a Vec cannot fail, but keep a direct encoder so the
// signature stays infallible.
fn encode_row_fallback(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| {
            if needs_quoting(f) {
                format!("\"{}\"", f.replace('"', "\"\""))
            } else {
                f.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn needs_quoting(field: &str) -> bool {
    field.contains([',', '"', '\n', '\r'])
}

#[must_use]
pub fn decode_line(line: &str) -> Row {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field.trim().to_string());
    fields
}

/// Cut file content into records. A `\n` inside quotes belongs to the field;
/// outside quotes it ends the record, and a `\r` right before it is dropped.
#[must_use]
pub fn split_records(text: &str) -> Vec<&str> {
    let mut records = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    for (idx, byte) in text.bytes().enumerate() {
        match byte {
            b'"' => in_quotes = !in_quotes,
            b'\n' if !in_quotes => {
                let record = &text[start..idx];
                records.push(record.strip_suffix('\r').unwrap_or(record));
                start = idx + 1;
            }
            _ => {}
        }
    }
    if start < text.len() {
        records.push(&text[start..]);
    }
    records
}

/// True for the `[""]` row an empty or whitespace-only line decodes to.
#[must_use]
pub fn is_blank(row: &[String]) -> bool {
    row.len() == 1 && row[0].is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Row {
        fields.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_encode_plain_fields() {
        assert_eq!(encode_row(&row(&["1", "Flour", "2", "cup"])), "1,Flour,2,cup");
    }

    #[test]
    fn test_encode_quotes_special_fields() {
        assert_eq!(
            encode_row(&row(&["1", "Salt, coarse", "say \"hi\""])),
            "1,\"Salt, coarse\",\"say \"\"hi\"\"\""
        );
        assert_eq!(encode_row(&row(&["a\rb"])), "\"a\rb\"");
    }

    #[test]
    fn test_encode_keeps_pipes_and_semicolons_bare() {
        assert_eq!(
            encode_row(&row(&["1", "Cake", "flour|2|cups;egg", "Mix"])),
            "1,Cake,flour|2|cups;egg,Mix"
        );
    }

    #[test]
    fn test_decode_quoted_fields() {
        assert_eq!(
            decode_line("1,\"Salt, coarse\",\"say \"\"hi\"\"\""),
            row(&["1", "Salt, coarse", "say \"hi\""])
        );
    }

    #[test]
    fn test_decode_trims_only_last_field() {
        assert_eq!(decode_line(" a , b , c "), row(&[" a ", " b ", "c"]));
    }

    #[test]
    fn test_decode_unterminated_quote_closes_at_end() {
        assert_eq!(decode_line("1,\"open, field"), row(&["1", "open, field"]));
    }

    #[test]
    fn test_decode_bare_quotes_toggle() {
        assert_eq!(decode_line("a\"b,c\"d,e"), row(&["ab,cd", "e"]));
    }

    #[test]
    fn test_decode_empty_line() {
        let decoded = decode_line("");
        assert_eq!(decoded, row(&[""]));
        assert!(is_blank(&decoded));
        assert!(is_blank(&decode_line("   ")));
        assert!(!is_blank(&decode_line(",")));
    }

    #[test]
    fn test_round_trip_awkward_fields() {
        let original = row(&["3", "Mac, \"cheesy\"", "a|b:c", "Boil; drain, serve"]);
        assert_eq!(decode_line(&encode_row(&original)), original);
    }

    #[test]
    fn test_split_records_keeps_quoted_line_breaks() {
        let text = "1,Soup,\"Boil.\nServe.\"\r\n2,Stew,\"a\r\nb\"\n\n3,Tea,Steep";
        assert_eq!(
            split_records(text),
            vec!["1,Soup,\"Boil.\nServe.\"", "2,Stew,\"a\r\nb\"", "", "3,Tea,Steep"]
        );
        assert!(split_records("").is_empty());
        assert_eq!(split_records("a\nb\n"), vec!["a", "b"]);
    }

    #[test]
    fn test_multiline_field_round_trips_through_records() {
        let original = row(&["1", "Soup", "water|1|l", "Boil.\nServe,\r\n \"hot\""]);
        let text = format!("{}\n", encode_row(&original));
        let records = split_records(&text);
        assert_eq!(records.len(), 1);
        assert_eq!(decode_line(records[0]), original);
    }
}
