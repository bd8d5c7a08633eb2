//! Best-effort numeric parsing for text columns.
//!
//! Ids and quantities are stored as text. A field that does not parse never
//! aborts a table operation: it reads as zero. A leading numeric prefix is
//! accepted, so `"12abc"` reads as 12 and `"1.5kg"` as 1.5.

/// Parse an id column. Unparsable text reads as `0`.
#[must_use]
pub fn lenient_id(text: &str) -> i64 {
    let s = text.trim();
    if let Ok(v) = s.parse::<i64>() {
        return v;
    }
    let end = numeric_prefix_len(s, false);
    s[..end].parse().unwrap_or(0)
}

/// Parse a quantity or amount. Unparsable text reads as `0.0`.
#[must_use]
pub fn lenient_amount(text: &str) -> f64 {
    let s = text.trim();
    if let Ok(v) = s.parse::<f64>() {
        if v.is_finite() {
            return v;
        }
        return 0.0;
    }
    let end = numeric_prefix_len(s, true);
    s[..end].parse().unwrap_or(0.0)
}

/// Render a quantity the way it is stored: at most six decimals, trailing
/// zeros dropped, never `-0`.
#[must_use]
pub fn format_quantity(value: f64) -> String {
    let fixed = format!("{value:.6}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

fn numeric_prefix_len(s: &str, allow_fraction: bool) -> usize {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => end += 1,
            b'.' if allow_fraction && !seen_dot => {
                seen_dot = true;
                end += 1;
            }
            _ => break,
        }
    }
    end
}
