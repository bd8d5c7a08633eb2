//! Ingredient tokens: a name with an optional amount and unit packed into a
//! single text field.
//!
//! Stored form is `name` or `name|amount|unit`. User input may also use
//! `name:amount:unit`; that form is normalized to pipes and never written.

use std::fmt;

use serde::Serialize;

use crate::numeric::lenient_amount;

pub const STORED_SEPARATOR: char = '|';
pub const INPUT_SEPARATOR: char = ':';
/// Separator between tokens inside a recipe's ingredients column.
pub const LIST_SEPARATOR: char = ';';

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IngredientToken {
    NameOnly {
        name: String,
    },
    Measured {
        name: String,
        amount: String,
        unit: String,
    },
}

impl IngredientToken {
    pub fn name_only(name: impl Into<String>) -> Self {
        IngredientToken::NameOnly { name: name.into() }
    }

    pub fn measured(
        name: impl Into<String>,
        amount: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        IngredientToken::Measured {
            name: name.into(),
            amount: amount.into(),
            unit: unit.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            IngredientToken::NameOnly { name } | IngredientToken::Measured { name, .. } => name,
        }
    }

    #[must_use]
    pub fn amount(&self) -> &str {
        match self {
            IngredientToken::NameOnly { .. } => "",
            IngredientToken::Measured { amount, .. } => amount,
        }
    }

    #[must_use]
    pub fn unit(&self) -> &str {
        match self {
            IngredientToken::NameOnly { .. } => "",
            IngredientToken::Measured { unit, .. } => unit,
        }
    }

    /// The amount as a number, for comparisons only. Empty or unparsable
    /// amounts read as zero.
    #[must_use]
    pub fn numeric_amount(&self) -> f64 {
        lenient_amount(self.amount())
    }

    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            IngredientToken::NameOnly { name } => name.clone(),
            IngredientToken::Measured { name, amount, unit } => {
                format!("{name}{STORED_SEPARATOR}{amount}{STORED_SEPARATOR}{unit}")
            }
        }
    }

    /// Decode a persisted token. Only the pipe form is recognized, so a
    /// stored name containing colons survives untouched.
    #[must_use]
    pub fn decode_stored(text: &str) -> Self {
        split_triple(text, STORED_SEPARATOR)
            .map_or_else(|| Self::name_only(text.trim()), Self::from_parts)
    }

    /// Decode user input: pipe form first, then the colon form, else the
    /// whole trimmed text is the name.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        split_triple(text, STORED_SEPARATOR)
            .or_else(|| split_triple(text, INPUT_SEPARATOR))
            .map_or_else(|| Self::name_only(text.trim()), Self::from_parts)
    }

    fn from_parts((name, amount, unit): (&str, &str, &str)) -> Self {
        Self::measured(name.trim(), amount.trim(), unit.trim())
    }
}

impl fmt::Display for IngredientToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngredientToken::NameOnly { name } => write!(f, "{name}"),
            IngredientToken::Measured { name, amount, unit } => match (amount.is_empty(), unit.is_empty()) {
                (false, false) => write!(f, "{name} ({amount} {unit})"),
                (false, true) => write!(f, "{name} ({amount})"),
                (true, false) => write!(f, "{name} ({unit})"),
                (true, true) => write!(f, "{name}"),
            },
        }
    }
}

/// Split at the first separator and the next one after it.
fn split_triple(text: &str, sep: char) -> Option<(&str, &str, &str)> {
    let (name, rest) = text.split_once(sep)?;
    let (amount, unit) = rest.split_once(sep)?;
    Some((name, amount, unit))
}

/// Split free-text input on commas into tokens. Not quote-aware.
#[must_use]
pub fn parse_list(input: &str) -> Vec<IngredientToken> {
    input
        .split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(IngredientToken::parse)
        .collect()
}

/// Join tokens into the single ingredients column of a recipe row.
#[must_use]
pub fn encode_list(tokens: &[IngredientToken]) -> String {
    tokens
        .iter()
        .map(IngredientToken::encode)
        .collect::<Vec<_>>()
        .join(&LIST_SEPARATOR.to_string())
}

/// Split a recipe's ingredients column back into tokens, dropping empties.
#[must_use]
pub fn decode_list(field: &str) -> Vec<IngredientToken> {
    field
        .split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(IngredientToken::decode_stored)
        .collect()
}
