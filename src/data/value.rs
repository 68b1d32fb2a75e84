//! Cell values and column type inference for interaction tables.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Tokens treated as "no value" when reading delimited files.
const MISSING_TOKENS: &[&str] = &["", "NA", "na", "NaN", "nan", "None"];

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    /// Numeric value.
    Number(f64),
    /// Free text.
    Text(String),
    /// Missing value.
    Missing,
}

impl CellValue {
    /// Check if this is a missing value.
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// Try to get as f64.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Parse a raw field according to a column type.
    ///
    /// Fields that fail to parse as numbers in a numeric column become
    /// [`CellValue::Missing`].
    pub fn parse(raw: &str, column_type: ColumnType) -> Self {
        let trimmed = raw.trim();
        if is_missing_token(trimmed) {
            return CellValue::Missing;
        }
        match column_type {
            ColumnType::Numeric => trimmed
                .parse::<f64>()
                .map(CellValue::Number)
                .unwrap_or(CellValue::Missing),
            ColumnType::Text => CellValue::Text(trimmed.to_string()),
        }
    }

    /// Ordering used by grid sorting: numbers numerically, text
    /// case-insensitively, missing values after everything else.
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CellValue::Missing, CellValue::Missing) => Ordering::Equal,
            (CellValue::Missing, _) => Ordering::Greater,
            (_, CellValue::Missing) => Ordering::Less,
            (CellValue::Number(a), CellValue::Number(b)) => a.total_cmp(b),
            (CellValue::Text(a), CellValue::Text(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
            (CellValue::Number(_), CellValue::Text(_)) => Ordering::Less,
            (CellValue::Text(_), CellValue::Number(_)) => Ordering::Greater,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(v) => write!(f, "{}", v),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Missing => Ok(()),
        }
    }
}

/// Declared type of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Numeric,
    Text,
}

impl ColumnType {
    /// Infer a column type from raw fields.
    ///
    /// A column is numeric when at least one field is present and every
    /// present field parses as a number.
    pub fn infer<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut any_present = false;
        for raw in fields {
            let v = raw.trim();
            if is_missing_token(v) {
                continue;
            }
            any_present = true;
            if v.parse::<f64>().is_err() {
                return ColumnType::Text;
            }
        }
        if any_present {
            ColumnType::Numeric
        } else {
            ColumnType::Text
        }
    }
}

/// Whether a trimmed field is one of the recognised missing-value tokens.
pub fn is_missing_token(field: &str) -> bool {
    MISSING_TOKENS.contains(&field)
}
