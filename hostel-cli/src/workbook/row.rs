//! Row records and cell scalars produced from worksheet ranges

use std::collections::HashMap;
use std::fmt;

use calamine::Data;
use serde::{Serialize, Serializer};
use serde_json::{Value, json};

/// A single non-empty cell value
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// Convert a calamine cell. Empty and error cells have no value.
    ///
    /// Date-typed cells surface as their serial day number, the same way the
    /// sheet stores them.
    pub fn from_data(data: &Data) -> Option<Self> {
        match data {
            Data::Empty | Data::Error(_) => None,
            Data::String(s) => Some(Self::Text(s.clone())),
            Data::Int(i) => Some(Self::Number(*i as f64)),
            Data::Float(f) => Some(Self::Number(*f)),
            Data::Bool(b) => Some(Self::Bool(*b)),
            Data::DateTime(dt) => Some(Self::Number(dt.as_f64())),
            Data::DateTimeIso(s) => Some(Self::Text(s.clone())),
            Data::DurationIso(s) => Some(Self::Text(s.clone())),
        }
    }

    /// Whether the value counts as "present" for blank checks
    /// (non-empty text, non-zero number, `true`).
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Text(s) => !s.is_empty(),
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Bool(b) => *b,
        }
    }

    /// Numeric reading of the cell.
    ///
    /// Text is trimmed and parsed; blank text reads as zero. Returns `None`
    /// when the text is not a finite number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Number(_) => None,
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Some(0.0);
                }
                trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
            }
        }
    }

    /// The text content, if this is a text cell
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(s) => Value::String(s.clone()),
            Self::Number(n) => {
                // Whole numbers stay integers in the stored document
                if n.fract() == 0.0 && n.abs() < 9.0e15 {
                    json!(*n as i64)
                } else {
                    json!(*n)
                }
            }
            Self::Bool(b) => Value::Bool(*b),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{}", s),
            Self::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 9.0e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Self::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// One data row keyed by column label
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowRecord {
    /// 1-based row number in the source sheet
    pub line: usize,
    cells: HashMap<String, CellValue>,
}

impl RowRecord {
    pub fn new(line: usize) -> Self {
        Self {
            line,
            cells: HashMap::new(),
        }
    }

    /// Build a record from `(label, value)` pairs
    pub fn from_pairs<I, K>(line: usize, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, CellValue)>,
        K: Into<String>,
    {
        let mut record = Self::new(line);
        for (label, value) in pairs {
            record.insert(label, value);
        }
        record
    }

    pub fn insert(&mut self, label: impl Into<String>, value: CellValue) {
        self.cells.insert(label.into(), value);
    }

    pub fn get(&self, label: &str) -> Option<&CellValue> {
        self.cells.get(label)
    }

    /// Rendered text of a truthy cell; blank cells read as `None`
    pub fn text(&self, label: &str) -> Option<String> {
        self.get(label)
            .filter(|value| value.is_truthy())
            .map(|value| value.to_string())
    }

    /// Numeric value of a cell, zero when absent or non-numeric
    pub fn number_or_zero(&self, label: &str) -> f64 {
        self.get(label).and_then(CellValue::as_number).unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
