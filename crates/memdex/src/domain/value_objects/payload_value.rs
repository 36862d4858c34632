//! PayloadValue - Loosely typed payload scalar

use serde::{Deserialize, Serialize};

/// A payload value: string, number, boolean or list of strings.
///
/// Integers are carried as `Number` so a value written as `1` reads back
/// equal to the record that was stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayloadValue {
    Bool(bool),
    Number(f64),
    String(String),
    StringArray(Vec<String>),
}

impl PayloadValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PayloadValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PayloadValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PayloadValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl std::fmt::Display for PayloadValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayloadValue::Bool(b) => write!(f, "{}", b),
            PayloadValue::Number(n) => write!(f, "{}", n),
            PayloadValue::String(s) => write!(f, "{}", s),
            PayloadValue::StringArray(values) => write!(f, "[{}]", values.join(", ")),
        }
    }
}

impl From<&str> for PayloadValue {
    fn from(value: &str) -> Self {
        PayloadValue::String(value.to_string())
    }
}

impl From<String> for PayloadValue {
    fn from(value: String) -> Self {
        PayloadValue::String(value)
    }
}

impl From<f64> for PayloadValue {
    fn from(value: f64) -> Self {
        PayloadValue::Number(value)
    }
}

impl From<i64> for PayloadValue {
    fn from(value: i64) -> Self {
        PayloadValue::Number(value as f64)
    }
}

impl From<i32> for PayloadValue {
    fn from(value: i32) -> Self {
        PayloadValue::Number(f64::from(value))
    }
}

impl From<bool> for PayloadValue {
    fn from(value: bool) -> Self {
        PayloadValue::Bool(value)
    }
}

impl From<Vec<String>> for PayloadValue {
    fn from(value: Vec<String>) -> Self {
        PayloadValue::StringArray(value)
    }
}

impl From<Vec<&str>> for PayloadValue {
    fn from(value: Vec<&str>) -> Self {
        PayloadValue::StringArray(value.into_iter().map(str::to_string).collect())
    }
}
