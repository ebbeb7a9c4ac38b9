//! Operand values carried by predicate operations.
//!
//! Both value types use soft casts: reading a value as a type it does not hold
//! never fails and yields that type's default (`0`, `0.0`, `false`, `""`, or an
//! empty slice). Call sites name the type they want explicitly.
use serde::{Deserialize, Serialize};

/// A single filter operand.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    #[default]
    Absent,
    Int32(i32),
    Int64(i64),
    Double(f64),
    String(String),
    Bool(bool),
}

impl ScalarValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, ScalarValue::Absent)
    }

    /// The held `i32`, or `0`.
    pub fn as_i32(&self) -> i32 {
        match self {
            ScalarValue::Int32(v) => *v,
            _ => 0,
        }
    }

    /// The held `i64`, or `0`.
    pub fn as_i64(&self) -> i64 {
        match self {
            ScalarValue::Int64(v) => *v,
            _ => 0,
        }
    }

    /// The held `f64`, or `0.0`.
    pub fn as_f64(&self) -> f64 {
        match self {
            ScalarValue::Double(v) => *v,
            _ => 0.0,
        }
    }

    /// The held string, or `""`.
    pub fn as_str(&self) -> &str {
        match self {
            ScalarValue::String(s) => s,
            _ => "",
        }
    }

    /// The held `bool`, or `false`.
    pub fn as_bool(&self) -> bool {
        match self {
            ScalarValue::Bool(v) => *v,
            _ => false,
        }
    }

    /// Any numeric variant widened to `f64`; `None` for non-numbers.
    pub fn numeric(&self) -> Option<f64> {
        match self {
            ScalarValue::Int32(v) => Some(f64::from(*v)),
            ScalarValue::Int64(v) => Some(*v as f64),
            ScalarValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Text rendering used where a backend only accepts strings.
    ///
    /// Booleans render as `1`/`0`, absent as the empty string.
    pub fn to_text(&self) -> String {
        match self {
            ScalarValue::Absent => String::new(),
            ScalarValue::Int32(v) => v.to_string(),
            ScalarValue::Int64(v) => v.to_string(),
            ScalarValue::Double(v) => v.to_string(),
            ScalarValue::String(s) => s.clone(),
            ScalarValue::Bool(b) => String::from(if *b { "1" } else { "0" }),
        }
    }
}

impl From<i32> for ScalarValue {
    fn from(v: i32) -> Self {
        ScalarValue::Int32(v)
    }
}

impl From<i64> for ScalarValue {
    fn from(v: i64) -> Self {
        ScalarValue::Int64(v)
    }
}

impl From<f64> for ScalarValue {
    fn from(v: f64) -> Self {
        ScalarValue::Double(v)
    }
}

impl From<bool> for ScalarValue {
    fn from(v: bool) -> Self {
        ScalarValue::Bool(v)
    }
}

impl From<&str> for ScalarValue {
    fn from(v: &str) -> Self {
        ScalarValue::String(v.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(v: String) -> Self {
        ScalarValue::String(v)
    }
}

/// A multi-value operand (IN lists, GROUP BY columns, join conditions).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListValue {
    #[default]
    Absent,
    Int32s(Vec<i32>),
    Int64s(Vec<i64>),
    Doubles(Vec<f64>),
    Strings(Vec<String>),
}

impl ListValue {
    pub fn len(&self) -> usize {
        match self {
            ListValue::Absent => 0,
            ListValue::Int32s(v) => v.len(),
            ListValue::Int64s(v) => v.len(),
            ListValue::Doubles(v) => v.len(),
            ListValue::Strings(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_i32s(&self) -> &[i32] {
        match self {
            ListValue::Int32s(v) => v,
            _ => &[],
        }
    }

    pub fn as_i64s(&self) -> &[i64] {
        match self {
            ListValue::Int64s(v) => v,
            _ => &[],
        }
    }

    pub fn as_f64s(&self) -> &[f64] {
        match self {
            ListValue::Doubles(v) => v,
            _ => &[],
        }
    }

    pub fn as_strings(&self) -> &[String] {
        match self {
            ListValue::Strings(v) => v,
            _ => &[],
        }
    }

    /// Each element as its own scalar, for parameter binding.
    pub fn to_scalars(&self) -> Vec<ScalarValue> {
        match self {
            ListValue::Absent => Vec::new(),
            ListValue::Int32s(v) => v.iter().copied().map(ScalarValue::from).collect(),
            ListValue::Int64s(v) => v.iter().copied().map(ScalarValue::from).collect(),
            ListValue::Doubles(v) => v.iter().copied().map(ScalarValue::from).collect(),
            ListValue::Strings(v) => v.iter().cloned().map(ScalarValue::from).collect(),
        }
    }

    /// Each element rendered as text.
    pub fn to_texts(&self) -> Vec<String> {
        self.to_scalars().iter().map(ScalarValue::to_text).collect()
    }
}

impl From<Vec<i32>> for ListValue {
    fn from(v: Vec<i32>) -> Self {
        ListValue::Int32s(v)
    }
}

impl From<Vec<i64>> for ListValue {
    fn from(v: Vec<i64>) -> Self {
        ListValue::Int64s(v)
    }
}

impl From<Vec<f64>> for ListValue {
    fn from(v: Vec<f64>) -> Self {
        ListValue::Doubles(v)
    }
}

impl From<Vec<String>> for ListValue {
    fn from(v: Vec<String>) -> Self {
        ListValue::Strings(v)
    }
}

impl From<Vec<&str>> for ListValue {
    fn from(v: Vec<&str>) -> Self {
        ListValue::Strings(v.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ListValue {
    fn from(v: [&str; N]) -> Self {
        ListValue::Strings(v.iter().map(|s| s.to_string()).collect())
    }
}
