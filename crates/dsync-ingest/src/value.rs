//! Scalar cell values

use serde::{Deserialize, Serialize};

/// One cell of a snapshot row.
///
/// Source files carry text only; an empty field becomes `Null` so storage
/// backends can tell "no value" from a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Text(String),
}

impl Value {
    /// Build a value from a raw delimited-text field.
    pub fn from_field(field: &str) -> Self {
        if field.is_empty() {
            Self::Null
        } else {
            Self::Text(field.to_string())
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Null => None,
            Self::Text(text) => Some(text),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Text(text) => write!(f, "{text}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_field_is_null() {
        assert!(Value::from_field("").is_null());
        assert_eq!(Value::from_field("0"), Value::Text("0".into()));
    }

    #[test]
    fn serializes_as_plain_json_scalars() {
        let row = vec![Value::from("100.00"), Value::Null];
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"["100.00",null]"#);

        let back: Vec<Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);
    }
}
