//! # Value Kinds — Closed Runtime Taxonomy
//!
//! The seven runtime kinds a decoded JSON value can have, as named by the
//! `type` keyword: `null`, `boolean`, `integer`, `number`, `string`,
//! `array`, `object`.
//!
//! Two operations live here and they are deliberately distinct:
//!
//! - [`ValueKind::of`] reports the *storage* kind of a value (how the
//!   decoder tagged it). A number stored as `i64`/`u64` is `integer`;
//!   anything else numeric is `number`.
//! - [`ValueKind::matches`] implements the *`type` keyword* semantics:
//!   `integer` also accepts a float with no fractional part (`5.0`),
//!   `number` accepts every number, and booleans are never numeric.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Runtime kind of a decoded JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// JSON `null`.
    Null,
    /// JSON `true` / `false`.
    Boolean,
    /// A number the decoder stored without a fractional component.
    Integer,
    /// Any other JSON number.
    Number,
    /// A JSON string.
    String,
    /// An ordered sequence of values.
    Array,
    /// A string-keyed map of values.
    Object,
}

impl ValueKind {
    /// The storage kind of `value`.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    ValueKind::Integer
                } else {
                    ValueKind::Number
                }
            }
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    /// Whether `value` satisfies this kind under `type`-keyword semantics.
    ///
    /// Booleans never satisfy `integer` or `number`, even in host languages
    /// where booleans coerce to integers. `integer` accepts any number with
    /// no fractional part, so `5.0` is a valid integer. `number` accepts
    /// both integers and floats.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ValueKind::Null => value.is_null(),
            ValueKind::Boolean => value.is_boolean(),
            ValueKind::Integer => match value {
                Value::Number(n) => {
                    n.is_i64()
                        || n.is_u64()
                        || n.as_f64().map(|f| f.fract() == 0.0).unwrap_or(false)
                }
                _ => false,
            },
            ValueKind::Number => value.is_number(),
            ValueKind::String => value.is_string(),
            ValueKind::Array => value.is_array(),
            ValueKind::Object => value.is_object(),
        }
    }

    /// The `type`-keyword spelling of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }

    /// Parse a `type`-keyword name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "null" => Some(ValueKind::Null),
            "boolean" => Some(ValueKind::Boolean),
            "integer" => Some(ValueKind::Integer),
            "number" => Some(ValueKind::Number),
            "string" => Some(ValueKind::String),
            "array" => Some(ValueKind::Array),
            "object" => Some(ValueKind::Object),
            _ => None,
        }
    }

    /// True for `null`, `boolean`, `integer`, `number`, and `string`.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, ValueKind::Array | ValueKind::Object)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_of_tags_integers_and_floats() {
        assert_eq!(ValueKind::of(&json!(5)), ValueKind::Integer);
        assert_eq!(ValueKind::of(&json!(-3)), ValueKind::Integer);
        assert_eq!(ValueKind::of(&json!(5.5)), ValueKind::Number);
        assert_eq!(ValueKind::of(&json!(5.0)), ValueKind::Number);
    }

    #[test]
    fn test_matches_integer_accepts_whole_float() {
        assert!(ValueKind::Integer.matches(&json!(5)));
        assert!(ValueKind::Integer.matches(&json!(5.0)));
        assert!(!ValueKind::Integer.matches(&json!(5.5)));
    }

    #[test]
    fn test_booleans_are_never_numeric() {
        assert!(!ValueKind::Integer.matches(&json!(true)));
        assert!(!ValueKind::Number.matches(&json!(true)));
        assert!(ValueKind::Boolean.matches(&json!(true)));
    }

    #[test]
    fn test_number_accepts_both_representations() {
        assert!(ValueKind::Number.matches(&json!(1)));
        assert!(ValueKind::Number.matches(&json!(1.5)));
    }

    #[test]
    fn test_name_round_trip() {
        for kind in [
            ValueKind::Null,
            ValueKind::Boolean,
            ValueKind::Integer,
            ValueKind::Number,
            ValueKind::String,
            ValueKind::Array,
            ValueKind::Object,
        ] {
            assert_eq!(ValueKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(ValueKind::from_name("decimal"), None);
    }

    #[test]
    fn test_is_scalar() {
        assert!(ValueKind::String.is_scalar());
        assert!(ValueKind::Null.is_scalar());
        assert!(!ValueKind::Array.is_scalar());
        assert!(!ValueKind::Object.is_scalar());
    }

    #[test]
    fn test_serde_names_are_lowercase() {
        let s = serde_json::to_string(&ValueKind::Integer).unwrap();
        assert_eq!(s, "\"integer\"");
    }
}
