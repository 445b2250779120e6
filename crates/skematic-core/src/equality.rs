//! # Structural Equality
//!
//! JSON Schema's `const`, `enum`, and `uniqueItems` keywords compare values
//! structurally: numbers are equal when they denote the same mathematical
//! value (`1 == 1.0`), arrays are equal elementwise in order, and objects
//! are equal when they have identical key sets with equal values.
//!
//! `serde_json::Value`'s derived `PartialEq` distinguishes `1` from `1.0`,
//! so the comparison lives here instead.

use serde_json::Value;

/// Structural equality over decoded JSON values.
pub fn json_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => {
            // Compare exactly when both sides are integral; fall back to
            // f64 across representations.
            if let (Some(xi), Some(yi)) = (x.as_i64(), y.as_i64()) {
                return xi == yi;
            }
            if let (Some(xu), Some(yu)) = (x.as_u64(), y.as_u64()) {
                return xu == yu;
            }
            match (x.as_f64(), y.as_f64()) {
                (Some(xf), Some(yf)) => xf == yf,
                _ => false,
            }
        }
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(u, v)| json_equal(u, v))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, u)| y.get(k).map(|v| json_equal(u, v)).unwrap_or(false))
        }
        _ => false,
    }
}

/// Membership test under structural equality.
pub fn contains_value(haystack: &[Value], needle: &Value) -> bool {
    haystack.iter().any(|candidate| json_equal(candidate, needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_compare_across_representations() {
        assert!(json_equal(&json!(1), &json!(1.0)));
        assert!(json_equal(&json!(-2), &json!(-2.0)));
        assert!(!json_equal(&json!(1), &json!(1.5)));
    }

    #[test]
    fn test_numbers_never_equal_booleans() {
        assert!(!json_equal(&json!(1), &json!(true)));
        assert!(!json_equal(&json!(0), &json!(false)));
    }

    #[test]
    fn test_arrays_are_ordered() {
        assert!(json_equal(&json!([1, 2]), &json!([1.0, 2.0])));
        assert!(!json_equal(&json!([1, 2]), &json!([2, 1])));
        assert!(!json_equal(&json!([1, 2]), &json!([1, 2, 3])));
    }

    #[test]
    fn test_objects_compare_by_key_set() {
        assert!(json_equal(
            &json!({"a": 1, "b": [2]}),
            &json!({"b": [2.0], "a": 1.0})
        ));
        assert!(!json_equal(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
        assert!(!json_equal(&json!({"a": 1}), &json!({"b": 1})));
    }

    #[test]
    fn test_contains_value() {
        let pool = vec![json!("red"), json!(2), json!(null)];
        assert!(contains_value(&pool, &json!(2.0)));
        assert!(contains_value(&pool, &json!(null)));
        assert!(!contains_value(&pool, &json!("blue")));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::Value;

    fn json_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| serde_json::json!(n)),
            (-1.0e9..1.0e9f64).prop_map(|f| serde_json::json!(f)),
            "[a-zA-Z0-9_ ]{0,20}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 32, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,6}", inner, 0..6).prop_map(|m| {
                    Value::Object(m.into_iter().collect())
                }),
            ]
        })
    }

    proptest! {
        /// Equality is reflexive for every decodable value.
        #[test]
        fn json_equal_reflexive(value in json_value()) {
            prop_assert!(json_equal(&value, &value));
        }

        /// Equality is symmetric.
        #[test]
        fn json_equal_symmetric(a in json_value(), b in json_value()) {
            prop_assert_eq!(json_equal(&a, &b), json_equal(&b, &a));
        }

        /// Equality is deterministic: repeated comparison agrees.
        #[test]
        fn json_equal_deterministic(a in json_value(), b in json_value()) {
            prop_assert_eq!(json_equal(&a, &b), json_equal(&a, &b));
        }
    }
}
