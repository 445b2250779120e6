//! # Validator — Recursive Structural Evaluation
//!
//! Decides whether a decoded value conforms to a schema node, producing an
//! ordered error list instead of failing fast: every constraint on a node
//! is evaluated, and only `anyOf`/`oneOf` branches discard their own errors
//! when probing for a match.
//!
//! ## Contract
//!
//! Domain-invalid data never surfaces as `Err`. The only outputs are
//! [`ValidationResult`] values; callers branch on `is_valid` / `errors`.
//! Constraints for a kind the value does not have are skipped, not failed
//! (`minLength` on a number is a no-op). A node left with an unresolved
//! `$ref` is not validated at all.
//!
//! ## Evaluation order per node
//!
//! 1. Boolean schemas (`false` is exactly one error).
//! 2. `const`, then `enum` — a mismatch short-circuits the rest of the node.
//! 3. `type` against the full allowed set.
//! 4. Kind-specific constraint groups (string / number / array / object).
//! 5. Combinators: `allOf` unions sub-errors, `anyOf`/`oneOf` report one
//!    summary error, `not` inverts.
//!
//! Recursion is bounded by `ValidationOptions::max_depth`; exceeding it
//! yields a single `maxDepth` error on the branch rather than a stack
//! overflow on pathological literal nesting.

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

use skematic_core::equality::{contains_value, json_equal};
use skematic_core::{InstancePath, ValidationOptions, ValueKind};

use crate::formats::FormatRegistry;
use crate::model::{BoolOrSchema, ItemsSchema, Keywords, SchemaNode};
use crate::resolver;

/// The keyword (or guard) a validation error originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConstraintKind {
    /// A boolean `false` schema.
    Schema,
    Const,
    Enum,
    Type,
    MinLength,
    MaxLength,
    Pattern,
    Format,
    Minimum,
    Maximum,
    ExclusiveMinimum,
    ExclusiveMaximum,
    MultipleOf,
    MinItems,
    MaxItems,
    UniqueItems,
    AdditionalItems,
    Contains,
    Required,
    AdditionalProperties,
    MinProperties,
    MaxProperties,
    PropertyNames,
    AnyOf,
    OneOf,
    Not,
    /// The recursion guard, not a schema keyword.
    MaxDepth,
}

impl ConstraintKind {
    /// The draft-07 keyword spelling (and `maxDepth` for the guard).
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKind::Schema => "schema",
            ConstraintKind::Const => "const",
            ConstraintKind::Enum => "enum",
            ConstraintKind::Type => "type",
            ConstraintKind::MinLength => "minLength",
            ConstraintKind::MaxLength => "maxLength",
            ConstraintKind::Pattern => "pattern",
            ConstraintKind::Format => "format",
            ConstraintKind::Minimum => "minimum",
            ConstraintKind::Maximum => "maximum",
            ConstraintKind::ExclusiveMinimum => "exclusiveMinimum",
            ConstraintKind::ExclusiveMaximum => "exclusiveMaximum",
            ConstraintKind::MultipleOf => "multipleOf",
            ConstraintKind::MinItems => "minItems",
            ConstraintKind::MaxItems => "maxItems",
            ConstraintKind::UniqueItems => "uniqueItems",
            ConstraintKind::AdditionalItems => "additionalItems",
            ConstraintKind::Contains => "contains",
            ConstraintKind::Required => "required",
            ConstraintKind::AdditionalProperties => "additionalProperties",
            ConstraintKind::MinProperties => "minProperties",
            ConstraintKind::MaxProperties => "maxProperties",
            ConstraintKind::PropertyNames => "propertyNames",
            ConstraintKind::AnyOf => "anyOf",
            ConstraintKind::OneOf => "oneOf",
            ConstraintKind::Not => "not",
            ConstraintKind::MaxDepth => "maxDepth",
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single constraint violation with structured context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    /// Dollar-rooted location of the violating value (`$.users[0].email`).
    pub path: String,
    /// Human-readable description of the violation.
    pub message: String,
    /// The constraint that was violated.
    pub constraint: ConstraintKind,
    /// What the schema required, where a single value expresses it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,
    /// The offending value or its relevant aspect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<Value>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [{}]", self.path, self.message, self.constraint)
    }
}

/// Outcome of one `validate` call. A pure output value.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    /// True when `errors` is empty.
    pub is_valid: bool,
    /// All violations, in evaluation order.
    pub errors: Vec<ValidationError>,
    /// Wall-clock evaluation time.
    #[serde(serialize_with = "duration_as_secs")]
    pub elapsed: Duration,
}

impl ValidationResult {
    /// Number of violations.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

fn duration_as_secs<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(d.as_secs_f64())
}

/// Tolerance for `multipleOf` on binary floating point.
const MULTIPLE_OF_EPSILON: f64 = 1e-9;

/// The validation engine. Holds only frozen options and may be shared
/// freely across call sites; `validate` is a pure function of
/// (schema, value).
#[derive(Debug, Clone)]
pub struct Validator {
    options: ValidationOptions,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationOptions::default())
    }
}

impl Validator {
    /// Build a validator with the given frozen options.
    pub fn new(options: ValidationOptions) -> Self {
        Self { options }
    }

    /// The options this validator was built with.
    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Validate a decoded value against a decoded schema tree.
    ///
    /// Resolves local `$ref`s first (unless disabled), parses the schema
    /// model, and evaluates from the document root.
    pub fn validate(&self, value: &Value, schema: &Value) -> ValidationResult {
        let started = Instant::now();
        let node = if self.options.resolve_references {
            SchemaNode::from_value(&resolver::resolve(schema))
        } else {
            SchemaNode::from_value(schema)
        };
        let result = self.validate_parsed(value, &node, started);
        tracing::debug!(
            is_valid = result.is_valid,
            errors = result.errors.len(),
            "validation finished"
        );
        result
    }

    /// Validate against an already-parsed schema node.
    pub fn validate_node(&self, value: &Value, node: &SchemaNode) -> ValidationResult {
        self.validate_parsed(value, node, Instant::now())
    }

    fn validate_parsed(
        &self,
        value: &Value,
        node: &SchemaNode,
        started: Instant,
    ) -> ValidationResult {
        let mut errors = Vec::new();
        self.check_node(value, node, &InstancePath::root(), 0, &mut errors);
        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            elapsed: started.elapsed(),
        }
    }

    fn check_node(
        &self,
        value: &Value,
        node: &SchemaNode,
        path: &InstancePath,
        depth: usize,
        errors: &mut Vec<ValidationError>,
    ) {
        if depth > self.options.max_depth {
            errors.push(ValidationError {
                path: path.render(),
                message: format!(
                    "evaluation exceeded the maximum schema depth of {}",
                    self.options.max_depth
                ),
                constraint: ConstraintKind::MaxDepth,
                expected: None,
                actual: None,
            });
            return;
        }

        let keywords = match node {
            SchemaNode::Boolean(true) => return,
            SchemaNode::Boolean(false) => {
                errors.push(ValidationError {
                    path: path.render(),
                    message: "schema rejects every value".to_string(),
                    constraint: ConstraintKind::Schema,
                    expected: None,
                    actual: Some(value.clone()),
                });
                return;
            }
            SchemaNode::Node(keywords) => keywords,
        };

        // Unresolved reference (cycle, unknown target, or resolution
        // disabled): the node is not validated.
        if keywords.reference.is_some() {
            return;
        }

        if let Some(expected) = &keywords.const_value {
            if !json_equal(value, expected) {
                errors.push(ValidationError {
                    path: path.render(),
                    message: "value does not equal the const value".to_string(),
                    constraint: ConstraintKind::Const,
                    expected: Some(expected.clone()),
                    actual: Some(value.clone()),
                });
                return;
            }
        }

        if let Some(allowed) = &keywords.enum_values {
            if !contains_value(allowed, value) {
                errors.push(ValidationError {
                    path: path.render(),
                    message: "value is not one of the enum values".to_string(),
                    constraint: ConstraintKind::Enum,
                    expected: Some(Value::Array(allowed.clone())),
                    actual: Some(value.clone()),
                });
                return;
            }
        }

        if let Some(types) = &keywords.types {
            if !types.allows(value) {
                let names = types.names();
                let expected = if names.len() == 1 {
                    Value::String(names[0].to_string())
                } else {
                    Value::Array(names.iter().map(|n| json!(n)).collect())
                };
                errors.push(ValidationError {
                    path: path.render(),
                    message: format!(
                        "expected type {}, found {}",
                        names.join(" or "),
                        ValueKind::of(value)
                    ),
                    constraint: ConstraintKind::Type,
                    expected: Some(expected),
                    actual: Some(Value::String(ValueKind::of(value).to_string())),
                });
            }
        }

        match value {
            Value::String(s) => self.check_string(s, keywords, path, errors),
            Value::Number(_) => self.check_number(value, keywords, path, errors),
            Value::Array(items) => self.check_array(items, keywords, path, depth, errors),
            Value::Object(map) => self.check_object(map, keywords, path, depth, errors),
            _ => {}
        }

        self.check_combinators(value, keywords, path, depth, errors);
    }

    fn check_string(
        &self,
        s: &str,
        keywords: &Keywords,
        path: &InstancePath,
        errors: &mut Vec<ValidationError>,
    ) {
        let length = s.chars().count();

        if let Some(min) = keywords.min_length {
            if length < min {
                errors.push(ValidationError {
                    path: path.render(),
                    message: format!("string is shorter than minLength {min} ({length} chars)"),
                    constraint: ConstraintKind::MinLength,
                    expected: Some(json!(min)),
                    actual: Some(json!(length)),
                });
            }
        }
        if let Some(max) = keywords.max_length {
            if length > max {
                errors.push(ValidationError {
                    path: path.render(),
                    message: format!("string is longer than maxLength {max} ({length} chars)"),
                    constraint: ConstraintKind::MaxLength,
                    expected: Some(json!(max)),
                    actual: Some(json!(length)),
                });
            }
        }
        if let Some(pattern) = &keywords.pattern {
            if !pattern.is_match(s) {
                errors.push(ValidationError {
                    path: path.render(),
                    message: format!("string does not match pattern '{}'", pattern.as_str()),
                    constraint: ConstraintKind::Pattern,
                    expected: Some(json!(pattern.as_str())),
                    actual: Some(json!(s)),
                });
            }
        }
        if self.options.check_formats {
            if let Some(format) = &keywords.format {
                // Unknown format names are advisory no-ops.
                if FormatRegistry::check(format, s) == Some(false) {
                    errors.push(ValidationError {
                        path: path.render(),
                        message: format!("string is not a valid {format}"),
                        constraint: ConstraintKind::Format,
                        expected: Some(json!(format)),
                        actual: Some(json!(s)),
                    });
                }
            }
        }
    }

    fn check_number(
        &self,
        value: &Value,
        keywords: &Keywords,
        path: &InstancePath,
        errors: &mut Vec<ValidationError>,
    ) {
        let Some(n) = value.as_f64() else { return };

        if let Some(min) = keywords.minimum {
            if n < min {
                errors.push(self.bound_error(path, ConstraintKind::Minimum, min, value, "<"));
            }
        }
        if let Some(max) = keywords.maximum {
            if n > max {
                errors.push(self.bound_error(path, ConstraintKind::Maximum, max, value, ">"));
            }
        }
        if let Some(min) = keywords.exclusive_minimum {
            if n <= min {
                errors.push(self.bound_error(
                    path,
                    ConstraintKind::ExclusiveMinimum,
                    min,
                    value,
                    "<=",
                ));
            }
        }
        if let Some(max) = keywords.exclusive_maximum {
            if n >= max {
                errors.push(self.bound_error(
                    path,
                    ConstraintKind::ExclusiveMaximum,
                    max,
                    value,
                    ">=",
                ));
            }
        }
        if let Some(divisor) = keywords.multiple_of {
            if divisor != 0.0 {
                let quotient = n / divisor;
                if (quotient - quotient.round()).abs() > MULTIPLE_OF_EPSILON {
                    errors.push(ValidationError {
                        path: path.render(),
                        message: format!("{n} is not a multiple of {divisor}"),
                        constraint: ConstraintKind::MultipleOf,
                        expected: Some(json!(divisor)),
                        actual: Some(value.clone()),
                    });
                }
            }
        }
    }

    fn bound_error(
        &self,
        path: &InstancePath,
        constraint: ConstraintKind,
        bound: f64,
        value: &Value,
        relation: &str,
    ) -> ValidationError {
        ValidationError {
            path: path.render(),
            message: format!("number violates {constraint}: value {relation} {bound}"),
            constraint,
            expected: Some(json!(bound)),
            actual: Some(value.clone()),
        }
    }

    fn check_array(
        &self,
        items: &[Value],
        keywords: &Keywords,
        path: &InstancePath,
        depth: usize,
        errors: &mut Vec<ValidationError>,
    ) {
        if let Some(min) = keywords.min_items {
            if items.len() < min {
                errors.push(ValidationError {
                    path: path.render(),
                    message: format!(
                        "array has fewer than minItems {min} ({} items)",
                        items.len()
                    ),
                    constraint: ConstraintKind::MinItems,
                    expected: Some(json!(min)),
                    actual: Some(json!(items.len())),
                });
            }
        }
        if let Some(max) = keywords.max_items {
            if items.len() > max {
                errors.push(ValidationError {
                    path: path.render(),
                    message: format!("array has more than maxItems {max} ({} items)", items.len()),
                    constraint: ConstraintKind::MaxItems,
                    expected: Some(json!(max)),
                    actual: Some(json!(items.len())),
                });
            }
        }

        if keywords.unique_items == Some(true) {
            for j in 1..items.len() {
                if items[..j].iter().any(|earlier| json_equal(earlier, &items[j])) {
                    errors.push(ValidationError {
                        path: path.render(),
                        message: format!("array items are not unique: duplicate at index {j}"),
                        constraint: ConstraintKind::UniqueItems,
                        expected: None,
                        actual: Some(items[j].clone()),
                    });
                }
            }
        }

        match &keywords.items {
            Some(ItemsSchema::Single(sub)) => {
                for (i, item) in items.iter().enumerate() {
                    self.check_node(item, sub, &path.index(i), depth + 1, errors);
                }
            }
            Some(ItemsSchema::Tuple(subs)) => {
                for (i, (item, sub)) in items.iter().zip(subs.iter()).enumerate() {
                    self.check_node(item, sub, &path.index(i), depth + 1, errors);
                }
                if items.len() > subs.len() {
                    match &keywords.additional_items {
                        Some(BoolOrSchema::Bool(false)) => {
                            for i in subs.len()..items.len() {
                                errors.push(ValidationError {
                                    path: path.index(i).render(),
                                    message: format!("additional item at index {i} is not allowed"),
                                    constraint: ConstraintKind::AdditionalItems,
                                    expected: None,
                                    actual: Some(items[i].clone()),
                                });
                            }
                        }
                        Some(BoolOrSchema::Schema(sub)) => {
                            for i in subs.len()..items.len() {
                                self.check_node(&items[i], sub, &path.index(i), depth + 1, errors);
                            }
                        }
                        Some(BoolOrSchema::Bool(true)) | None => {}
                    }
                }
            }
            None => {}
        }

        if let Some(contains) = &keywords.contains {
            let mut matched = false;
            for item in items {
                let mut scratch = Vec::new();
                self.check_node(item, contains, path, depth + 1, &mut scratch);
                if scratch.is_empty() {
                    matched = true;
                    break;
                }
            }
            if !matched {
                errors.push(ValidationError {
                    path: path.render(),
                    message: "no array element matches the contains schema".to_string(),
                    constraint: ConstraintKind::Contains,
                    expected: None,
                    actual: None,
                });
            }
        }
    }

    fn check_object(
        &self,
        map: &Map<String, Value>,
        keywords: &Keywords,
        path: &InstancePath,
        depth: usize,
        errors: &mut Vec<ValidationError>,
    ) {
        if let Some(required) = &keywords.required {
            for name in required {
                if !map.contains_key(name) {
                    errors.push(ValidationError {
                        path: path.render(),
                        message: format!("property '{name}' is required but missing"),
                        constraint: ConstraintKind::Required,
                        expected: Some(json!(name)),
                        actual: None,
                    });
                }
            }
        }

        if let Some(properties) = &keywords.properties {
            for (name, sub) in properties {
                if let Some(child) = map.get(name) {
                    self.check_node(child, sub, &path.key(name), depth + 1, errors);
                }
            }
        }

        if let Some(patterns) = &keywords.pattern_properties {
            for (pattern, sub) in patterns {
                for (key, child) in map {
                    if pattern.is_match(key) {
                        self.check_node(child, sub, &path.key(key), depth + 1, errors);
                    }
                }
            }
        }

        if let Some(policy) = &keywords.additional_properties {
            let consumed = |key: &str| {
                keywords
                    .properties
                    .as_ref()
                    .map(|props| props.contains_key(key))
                    .unwrap_or(false)
                    || keywords
                        .pattern_properties
                        .as_ref()
                        .map(|patterns| patterns.iter().any(|(re, _)| re.is_match(key)))
                        .unwrap_or(false)
            };
            match policy {
                BoolOrSchema::Bool(false) => {
                    if self.options.strict_mode {
                        for key in map.keys().filter(|key| !consumed(key.as_str())) {
                            errors.push(ValidationError {
                                path: path.key(key).render(),
                                message: format!("additional property '{key}' is not allowed"),
                                constraint: ConstraintKind::AdditionalProperties,
                                expected: None,
                                actual: Some(json!(key)),
                            });
                        }
                    }
                }
                BoolOrSchema::Schema(sub) => {
                    for (key, child) in map.iter().filter(|(key, _)| !consumed(key.as_str())) {
                        self.check_node(child, sub, &path.key(key), depth + 1, errors);
                    }
                }
                BoolOrSchema::Bool(true) => {}
            }
        }

        if let Some(min) = keywords.min_properties {
            if map.len() < min {
                errors.push(ValidationError {
                    path: path.render(),
                    message: format!(
                        "object has fewer than minProperties {min} ({} properties)",
                        map.len()
                    ),
                    constraint: ConstraintKind::MinProperties,
                    expected: Some(json!(min)),
                    actual: Some(json!(map.len())),
                });
            }
        }
        if let Some(max) = keywords.max_properties {
            if map.len() > max {
                errors.push(ValidationError {
                    path: path.render(),
                    message: format!(
                        "object has more than maxProperties {max} ({} properties)",
                        map.len()
                    ),
                    constraint: ConstraintKind::MaxProperties,
                    expected: Some(json!(max)),
                    actual: Some(json!(map.len())),
                });
            }
        }

        if let Some(name_schema) = &keywords.property_names {
            for key in map.keys() {
                let mut scratch = Vec::new();
                let key_value = Value::String(key.clone());
                self.check_node(&key_value, name_schema, &path.key(key), depth + 1, &mut scratch);
                if !scratch.is_empty() {
                    errors.push(ValidationError {
                        path: path.key(key).render(),
                        message: format!(
                            "property name '{key}' does not match the propertyNames schema"
                        ),
                        constraint: ConstraintKind::PropertyNames,
                        expected: None,
                        actual: Some(json!(key)),
                    });
                }
            }
        }
    }

    fn check_combinators(
        &self,
        value: &Value,
        keywords: &Keywords,
        path: &InstancePath,
        depth: usize,
        errors: &mut Vec<ValidationError>,
    ) {
        if let Some(subs) = &keywords.all_of {
            // allOf is the union of every branch's errors.
            for sub in subs {
                self.check_node(value, sub, path, depth + 1, errors);
            }
        }

        if let Some(subs) = &keywords.any_of {
            let matched = subs.iter().any(|sub| {
                let mut scratch = Vec::new();
                self.check_node(value, sub, path, depth + 1, &mut scratch);
                scratch.is_empty()
            });
            if !matched {
                errors.push(ValidationError {
                    path: path.render(),
                    message: format!(
                        "value does not match any of the {} anyOf alternatives",
                        subs.len()
                    ),
                    constraint: ConstraintKind::AnyOf,
                    expected: None,
                    actual: Some(value.clone()),
                });
            }
        }

        if let Some(subs) = &keywords.one_of {
            let matches = subs
                .iter()
                .filter(|sub| {
                    let mut scratch = Vec::new();
                    self.check_node(value, sub, path, depth + 1, &mut scratch);
                    scratch.is_empty()
                })
                .count();
            if matches != 1 {
                errors.push(ValidationError {
                    path: path.render(),
                    message: format!(
                        "expected exactly one matching oneOf alternative, found {matches}"
                    ),
                    constraint: ConstraintKind::OneOf,
                    expected: Some(json!(1)),
                    actual: Some(json!(matches)),
                });
            }
        }

        if let Some(sub) = &keywords.not {
            let mut scratch = Vec::new();
            self.check_node(value, sub, path, depth + 1, &mut scratch);
            if scratch.is_empty() {
                errors.push(ValidationError {
                    path: path.render(),
                    message: "value matches the schema it must not match".to_string(),
                    constraint: ConstraintKind::Not,
                    expected: None,
                    actual: Some(value.clone()),
                });
            }
        }
    }
}
