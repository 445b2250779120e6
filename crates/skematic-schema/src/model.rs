//! # Schema Model — Closed Keyword Bag
//!
//! A schema node is either a boolean schema (`true` accepts anything,
//! `false` accepts nothing) or a bag of recognized draft-07-style keywords.
//! Every keyword the validator evaluates is an explicit optional field on
//! [`Keywords`], so keyword handling is exhaustive by construction — there
//! are no ad hoc key lookups at evaluation time.
//!
//! ## Malformed input policy
//!
//! Parsing is total and permissive. A schema value that is neither a
//! boolean nor an object parses as the empty keyword bag (accepts
//! anything). A keyword whose value has the wrong JSON type — or a
//! `pattern`/`patternProperties` entry that does not compile — is dropped
//! from the bag. `validate` therefore never fails on a partially malformed
//! schema; it produces a best-effort report instead.

use std::collections::BTreeMap;

use regex::Regex;
use serde_json::{Map, Value};

use skematic_core::ValueKind;

/// A parsed schema node.
#[derive(Debug, Clone)]
pub enum SchemaNode {
    /// `true` accepts every value; `false` rejects every value.
    Boolean(bool),
    /// A bag of recognized keywords.
    Node(Box<Keywords>),
}

/// The set of `type` names a value may have.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeSet(Vec<ValueKind>);

impl TypeSet {
    /// Whether `value` satisfies at least one allowed kind.
    pub fn allows(&self, value: &Value) -> bool {
        self.0.iter().any(|kind| kind.matches(value))
    }

    /// The allowed kind names, in declaration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.0.iter().map(ValueKind::as_str).collect()
    }

    /// The allowed kinds.
    pub fn kinds(&self) -> &[ValueKind] {
        &self.0
    }

    fn from_value(value: &Value) -> Option<Self> {
        let mut kinds = Vec::new();
        match value {
            Value::String(name) => {
                kinds.extend(ValueKind::from_name(name));
            }
            Value::Array(names) => {
                for name in names {
                    if let Some(kind) = name.as_str().and_then(ValueKind::from_name) {
                        if !kinds.contains(&kind) {
                            kinds.push(kind);
                        }
                    }
                }
            }
            _ => {}
        }
        if kinds.is_empty() {
            None
        } else {
            Some(Self(kinds))
        }
    }

    fn to_value(&self) -> Value {
        if self.0.len() == 1 {
            Value::String(self.0[0].as_str().to_string())
        } else {
            Value::Array(
                self.0
                    .iter()
                    .map(|kind| Value::String(kind.as_str().to_string()))
                    .collect(),
            )
        }
    }
}

impl From<ValueKind> for TypeSet {
    fn from(kind: ValueKind) -> Self {
        Self(vec![kind])
    }
}

/// Either a boolean switch or a nested schema, as `additionalProperties`
/// and `additionalItems` allow.
#[derive(Debug, Clone)]
pub enum BoolOrSchema {
    /// Plain on/off.
    Bool(bool),
    /// A schema the governed values must satisfy.
    Schema(Box<SchemaNode>),
}

/// The `items` keyword: one schema for every element, or one per position.
#[derive(Debug, Clone)]
pub enum ItemsSchema {
    /// Applied to every element.
    Single(Box<SchemaNode>),
    /// Applied positionally; `additionalItems` governs the tail.
    Tuple(Vec<SchemaNode>),
}

/// The recognized keywords of a non-boolean schema node.
///
/// Absent keywords impose no constraint. Object key order is irrelevant
/// for `properties` and `definitions`; tuple `items` order is positional.
#[derive(Debug, Clone, Default)]
pub struct Keywords {
    /// `type` — allowed runtime kinds.
    pub types: Option<TypeSet>,
    /// `enum` — allowed values under structural equality.
    pub enum_values: Option<Vec<Value>>,
    /// `const` — the single allowed value (may be `null`).
    pub const_value: Option<Value>,

    /// `properties`.
    pub properties: Option<BTreeMap<String, SchemaNode>>,
    /// `required` — deduplicated, declaration order preserved.
    pub required: Option<Vec<String>>,
    /// `patternProperties` — compiled patterns with their schemas.
    pub pattern_properties: Option<Vec<(Regex, SchemaNode)>>,
    /// `additionalProperties`.
    pub additional_properties: Option<BoolOrSchema>,
    /// `minProperties`.
    pub min_properties: Option<usize>,
    /// `maxProperties`.
    pub max_properties: Option<usize>,
    /// `propertyNames` — schema applied to each key as a string value.
    pub property_names: Option<Box<SchemaNode>>,

    /// `items`.
    pub items: Option<ItemsSchema>,
    /// `additionalItems` — tail policy for tuple `items`.
    pub additional_items: Option<BoolOrSchema>,
    /// `contains` — at least one element must match.
    pub contains: Option<Box<SchemaNode>>,
    /// `minItems`.
    pub min_items: Option<usize>,
    /// `maxItems`.
    pub max_items: Option<usize>,
    /// `uniqueItems`.
    pub unique_items: Option<bool>,

    /// `pattern` — unanchored search.
    pub pattern: Option<Regex>,
    /// `format` — advisory, delegated to the format registry.
    pub format: Option<String>,
    /// `minLength` in Unicode scalar values.
    pub min_length: Option<usize>,
    /// `maxLength` in Unicode scalar values.
    pub max_length: Option<usize>,

    /// `minimum` (inclusive).
    pub minimum: Option<f64>,
    /// `maximum` (inclusive).
    pub maximum: Option<f64>,
    /// `exclusiveMinimum`.
    pub exclusive_minimum: Option<f64>,
    /// `exclusiveMaximum`.
    pub exclusive_maximum: Option<f64>,
    /// `multipleOf`.
    pub multiple_of: Option<f64>,

    /// `allOf`.
    pub all_of: Option<Vec<SchemaNode>>,
    /// `anyOf`.
    pub any_of: Option<Vec<SchemaNode>>,
    /// `oneOf`.
    pub one_of: Option<Vec<SchemaNode>>,
    /// `not`.
    pub not: Option<Box<SchemaNode>>,

    /// `$ref` — present only when resolution left it in place (cycle,
    /// unknown target, or resolution disabled). Such a node is not
    /// validated.
    pub reference: Option<String>,
    /// `definitions` and `$defs`, merged.
    pub definitions: Option<BTreeMap<String, SchemaNode>>,
}

impl SchemaNode {
    /// Parse a decoded schema tree into the model. Total: malformed input
    /// degrades to permissive nodes (see module docs).
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Bool(b) => SchemaNode::Boolean(*b),
            Value::Object(map) => SchemaNode::Node(Box::new(Keywords::from_map(map))),
            _ => SchemaNode::Node(Box::new(Keywords::default())),
        }
    }

    /// Serialize back to a decoded tree with draft-07 keyword spellings.
    pub fn to_value(&self) -> Value {
        match self {
            SchemaNode::Boolean(b) => Value::Bool(*b),
            SchemaNode::Node(keywords) => keywords.to_value(),
        }
    }
}

impl Keywords {
    fn from_map(map: &Map<String, Value>) -> Self {
        let mut kw = Keywords::default();

        if let Some(v) = map.get("type") {
            kw.types = TypeSet::from_value(v);
        }
        if let Some(v) = map.get("enum") {
            if let Value::Array(values) = v {
                kw.enum_values = Some(values.clone());
            }
        }
        kw.const_value = map.get("const").cloned();

        if let Some(Value::Object(props)) = map.get("properties") {
            kw.properties = Some(
                props
                    .iter()
                    .map(|(name, sub)| (name.clone(), SchemaNode::from_value(sub)))
                    .collect(),
            );
        }
        if let Some(Value::Array(names)) = map.get("required") {
            let mut required: Vec<String> = Vec::new();
            for name in names {
                if let Some(s) = name.as_str() {
                    if !required.iter().any(|seen| seen == s) {
                        required.push(s.to_string());
                    }
                }
            }
            kw.required = Some(required);
        }
        if let Some(Value::Object(patterns)) = map.get("patternProperties") {
            let compiled: Vec<(Regex, SchemaNode)> = patterns
                .iter()
                .filter_map(|(pattern, sub)| {
                    Regex::new(pattern)
                        .ok()
                        .map(|re| (re, SchemaNode::from_value(sub)))
                })
                .collect();
            if !compiled.is_empty() {
                kw.pattern_properties = Some(compiled);
            }
        }
        kw.additional_properties = map.get("additionalProperties").and_then(bool_or_schema);
        kw.min_properties = map.get("minProperties").and_then(as_count);
        kw.max_properties = map.get("maxProperties").and_then(as_count);
        kw.property_names = map
            .get("propertyNames")
            .map(|v| Box::new(SchemaNode::from_value(v)));

        if let Some(v) = map.get("items") {
            kw.items = match v {
                Value::Array(tuple) => Some(ItemsSchema::Tuple(
                    tuple.iter().map(SchemaNode::from_value).collect(),
                )),
                Value::Bool(_) | Value::Object(_) => {
                    Some(ItemsSchema::Single(Box::new(SchemaNode::from_value(v))))
                }
                _ => None,
            };
        }
        kw.additional_items = map.get("additionalItems").and_then(bool_or_schema);
        kw.contains = map
            .get("contains")
            .map(|v| Box::new(SchemaNode::from_value(v)));
        kw.min_items = map.get("minItems").and_then(as_count);
        kw.max_items = map.get("maxItems").and_then(as_count);
        kw.unique_items = map.get("uniqueItems").and_then(Value::as_bool);

        kw.pattern = map
            .get("pattern")
            .and_then(Value::as_str)
            .and_then(|p| Regex::new(p).ok());
        kw.format = map
            .get("format")
            .and_then(Value::as_str)
            .map(str::to_string);
        kw.min_length = map.get("minLength").and_then(as_count);
        kw.max_length = map.get("maxLength").and_then(as_count);

        kw.minimum = map.get("minimum").and_then(Value::as_f64);
        kw.maximum = map.get("maximum").and_then(Value::as_f64);
        kw.exclusive_minimum = map.get("exclusiveMinimum").and_then(Value::as_f64);
        kw.exclusive_maximum = map.get("exclusiveMaximum").and_then(Value::as_f64);
        kw.multiple_of = map.get("multipleOf").and_then(Value::as_f64);

        kw.all_of = sub_schema_list(map.get("allOf"));
        kw.any_of = sub_schema_list(map.get("anyOf"));
        kw.one_of = sub_schema_list(map.get("oneOf"));
        kw.not = map.get("not").map(|v| Box::new(SchemaNode::from_value(v)));

        kw.reference = map
            .get("$ref")
            .and_then(Value::as_str)
            .map(str::to_string);

        let mut definitions: BTreeMap<String, SchemaNode> = BTreeMap::new();
        for key in ["definitions", "$defs"] {
            if let Some(Value::Object(defs)) = map.get(key) {
                for (name, sub) in defs {
                    definitions.insert(name.clone(), SchemaNode::from_value(sub));
                }
            }
        }
        if !definitions.is_empty() {
            kw.definitions = Some(definitions);
        }

        kw
    }

    fn to_value(&self) -> Value {
        let mut map = Map::new();

        if let Some(types) = &self.types {
            map.insert("type".into(), types.to_value());
        }
        if let Some(values) = &self.enum_values {
            map.insert("enum".into(), Value::Array(values.clone()));
        }
        if let Some(value) = &self.const_value {
            map.insert("const".into(), value.clone());
        }

        if let Some(props) = &self.properties {
            let rendered: Map<String, Value> = props
                .iter()
                .map(|(name, sub)| (name.clone(), sub.to_value()))
                .collect();
            map.insert("properties".into(), Value::Object(rendered));
        }
        if let Some(required) = &self.required {
            map.insert(
                "required".into(),
                Value::Array(required.iter().cloned().map(Value::String).collect()),
            );
        }
        if let Some(patterns) = &self.pattern_properties {
            let rendered: Map<String, Value> = patterns
                .iter()
                .map(|(re, sub)| (re.as_str().to_string(), sub.to_value()))
                .collect();
            map.insert("patternProperties".into(), Value::Object(rendered));
        }
        if let Some(policy) = &self.additional_properties {
            map.insert("additionalProperties".into(), bool_or_schema_value(policy));
        }
        if let Some(n) = self.min_properties {
            map.insert("minProperties".into(), Value::from(n));
        }
        if let Some(n) = self.max_properties {
            map.insert("maxProperties".into(), Value::from(n));
        }
        if let Some(sub) = &self.property_names {
            map.insert("propertyNames".into(), sub.to_value());
        }

        if let Some(items) = &self.items {
            let rendered = match items {
                ItemsSchema::Single(sub) => sub.to_value(),
                ItemsSchema::Tuple(subs) => {
                    Value::Array(subs.iter().map(SchemaNode::to_value).collect())
                }
            };
            map.insert("items".into(), rendered);
        }
        if let Some(policy) = &self.additional_items {
            map.insert("additionalItems".into(), bool_or_schema_value(policy));
        }
        if let Some(sub) = &self.contains {
            map.insert("contains".into(), sub.to_value());
        }
        if let Some(n) = self.min_items {
            map.insert("minItems".into(), Value::from(n));
        }
        if let Some(n) = self.max_items {
            map.insert("maxItems".into(), Value::from(n));
        }
        if let Some(b) = self.unique_items {
            map.insert("uniqueItems".into(), Value::Bool(b));
        }

        if let Some(re) = &self.pattern {
            map.insert("pattern".into(), Value::String(re.as_str().to_string()));
        }
        if let Some(format) = &self.format {
            map.insert("format".into(), Value::String(format.clone()));
        }
        if let Some(n) = self.min_length {
            map.insert("minLength".into(), Value::from(n));
        }
        if let Some(n) = self.max_length {
            map.insert("maxLength".into(), Value::from(n));
        }

        if let Some(n) = self.minimum {
            map.insert("minimum".into(), number_value(n));
        }
        if let Some(n) = self.maximum {
            map.insert("maximum".into(), number_value(n));
        }
        if let Some(n) = self.exclusive_minimum {
            map.insert("exclusiveMinimum".into(), number_value(n));
        }
        if let Some(n) = self.exclusive_maximum {
            map.insert("exclusiveMaximum".into(), number_value(n));
        }
        if let Some(n) = self.multiple_of {
            map.insert("multipleOf".into(), number_value(n));
        }

        for (key, subs) in [
            ("allOf", &self.all_of),
            ("anyOf", &self.any_of),
            ("oneOf", &self.one_of),
        ] {
            if let Some(subs) = subs {
                map.insert(
                    key.into(),
                    Value::Array(subs.iter().map(SchemaNode::to_value).collect()),
                );
            }
        }
        if let Some(sub) = &self.not {
            map.insert("not".into(), sub.to_value());
        }

        if let Some(target) = &self.reference {
            map.insert("$ref".into(), Value::String(target.clone()));
        }
        if let Some(defs) = &self.definitions {
            let rendered: Map<String, Value> = defs
                .iter()
                .map(|(name, sub)| (name.clone(), sub.to_value()))
                .collect();
            map.insert("definitions".into(), Value::Object(rendered));
        }

        Value::Object(map)
    }
}

fn bool_or_schema(value: &Value) -> Option<BoolOrSchema> {
    match value {
        Value::Bool(b) => Some(BoolOrSchema::Bool(*b)),
        Value::Object(_) => Some(BoolOrSchema::Schema(Box::new(SchemaNode::from_value(
            value,
        )))),
        _ => None,
    }
}

fn bool_or_schema_value(policy: &BoolOrSchema) -> Value {
    match policy {
        BoolOrSchema::Bool(b) => Value::Bool(*b),
        BoolOrSchema::Schema(sub) => sub.to_value(),
    }
}

fn sub_schema_list(value: Option<&Value>) -> Option<Vec<SchemaNode>> {
    match value {
        Some(Value::Array(subs)) => Some(subs.iter().map(SchemaNode::from_value).collect()),
        _ => None,
    }
}

fn as_count(value: &Value) -> Option<usize> {
    value.as_u64().map(|n| n as usize)
}

/// Render an f64 as an integer number when it is whole, matching the way
/// bounds are usually written in schema documents.
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_boolean_schemas() {
        assert!(matches!(
            SchemaNode::from_value(&json!(true)),
            SchemaNode::Boolean(true)
        ));
        assert!(matches!(
            SchemaNode::from_value(&json!(false)),
            SchemaNode::Boolean(false)
        ));
    }

    #[test]
    fn test_malformed_node_parses_permissively() {
        // Neither a boolean nor an object: accepts anything.
        let node = SchemaNode::from_value(&json!(42));
        match node {
            SchemaNode::Node(kw) => assert!(kw.types.is_none() && kw.enum_values.is_none()),
            SchemaNode::Boolean(_) => panic!("expected keyword bag"),
        }
    }

    #[test]
    fn test_type_single_and_set() {
        let single = SchemaNode::from_value(&json!({"type": "string"}));
        let set = SchemaNode::from_value(&json!({"type": ["string", "null"]}));
        match (single, set) {
            (SchemaNode::Node(a), SchemaNode::Node(b)) => {
                assert_eq!(a.types.unwrap().names(), vec!["string"]);
                assert_eq!(b.types.unwrap().names(), vec!["string", "null"]);
            }
            _ => panic!("expected keyword bags"),
        }
    }

    #[test]
    fn test_unknown_type_names_are_dropped() {
        let node = SchemaNode::from_value(&json!({"type": ["decimal", "string"]}));
        match node {
            SchemaNode::Node(kw) => assert_eq!(kw.types.unwrap().names(), vec!["string"]),
            _ => panic!("expected keyword bag"),
        }
        // All names unknown: the keyword is treated as absent.
        let node = SchemaNode::from_value(&json!({"type": "decimal"}));
        match node {
            SchemaNode::Node(kw) => assert!(kw.types.is_none()),
            _ => panic!("expected keyword bag"),
        }
    }

    #[test]
    fn test_const_null_is_present() {
        let node = SchemaNode::from_value(&json!({"const": null}));
        match node {
            SchemaNode::Node(kw) => assert_eq!(kw.const_value, Some(Value::Null)),
            _ => panic!("expected keyword bag"),
        }
    }

    #[test]
    fn test_required_dedup_preserves_order() {
        let node = SchemaNode::from_value(&json!({"required": ["id", "email", "id"]}));
        match node {
            SchemaNode::Node(kw) => assert_eq!(kw.required.unwrap(), vec!["id", "email"]),
            _ => panic!("expected keyword bag"),
        }
    }

    #[test]
    fn test_invalid_pattern_is_dropped() {
        let node = SchemaNode::from_value(&json!({"pattern": "([unclosed"}));
        match node {
            SchemaNode::Node(kw) => assert!(kw.pattern.is_none()),
            _ => panic!("expected keyword bag"),
        }
    }

    #[test]
    fn test_items_tuple_vs_single() {
        let single = SchemaNode::from_value(&json!({"items": {"type": "integer"}}));
        let tuple = SchemaNode::from_value(&json!({"items": [{"type": "string"}, true]}));
        match single {
            SchemaNode::Node(kw) => {
                assert!(matches!(kw.items, Some(ItemsSchema::Single(_))))
            }
            _ => panic!("expected keyword bag"),
        }
        match tuple {
            SchemaNode::Node(kw) => match kw.items {
                Some(ItemsSchema::Tuple(subs)) => assert_eq!(subs.len(), 2),
                _ => panic!("expected tuple items"),
            },
            _ => panic!("expected keyword bag"),
        }
    }

    #[test]
    fn test_defs_and_definitions_merge() {
        let node = SchemaNode::from_value(&json!({
            "definitions": {"a": {"type": "string"}},
            "$defs": {"b": {"type": "integer"}}
        }));
        match node {
            SchemaNode::Node(kw) => {
                let defs = kw.definitions.unwrap();
                assert!(defs.contains_key("a") && defs.contains_key("b"));
            }
            _ => panic!("expected keyword bag"),
        }
    }

    #[test]
    fn test_round_trip_spellings() {
        let source = json!({
            "type": "object",
            "properties": {"id": {"type": "integer", "minimum": 1}},
            "required": ["id"],
            "additionalProperties": false,
            "minProperties": 1
        });
        let rendered = SchemaNode::from_value(&source).to_value();
        assert_eq!(rendered["type"], "object");
        assert_eq!(rendered["required"], json!(["id"]));
        assert_eq!(rendered["additionalProperties"], json!(false));
        assert_eq!(rendered["properties"]["id"]["minimum"], json!(1));
        assert_eq!(rendered["minProperties"], json!(1));
    }

    #[test]
    fn test_wrong_typed_keywords_are_dropped() {
        let node = SchemaNode::from_value(&json!({
            "minLength": "three",
            "required": "id",
            "enum": {"not": "an array"}
        }));
        match node {
            SchemaNode::Node(kw) => {
                assert!(kw.min_length.is_none());
                assert!(kw.required.is_none());
                assert!(kw.enum_values.is_none());
            }
            _ => panic!("expected keyword bag"),
        }
    }
}
