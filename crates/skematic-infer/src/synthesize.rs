//! # Schema Synthesis & Confidence Scoring
//!
//! Turns a [`ValueProfile`] into a [`SchemaNode`] and scores how
//! trustworthy the result is. The score starts at 1.0 and shrinks
//! multiplicatively: small corpora, kind mixing anywhere in the tree, and
//! sparse object properties each cost a factor.

use std::collections::BTreeMap;

use regex::Regex;
use serde_json::{json, Value};

use skematic_core::{InferenceOptions, ValueKind};
use skematic_schema::{ItemsSchema, Keywords, SchemaNode, TypeSet};

use crate::analyze::SampleAnalyzer;
use crate::profile::{ObjectProfile, ValueProfile};

/// Outcome of one `infer` call. Immutable once produced.
#[derive(Debug, Clone)]
pub struct InferenceResult {
    /// The synthesized schema.
    pub schema: SchemaNode,
    /// Size of the sample corpus.
    pub sample_count: usize,
    /// Heuristic trustworthiness in [0, 1].
    pub confidence: f64,
    /// Anomalies observed during analysis.
    pub warnings: Vec<String>,
    /// Corpus statistics for reporting.
    pub statistics: BTreeMap<String, Value>,
}

/// Maps profiles to schema nodes. Holds only frozen options.
#[derive(Debug, Clone)]
pub struct SchemaSynthesizer {
    options: InferenceOptions,
}

impl SchemaSynthesizer {
    /// Build a synthesizer with the given frozen options.
    pub fn new(options: InferenceOptions) -> Self {
        Self { options }
    }

    /// Map a profile tree to a schema node.
    pub fn synthesize(&self, profile: &ValueProfile) -> SchemaNode {
        let Some(dominant) = profile.dominant else {
            return SchemaNode::Boolean(true);
        };

        let mut keywords = Keywords {
            types: Some(TypeSet::from(dominant)),
            ..Keywords::default()
        };

        match dominant {
            ValueKind::Object => {
                if let Some(object) = &profile.object {
                    self.synthesize_object(object, &mut keywords);
                }
            }
            ValueKind::Array => {
                if let Some(array) = &profile.array {
                    if let Some(elements) = &array.elements {
                        keywords.items =
                            Some(ItemsSchema::Single(Box::new(self.synthesize(elements))));
                    }
                }
            }
            ValueKind::String => {
                if let Some(string) = &profile.string {
                    if let Some(format) = &string.detected_format {
                        keywords.format = Some(format.clone());
                    } else if let Some(pattern) = &string.pattern {
                        // A derived pattern only constrains when no format
                        // already covers the corpus.
                        keywords.pattern = Regex::new(pattern).ok();
                    }
                }
            }
            ValueKind::Null | ValueKind::Boolean | ValueKind::Integer | ValueKind::Number => {}
        }

        if dominant.is_scalar() {
            if let Some(values) = &profile.enum_values {
                keywords.enum_values = Some(values.clone());
            }
        }

        SchemaNode::Node(Box::new(keywords))
    }

    fn synthesize_object(&self, object: &ObjectProfile, keywords: &mut Keywords) {
        let mut properties = BTreeMap::new();
        let mut required = Vec::new();

        for property in &object.properties {
            let is_required = property.present == object.total && object.total > 0;
            if is_required {
                required.push(property.name.clone());
            } else if !self.options.generate_optional {
                continue;
            }
            properties.insert(property.name.clone(), self.synthesize(&property.profile));
        }

        if !properties.is_empty() {
            keywords.properties = Some(properties);
        }
        if !required.is_empty() {
            keywords.required = Some(required);
        }
    }
}

/// Multiplicative confidence score for an analyzed corpus.
fn score_confidence(profile: &ValueProfile) -> f64 {
    let mut confidence: f64 = 1.0;

    if profile.total < 3 {
        confidence *= 0.7;
    } else if profile.total < 10 {
        confidence *= 0.9;
    }

    if profile.any_mixed() {
        confidence *= 0.8;
    }

    if let Some(object) = &profile.object {
        if let Some(mean_ratio) = object.mean_presence_ratio() {
            // Sparse or inconsistent object samples directly lower trust.
            confidence *= mean_ratio;
        }
    }

    confidence.clamp(0.0, 1.0)
}

/// The inference engine: analyze a corpus, synthesize a schema, score it.
#[derive(Debug, Clone)]
pub struct SchemaInferrer {
    analyzer: SampleAnalyzer,
    synthesizer: SchemaSynthesizer,
}

impl Default for SchemaInferrer {
    fn default() -> Self {
        Self::new(InferenceOptions::default())
    }
}

impl SchemaInferrer {
    /// Build an inferrer with the given frozen options.
    pub fn new(options: InferenceOptions) -> Self {
        Self {
            analyzer: SampleAnalyzer::new(options.clone()),
            synthesizer: SchemaSynthesizer::new(options),
        }
    }

    /// Derive a schema from a sample corpus.
    pub fn infer(&self, samples: &[Value]) -> InferenceResult {
        if samples.is_empty() {
            return InferenceResult {
                schema: SchemaNode::Boolean(true),
                sample_count: 0,
                confidence: 0.0,
                warnings: vec!["cannot infer a schema from an empty sample set".to_string()],
                statistics: BTreeMap::new(),
            };
        }

        let profile = self.analyzer.analyze(samples);
        let schema = self.synthesizer.synthesize(&profile);

        let mut warnings = Vec::new();
        profile.collect_warnings(&mut warnings);

        let result = InferenceResult {
            confidence: score_confidence(&profile),
            sample_count: samples.len(),
            statistics: build_statistics(&profile),
            schema,
            warnings,
        };
        tracing::debug!(
            sample_count = result.sample_count,
            confidence = result.confidence,
            warnings = result.warnings.len(),
            "inference finished"
        );
        result
    }
}

fn build_statistics(profile: &ValueProfile) -> BTreeMap<String, Value> {
    let mut statistics = BTreeMap::new();

    statistics.insert("sample_count".to_string(), json!(profile.total));

    let kinds: serde_json::Map<String, Value> = profile
        .kind_counts
        .iter()
        .map(|(kind, count)| (kind.to_string(), json!(count)))
        .collect();
    statistics.insert("kinds_seen".to_string(), Value::Object(kinds));

    if let Some(object) = &profile.object {
        let presence: serde_json::Map<String, Value> = object
            .properties
            .iter()
            .map(|p| (p.name.clone(), json!(p.presence_ratio(object.total))))
            .collect();
        statistics.insert("property_presence".to_string(), Value::Object(presence));
    }

    if let Some(array) = &profile.array {
        statistics.insert(
            "array_length".to_string(),
            json!({
                "min": array.min_len,
                "max": array.max_len,
                "avg": array.avg_len,
            }),
        );
    }

    if let Some(string) = &profile.string {
        statistics.insert(
            "string_length".to_string(),
            json!({
                "min": string.min_len,
                "max": string.max_len,
                "avg": string.avg_len,
            }),
        );
        if let Some(likely) = &string.likely_format {
            statistics.insert(
                "likely_format".to_string(),
                json!({"name": likely.name, "fraction": likely.fraction}),
            );
        }
    }

    if let Some(number) = &profile.number {
        statistics.insert(
            "number_range".to_string(),
            json!({"min": number.min, "max": number.max, "integral": number.all_integral}),
        );
    }

    statistics
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn infer(samples: &[Value]) -> InferenceResult {
        SchemaInferrer::default().infer(samples)
    }

    #[test]
    fn test_empty_corpus_degrades() {
        let result = infer(&[]);
        assert!(matches!(result.schema, SchemaNode::Boolean(true)));
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_scalar_type_mapping() {
        let result = infer(&[json!(1), json!(2), json!(3)]);
        let rendered = result.schema.to_value();
        assert_eq!(rendered["type"], "integer");
    }

    #[test]
    fn test_object_required_split() {
        let result = infer(&[
            json!({"id": 1, "opt": "a"}),
            json!({"id": 2}),
        ]);
        let rendered = result.schema.to_value();
        assert_eq!(rendered["required"], json!(["id"]));
        assert!(rendered["properties"].get("opt").is_some());
    }

    #[test]
    fn test_required_only_mode_drops_optional_properties() {
        let options = InferenceOptions {
            generate_optional: false,
            ..InferenceOptions::default()
        };
        let result = SchemaInferrer::new(options).infer(&[
            json!({"id": 1, "opt": "a"}),
            json!({"id": 2}),
        ]);
        let rendered = result.schema.to_value();
        assert!(rendered["properties"].get("opt").is_none());
        assert!(rendered["properties"].get("id").is_some());
    }

    #[test]
    fn test_array_items_synthesis() {
        let result = infer(&[json!([1, 2]), json!([3])]);
        let rendered = result.schema.to_value();
        assert_eq!(rendered["type"], "array");
        assert_eq!(rendered["items"]["type"], "integer");
    }

    #[test]
    fn test_detected_format_wins_over_pattern() {
        // Fixed-length emails would also produce a positional pattern;
        // the detected format takes precedence.
        let result = infer(&[json!("a@x.com"), json!("b@x.com")]);
        let rendered = result.schema.to_value();
        assert_eq!(rendered["format"], "email");
        assert!(rendered.get("pattern").is_none());
    }

    #[test]
    fn test_pattern_attached_without_format() {
        let result = infer(&[json!("AB-12"), json!("CD-34")]);
        let rendered = result.schema.to_value();
        assert_eq!(rendered["pattern"], json!(r"^[A-Z]{2}\-\d{2}$"));
    }

    #[test]
    fn test_confidence_small_corpus_penalty() {
        let two = infer(&[json!(true), json!(false)]);
        assert!((two.confidence - 0.7).abs() < 1e-12);

        let five: Vec<Value> = (0..5).map(|_| json!(true)).collect();
        assert!((infer(&five).confidence - 0.9).abs() < 1e-12);

        let twelve: Vec<Value> = (0..12).map(|_| json!(true)).collect();
        assert!((infer(&twelve).confidence - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_confidence_mixing_penalty() {
        let samples: Vec<Value> = (0..10)
            .map(|i| if i == 0 { json!("x") } else { json!(i) })
            .collect();
        // 10 samples (no size penalty), one mixed kind: 1.0 * 0.8.
        assert!((infer(&samples).confidence - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_confidence_presence_ratio_factor() {
        let samples: Vec<Value> = (0..10)
            .map(|i| {
                if i < 5 {
                    json!({"id": i, "name": "x"})
                } else {
                    json!({"id": i})
                }
            })
            .collect();
        // Mean presence: (1.0 + 0.5) / 2 = 0.75; no other penalties.
        assert!((infer(&samples).confidence - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_statistics_carry_presence_and_lengths() {
        let result = infer(&[
            json!({"id": 1, "opt": "ab"}),
            json!({"id": 2}),
        ]);
        let presence = &result.statistics["property_presence"];
        assert_eq!(presence["id"], json!(1.0));
        assert_eq!(presence["opt"], json!(0.5));
        assert_eq!(result.statistics["sample_count"], json!(2));
    }
}
