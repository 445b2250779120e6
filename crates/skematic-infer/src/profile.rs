//! # Sample Profiles
//!
//! The intermediate tree produced by the analyzer and consumed by the
//! synthesizer. A [`ValueProfile`] mirrors the shape of the eventual
//! schema: object branches carry per-key presence counts, array branches
//! carry length statistics and a pooled element profile, scalar branches
//! carry length/range/format findings and enum candidates.

use serde_json::Value;

use skematic_core::ValueKind;

/// Statistics for one branch of the sample tree.
#[derive(Debug, Clone, Default)]
pub struct ValueProfile {
    /// Samples that reached this branch.
    pub total: usize,
    /// Observed kinds with occurrence counts, in first-seen order.
    pub kind_counts: Vec<(ValueKind, usize)>,
    /// The plurality kind, `None` only for an empty branch.
    pub dominant: Option<ValueKind>,
    /// True when more than one kind was observed here.
    pub mixed: bool,
    /// Human-readable anomalies recorded at this branch.
    pub warnings: Vec<String>,

    /// Present when the dominant kind is `object`.
    pub object: Option<ObjectProfile>,
    /// Present when the dominant kind is `array`.
    pub array: Option<ArrayProfile>,
    /// Present when the dominant kind is `string`.
    pub string: Option<StringProfile>,
    /// Present when the dominant kind is numeric.
    pub number: Option<NumberProfile>,

    /// Distinct scalar values, recorded when their count is at most the
    /// configured enum threshold.
    pub enum_values: Option<Vec<Value>>,
}

impl ValueProfile {
    /// Append this branch's warnings and every child branch's warnings.
    pub fn collect_warnings(&self, out: &mut Vec<String>) {
        out.extend(self.warnings.iter().cloned());
        if let Some(object) = &self.object {
            for property in &object.properties {
                property.profile.collect_warnings(out);
            }
        }
        if let Some(array) = &self.array {
            if let Some(elements) = &array.elements {
                elements.collect_warnings(out);
            }
        }
    }

    /// True when any branch of the tree observed mixed kinds.
    pub fn any_mixed(&self) -> bool {
        if self.mixed {
            return true;
        }
        if let Some(object) = &self.object {
            if object.properties.iter().any(|p| p.profile.any_mixed()) {
                return true;
            }
        }
        if let Some(array) = &self.array {
            if let Some(elements) = &array.elements {
                if elements.any_mixed() {
                    return true;
                }
            }
        }
        false
    }
}

/// Per-key statistics for an object branch.
#[derive(Debug, Clone, Default)]
pub struct ObjectProfile {
    /// Object-kind samples that reached this branch; the denominator for
    /// presence ratios.
    pub total: usize,
    /// Discovered properties in first-seen order.
    pub properties: Vec<PropertyProfile>,
}

impl ObjectProfile {
    /// Mean presence ratio across all discovered properties.
    pub fn mean_presence_ratio(&self) -> Option<f64> {
        if self.properties.is_empty() || self.total == 0 {
            return None;
        }
        let sum: f64 = self
            .properties
            .iter()
            .map(|p| p.present as f64 / self.total as f64)
            .sum();
        Some(sum / self.properties.len() as f64)
    }
}

/// One discovered object key.
#[derive(Debug, Clone)]
pub struct PropertyProfile {
    /// The key name.
    pub name: String,
    /// Samples in which the key appeared.
    pub present: usize,
    /// Profile of the key's values.
    pub profile: ValueProfile,
}

impl PropertyProfile {
    /// Fraction of object samples carrying this key. A ratio of exactly
    /// 1.0 makes the key required.
    pub fn presence_ratio(&self, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            self.present as f64 / total as f64
        }
    }
}

/// Length statistics and the pooled element profile for an array branch.
#[derive(Debug, Clone, Default)]
pub struct ArrayProfile {
    pub min_len: usize,
    pub max_len: usize,
    pub avg_len: f64,
    /// All elements across all array samples, analyzed as one pool.
    pub elements: Option<Box<ValueProfile>>,
}

/// Findings for a string branch.
#[derive(Debug, Clone, Default)]
pub struct StringProfile {
    /// Lengths in Unicode scalar values.
    pub min_len: usize,
    pub max_len: usize,
    pub avg_len: f64,
    /// A registry format every sample matched.
    pub detected_format: Option<String>,
    /// The best format at least 80% (but not all) of samples matched.
    pub likely_format: Option<LikelyFormat>,
    /// Anchored positional pattern derived from fixed-length samples.
    pub pattern: Option<String>,
}

/// A format matched by most, but not all, samples.
#[derive(Debug, Clone, PartialEq)]
pub struct LikelyFormat {
    pub name: String,
    /// Fraction of samples that matched, in (0, 1).
    pub fraction: f64,
}

/// Range findings for a numeric branch.
#[derive(Debug, Clone, Default)]
pub struct NumberProfile {
    pub min: f64,
    pub max: f64,
    /// True when every observed number had no fractional part.
    pub all_integral: bool,
}
