//! # Sample Analyzer
//!
//! Profiles a corpus of decoded sample values into a [`ValueProfile`]
//! tree. The analyzer never rejects a corpus: kind mixing is recorded as a
//! warning and analysis proceeds with the plurality kind; ties go to the
//! kind seen first, keeping the result deterministic.

use regex::Regex;
use serde_json::Value;

use skematic_core::equality::json_equal;
use skematic_core::{InferenceOptions, ValueKind};
use skematic_schema::FormatRegistry;

use crate::profile::{
    ArrayProfile, LikelyFormat, NumberProfile, ObjectProfile, PropertyProfile, StringProfile,
    ValueProfile,
};

/// Fraction of samples a format must match to be recorded as likely.
const LIKELY_FORMAT_THRESHOLD: f64 = 0.8;

/// Profiles sample corpora. Holds only frozen options.
#[derive(Debug, Clone)]
pub struct SampleAnalyzer {
    options: InferenceOptions,
}

impl SampleAnalyzer {
    /// Build an analyzer with the given frozen options.
    pub fn new(options: InferenceOptions) -> Self {
        Self { options }
    }

    /// Analyze a corpus into a profile tree.
    pub fn analyze(&self, samples: &[Value]) -> ValueProfile {
        self.analyze_branch(samples, "$")
    }

    fn analyze_branch(&self, samples: &[Value], location: &str) -> ValueProfile {
        let mut profile = ValueProfile {
            total: samples.len(),
            ..ValueProfile::default()
        };
        if samples.is_empty() {
            return profile;
        }

        for sample in samples {
            let kind = ValueKind::of(sample);
            match profile.kind_counts.iter_mut().find(|(k, _)| *k == kind) {
                Some((_, count)) => *count += 1,
                None => profile.kind_counts.push((kind, 1)),
            }
        }
        // Plurality kind; first-seen wins ties so analysis is deterministic.
        let mut dominant = profile.kind_counts[0].0;
        let mut best = profile.kind_counts[0].1;
        for (kind, count) in &profile.kind_counts[1..] {
            if *count > best {
                dominant = *kind;
                best = *count;
            }
        }
        profile.dominant = Some(dominant);
        profile.mixed = profile.kind_counts.len() > 1;
        if profile.mixed {
            let observed: Vec<String> = profile
                .kind_counts
                .iter()
                .map(|(kind, count)| format!("{kind}\u{00d7}{count}"))
                .collect();
            profile.warnings.push(format!(
                "mixed value kinds at {location} ({}); proceeding with {dominant}",
                observed.join(", ")
            ));
        }

        match dominant {
            ValueKind::Object => {
                profile.object = Some(self.analyze_objects(samples, location));
            }
            ValueKind::Array => {
                profile.array = Some(self.analyze_arrays(samples, location));
            }
            ValueKind::String => {
                profile.string = Some(self.analyze_strings(samples));
            }
            ValueKind::Integer | ValueKind::Number => {
                profile.number = Some(analyze_numbers(samples));
            }
            ValueKind::Null | ValueKind::Boolean => {}
        }

        if self.options.infer_enums && dominant.is_scalar() {
            profile.enum_values = self.enum_candidates(samples);
        }

        profile
    }

    fn analyze_objects(&self, samples: &[Value], location: &str) -> ObjectProfile {
        // Pool values per key in first-seen key order; only object-kind
        // samples contribute.
        let mut names: Vec<String> = Vec::new();
        let mut pools: Vec<(usize, Vec<Value>)> = Vec::new();
        let mut total = 0usize;

        for sample in samples {
            let Value::Object(map) = sample else { continue };
            total += 1;
            for (name, child) in map {
                match names.iter().position(|seen| seen == name) {
                    Some(i) => {
                        pools[i].0 += 1;
                        pools[i].1.push(child.clone());
                    }
                    None => {
                        names.push(name.clone());
                        pools.push((1, vec![child.clone()]));
                    }
                }
            }
        }

        let properties = names
            .into_iter()
            .zip(pools)
            .map(|(name, (present, pool))| {
                let child_location = format!("{location}.{name}");
                PropertyProfile {
                    profile: self.analyze_branch(&pool, &child_location),
                    name,
                    present,
                }
            })
            .collect();

        ObjectProfile { total, properties }
    }

    fn analyze_arrays(&self, samples: &[Value], location: &str) -> ArrayProfile {
        let mut pool: Vec<Value> = Vec::new();
        let mut lengths: Vec<usize> = Vec::new();
        for sample in samples {
            let Value::Array(items) = sample else { continue };
            lengths.push(items.len());
            pool.extend(items.iter().cloned());
        }

        let elements = if pool.is_empty() {
            None
        } else {
            let element_location = format!("{location}[]");
            Some(Box::new(self.analyze_branch(&pool, &element_location)))
        };

        ArrayProfile {
            min_len: lengths.iter().copied().min().unwrap_or(0),
            max_len: lengths.iter().copied().max().unwrap_or(0),
            avg_len: mean(&lengths),
            elements,
        }
    }

    fn analyze_strings(&self, samples: &[Value]) -> StringProfile {
        let strings: Vec<&str> = samples.iter().filter_map(Value::as_str).collect();
        let lengths: Vec<usize> = strings.iter().map(|s| s.chars().count()).collect();

        let mut profile = StringProfile {
            min_len: lengths.iter().copied().min().unwrap_or(0),
            max_len: lengths.iter().copied().max().unwrap_or(0),
            avg_len: mean(&lengths),
            ..StringProfile::default()
        };

        if self.options.infer_formats && !strings.is_empty() {
            let (detected, likely) = detect_formats(&strings);
            profile.detected_format = detected;
            profile.likely_format = likely;
        }

        profile.pattern = infer_positional_pattern(&strings);
        profile
    }

    fn enum_candidates(&self, samples: &[Value]) -> Option<Vec<Value>> {
        let mut distinct: Vec<Value> = Vec::new();
        for sample in samples {
            if !ValueKind::of(sample).is_scalar() {
                continue;
            }
            if !distinct.iter().any(|seen| json_equal(seen, sample)) {
                distinct.push(sample.clone());
            }
            if distinct.len() > self.options.enum_threshold {
                return None;
            }
        }
        if distinct.is_empty() {
            None
        } else {
            Some(distinct)
        }
    }
}

fn analyze_numbers(samples: &[Value]) -> NumberProfile {
    let numbers: Vec<f64> = samples.iter().filter_map(Value::as_f64).collect();
    NumberProfile {
        min: numbers.iter().copied().fold(f64::INFINITY, f64::min),
        max: numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        all_integral: numbers.iter().all(|n| n.fract() == 0.0),
    }
}

/// Full-corpus format detection: the highest-priority format every sample
/// matches, or failing that the best format at least 80% matched.
fn detect_formats(strings: &[&str]) -> (Option<String>, Option<LikelyFormat>) {
    let mut counts: Vec<(&'static str, usize)> = Vec::new();
    for s in strings {
        for name in FormatRegistry::detect(s) {
            match counts.iter_mut().find(|(n, _)| *n == name) {
                Some((_, count)) => *count += 1,
                None => counts.push((name, 1)),
            }
        }
    }

    let total = strings.len();
    if let Some((name, _)) = counts.iter().find(|(_, count)| *count == total) {
        return (Some((*name).to_string()), None);
    }
    // Ties keep the earlier entry, which follows detector priority.
    let mut best: Option<(&'static str, usize)> = None;
    for (name, count) in &counts {
        if best.map(|(_, c)| *count > c).unwrap_or(true) {
            best = Some((name, *count));
        }
    }
    if let Some((name, count)) = best {
        let fraction = count as f64 / total as f64;
        if fraction >= LIKELY_FORMAT_THRESHOLD {
            return (
                None,
                Some(LikelyFormat {
                    name: name.to_string(),
                    fraction,
                }),
            );
        }
    }
    (None, None)
}

fn mean(values: &[usize]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<usize>() as f64 / values.len() as f64
    }
}

/// Per-position character class for fixed-length pattern inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Literal(char),
    Digit,
    Lower,
    Upper,
    Letter,
    Any,
}

impl CharClass {
    fn of(c: char) -> Self {
        CharClass::Literal(c)
    }

    fn widen(c: char) -> Self {
        if c.is_ascii_digit() {
            CharClass::Digit
        } else if c.is_ascii_lowercase() {
            CharClass::Lower
        } else if c.is_ascii_uppercase() {
            CharClass::Upper
        } else {
            CharClass::Any
        }
    }

    fn merge(self, c: char) -> Self {
        match self {
            CharClass::Literal(l) if l == c => self,
            CharClass::Literal(l) => Self::widen(l).combine(Self::widen(c)),
            class => class.combine(Self::widen(c)),
        }
    }

    fn combine(self, other: Self) -> Self {
        use CharClass::*;
        match (self, other) {
            (a, b) if a == b => a,
            (Lower, Upper) | (Upper, Lower) => Letter,
            (Letter, Lower) | (Letter, Upper) | (Lower, Letter) | (Upper, Letter) => Letter,
            _ => Any,
        }
    }

    fn fragment(&self) -> String {
        match self {
            CharClass::Literal(c) => escape_literal(*c),
            CharClass::Digit => r"\d".to_string(),
            CharClass::Lower => "[a-z]".to_string(),
            CharClass::Upper => "[A-Z]".to_string(),
            CharClass::Letter => "[a-zA-Z]".to_string(),
            CharClass::Any => ".".to_string(),
        }
    }
}

/// Backslash-escape the regex metacharacters; everything else is itself.
fn escape_literal(c: char) -> String {
    const META: &[char] = &[
        '\\', '.', '+', '*', '?', '(', ')', '|', '[', ']', '{', '}', '^', '$', '#', '&', '-', '~',
    ];
    if META.contains(&c) {
        format!("\\{c}")
    } else {
        c.to_string()
    }
}

/// When every sample shares one length, derive an anchored per-position
/// pattern and keep it only if it matches the whole corpus.
fn infer_positional_pattern(strings: &[&str]) -> Option<String> {
    let first = strings.first()?;
    let length = first.chars().count();
    if length == 0 {
        return None;
    }
    if strings
        .iter()
        .any(|s| s.chars().count() != length)
    {
        return None;
    }

    let mut classes: Vec<CharClass> = first.chars().map(CharClass::of).collect();
    for s in &strings[1..] {
        for (class, c) in classes.iter_mut().zip(s.chars()) {
            *class = class.merge(c);
        }
    }

    // Run-length compress consecutive identical classes.
    let mut pattern = String::from("^");
    let mut i = 0;
    while i < classes.len() {
        let class = classes[i];
        let mut count = 1;
        while i + count < classes.len() && classes[i + count] == class {
            count += 1;
        }
        pattern.push_str(&class.fragment());
        if count > 1 {
            pattern.push_str(&format!("{{{count}}}"));
        }
        i += count;
    }
    pattern.push('$');

    // Accept only a pattern that provably matches every sample.
    let compiled = Regex::new(&pattern).ok()?;
    if strings.iter().all(|s| compiled.is_match(s)) {
        Some(pattern)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn analyzer() -> SampleAnalyzer {
        SampleAnalyzer::new(InferenceOptions::default())
    }

    #[test]
    fn test_plurality_kind_with_warning() {
        let profile = analyzer().analyze(&[json!(1), json!("x"), json!(2)]);
        assert_eq!(profile.dominant, Some(ValueKind::Integer));
        assert!(profile.mixed);
        assert_eq!(profile.warnings.len(), 1);
        assert!(profile.warnings[0].contains("mixed value kinds at $"));
    }

    #[test]
    fn test_plurality_tie_goes_to_first_seen() {
        let profile = analyzer().analyze(&[json!("a"), json!(1)]);
        assert_eq!(profile.dominant, Some(ValueKind::String));
    }

    #[test]
    fn test_presence_counts_in_first_seen_order() {
        let samples = vec![
            json!({"id": 1, "email": "a@x.com"}),
            json!({"id": 2, "email": "b@x.com", "name": "B"}),
        ];
        let profile = analyzer().analyze(&samples);
        let object = profile.object.unwrap();
        assert_eq!(object.total, 2);
        let names: Vec<&str> = object.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["id", "email", "name"]);
        assert_eq!(object.properties[0].present, 2);
        assert_eq!(object.properties[2].present, 1);
        assert_eq!(object.properties[2].presence_ratio(object.total), 0.5);
    }

    #[test]
    fn test_array_elements_pool_across_samples() {
        let samples = vec![json!([1, 2]), json!([3]), json!([])];
        let profile = analyzer().analyze(&samples);
        let array = profile.array.unwrap();
        assert_eq!(array.min_len, 0);
        assert_eq!(array.max_len, 2);
        assert!((array.avg_len - 1.0).abs() < f64::EPSILON);
        let elements = array.elements.unwrap();
        assert_eq!(elements.total, 3);
        assert_eq!(elements.dominant, Some(ValueKind::Integer));
    }

    #[test]
    fn test_format_detected_when_every_sample_matches() {
        let samples = vec![json!("a@x.com"), json!("b@y.org")];
        let profile = analyzer().analyze(&samples);
        let string = profile.string.unwrap();
        assert_eq!(string.detected_format.as_deref(), Some("email"));
        assert!(string.likely_format.is_none());
    }

    #[test]
    fn test_likely_format_at_eighty_percent() {
        let samples = vec![
            json!("a@x.com"),
            json!("b@x.com"),
            json!("c@x.com"),
            json!("d@x.com"),
            json!("not an email"),
        ];
        let profile = analyzer().analyze(&samples);
        let string = profile.string.unwrap();
        assert!(string.detected_format.is_none());
        let likely = string.likely_format.unwrap();
        assert_eq!(likely.name, "email");
        assert!((likely.fraction - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_positional_pattern_for_fixed_length_codes() {
        let samples = vec![json!("SKU-1234"), json!("SKU-5678"), json!("SKU-9012")];
        let profile = analyzer().analyze(&samples);
        let pattern = profile.string.unwrap().pattern.unwrap();
        assert_eq!(pattern, r"^SKU\-\d{4}$");
    }

    #[test]
    fn test_positional_pattern_widens_mixed_case() {
        let samples = vec![json!("Ab1"), json!("cD2")];
        let pattern = analyzer()
            .analyze(&samples)
            .string
            .unwrap()
            .pattern
            .unwrap();
        assert_eq!(pattern, r"^[a-zA-Z]{2}\d$");
    }

    #[test]
    fn test_no_pattern_for_varying_lengths() {
        let samples = vec![json!("ab"), json!("abc")];
        assert!(analyzer().analyze(&samples).string.unwrap().pattern.is_none());
    }

    #[test]
    fn test_enum_candidates_deduplicate_structurally() {
        let samples = vec![json!("red"), json!("green"), json!("red")];
        let profile = analyzer().analyze(&samples);
        assert_eq!(
            profile.enum_values,
            Some(vec![json!("red"), json!("green")])
        );
    }

    #[test]
    fn test_enum_suppressed_above_threshold() {
        let options = InferenceOptions {
            enum_threshold: 2,
            ..InferenceOptions::default()
        };
        let samples = vec![json!("a"), json!("b"), json!("c")];
        let profile = SampleAnalyzer::new(options).analyze(&samples);
        assert!(profile.enum_values.is_none());
    }

    #[test]
    fn test_enum_disabled_by_option() {
        let options = InferenceOptions {
            infer_enums: false,
            ..InferenceOptions::default()
        };
        let profile = SampleAnalyzer::new(options).analyze(&[json!("a")]);
        assert!(profile.enum_values.is_none());
    }

    #[test]
    fn test_number_profile_range_and_integrality() {
        let profile = analyzer().analyze(&[json!(3), json!(7), json!(5)]);
        let number = profile.number.unwrap();
        assert_eq!(number.min, 3.0);
        assert_eq!(number.max, 7.0);
        assert!(number.all_integral);
    }

    #[test]
    fn test_nested_mixing_is_visible_from_the_root() {
        let samples = vec![json!({"v": 1}), json!({"v": "x"})];
        let profile = analyzer().analyze(&samples);
        assert!(!profile.mixed);
        assert!(profile.any_mixed());
        let mut warnings = Vec::new();
        profile.collect_warnings(&mut warnings);
        assert!(warnings.iter().any(|w| w.contains("$.v")));
    }
}
