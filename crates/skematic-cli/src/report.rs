//! # Report Rendering
//!
//! Serializes engine results for the terminal. The text form is for
//! humans; the JSON form is stable output for CI pipelines. Rendering is
//! presentation only — both forms are derived from the result values
//! without consulting the engines.

use std::fmt::Write as _;

use serde_json::json;

use skematic_infer::InferenceResult;
use skematic_schema::ValidationResult;

/// Output encoding for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    /// Human-readable lines.
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ReportFormat::Text => "text",
            ReportFormat::Json => "json",
        })
    }
}

/// Render a validation outcome.
pub fn render_validation(result: &ValidationResult, format: ReportFormat) -> String {
    match format {
        ReportFormat::Text => {
            let mut out = String::new();
            if result.is_valid {
                let _ = writeln!(
                    out,
                    "valid (checked in {:.3}ms)",
                    result.elapsed.as_secs_f64() * 1000.0
                );
            } else {
                let _ = writeln!(
                    out,
                    "invalid: {} error{}",
                    result.error_count(),
                    if result.error_count() == 1 { "" } else { "s" }
                );
                for error in &result.errors {
                    let _ = writeln!(out, "  {error}");
                }
            }
            out.trim_end().to_string()
        }
        ReportFormat::Json => {
            serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

/// Render an inference outcome.
pub fn render_inference(result: &InferenceResult, format: ReportFormat) -> String {
    let schema = result.schema.to_value();
    match format {
        ReportFormat::Text => {
            let mut out = String::new();
            let _ = writeln!(
                out,
                "inferred from {} sample{} (confidence {:.2})",
                result.sample_count,
                if result.sample_count == 1 { "" } else { "s" },
                result.confidence
            );
            for warning in &result.warnings {
                let _ = writeln!(out, "  warning: {warning}");
            }
            let _ = writeln!(
                out,
                "{}",
                serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string())
            );
            out.trim_end().to_string()
        }
        ReportFormat::Json => {
            let report = json!({
                "schema": schema,
                "sample_count": result.sample_count,
                "confidence": result.confidence,
                "warnings": result.warnings,
                "statistics": result.statistics,
            });
            serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use skematic_infer::SchemaInferrer;
    use skematic_schema::Validator;

    #[test]
    fn test_text_report_lists_errors() {
        let result = Validator::default().validate(
            &json!({"id": "5"}),
            &json!({"properties": {"id": {"type": "integer"}}}),
        );
        let rendered = render_validation(&result, ReportFormat::Text);
        assert!(rendered.starts_with("invalid: 1 error"));
        assert!(rendered.contains("$.id"));
    }

    #[test]
    fn test_json_report_is_parseable() {
        let result = Validator::default().validate(&json!(5), &json!({"type": "string"}));
        let rendered = render_validation(&result, ReportFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["is_valid"], false);
        assert_eq!(parsed["errors"][0]["constraint"], "type");
    }

    #[test]
    fn test_inference_json_report_shape() {
        let result = SchemaInferrer::default().infer(&[json!({"id": 1}), json!({"id": 2})]);
        let rendered = render_inference(&result, ReportFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["sample_count"], 2);
        assert_eq!(parsed["schema"]["type"], "object");
        assert!(parsed["confidence"].is_number());
    }
}
