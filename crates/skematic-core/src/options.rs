//! # Engine Options
//!
//! Frozen configuration values passed to the engines at construction.
//! Engines never mutate their options, so a single engine instance can be
//! shared across call sites without locking.

use serde::{Deserialize, Serialize};

/// Options controlling schema evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOptions {
    /// Enforce `additionalProperties: false`. When disabled, undeclared
    /// properties are tolerated even if the schema forbids them.
    pub strict_mode: bool,
    /// Evaluate the `format` keyword against the format registry. Unknown
    /// format names are always accepted either way.
    pub check_formats: bool,
    /// Expand local `$ref` nodes before evaluation. When disabled, `$ref`
    /// nodes are left in place and not validated.
    pub resolve_references: bool,
    /// Maximum evaluation recursion depth for literal (non-`$ref`)
    /// self-similar nesting. Exceeding it yields a single `maxDepth`
    /// error on the offending branch instead of unbounded recursion.
    pub max_depth: usize,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            strict_mode: false,
            check_formats: true,
            resolve_references: true,
            max_depth: 64,
        }
    }
}

/// Options controlling schema inference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceOptions {
    /// Detect string formats across the sample corpus and attach `format`
    /// when every sample agrees.
    pub infer_formats: bool,
    /// Mark branches with few distinct scalar values as enums.
    pub infer_enums: bool,
    /// A branch is an enum candidate when its distinct scalar value count
    /// is at most this.
    pub enum_threshold: usize,
    /// Synthesize properties that are absent from some samples. When
    /// disabled, only always-present (required) properties appear in the
    /// inferred schema.
    pub generate_optional: bool,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self {
            infer_formats: true,
            infer_enums: true,
            enum_threshold: 10,
            generate_optional: true,
        }
    }
}
