//! # skematic-infer — The Inference Engine
//!
//! Derives a schema from a corpus of decoded sample values. A two-stage
//! pipeline: [`SampleAnalyzer`] folds the corpus into a [`ValueProfile`]
//! tree (kind counts, per-key presence, pooled array elements, string
//! format/pattern findings, enum candidates), then [`SchemaSynthesizer`]
//! maps the tree to a [`SchemaNode`](skematic_schema::SchemaNode) and the
//! confidence scorer grades the result.
//!
//! [`SchemaInferrer::infer`] runs the whole pipeline and never fails:
//! anomalies (kind mixing, empty corpora) become warnings and confidence
//! penalties, not errors.
//!
//! ## Crate Policy
//!
//! - Depends on `skematic-core` and `skematic-schema` internally.
//! - No I/O: samples arrive already decoded.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod analyze;
pub mod profile;
pub mod synthesize;

pub use analyze::SampleAnalyzer;
pub use profile::{
    ArrayProfile, LikelyFormat, NumberProfile, ObjectProfile, PropertyProfile, StringProfile,
    ValueProfile,
};
pub use synthesize::{InferenceResult, SchemaInferrer, SchemaSynthesizer};
