//! # skematic-schema — The Validation Engine
//!
//! A recursive structural type-checker for decoded JSON values against
//! JSON-Schema-shaped descriptions (draft-07 semantics, approximately).
//!
//! ## Pipeline
//!
//! raw schema tree → [`resolver::resolve`] (local `$ref` expansion,
//! cycle-safe) → [`SchemaNode::from_value`] (closed keyword bag) →
//! [`Validator::validate`] → [`ValidationResult`].
//!
//! ## Contract
//!
//! Structurally invalid data is reported, never thrown: `validate` is a
//! total, pure function of (schema, value) returning an ordered error
//! list. The engine holds no mutable state beyond frozen
//! [`ValidationOptions`](skematic_core::ValidationOptions) and precompiled
//! format patterns, so one instance may be shared across call sites.
//!
//! ## Crate Policy
//!
//! - Depends only on `skematic-core` internally.
//! - No I/O: schema and value trees arrive already decoded.
//! - No `panic!()` or `.unwrap()` outside tests and static pattern
//!   compilation.

pub mod formats;
pub mod model;
pub mod resolver;
pub mod validator;

pub use formats::FormatRegistry;
pub use model::{BoolOrSchema, ItemsSchema, Keywords, SchemaNode, TypeSet};
pub use resolver::resolve;
pub use validator::{ConstraintKind, ValidationError, ValidationResult, Validator};
