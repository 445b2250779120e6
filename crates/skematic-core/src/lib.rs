//! # skematic-core — Foundational Types for Skematic
//!
//! This crate is the leaf of the Skematic workspace DAG. It defines the
//! primitives shared by the validation and inference engines: the closed
//! runtime-kind taxonomy for decoded JSON values, structural equality,
//! dollar-rooted instance paths for error reporting, and the frozen option
//! structs that configure the engines.
//!
//! ## Key Design Principles
//!
//! 1. **Closed sum types.** `ValueKind` enumerates the seven runtime kinds a
//!    decoded value can have. Every consumer handles the full set through
//!    exhaustive `match` arms; there is no stringly-typed kind anywhere.
//!
//! 2. **Structural equality, not representational equality.** `json_equal`
//!    compares numbers numerically (`1 == 1.0`), so `const`/`enum`
//!    membership and duplicate detection behave the way JSON Schema
//!    requires, independent of how the decoder stored the number.
//!
//! 3. **Frozen configuration.** `ValidationOptions` and `InferenceOptions`
//!    are plain immutable values passed at engine construction. Engines hold
//!    no mutable state, so one instance may be shared freely.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `skematic-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod equality;
pub mod error;
pub mod kind;
pub mod options;
pub mod path;

pub use equality::json_equal;
pub use error::SkematicError;
pub use kind::ValueKind;
pub use options::{InferenceOptions, ValidationOptions};
pub use path::InstancePath;
