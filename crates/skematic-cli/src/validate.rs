//! # Validate Subcommand
//!
//! Loads a schema and a document, runs the validation engine, prints a
//! report. The process exit code reflects the outcome: 0 for valid, 1 for
//! invalid.

use std::path::PathBuf;

use clap::Args;

use skematic_core::ValidationOptions;
use skematic_schema::Validator;

use crate::loader;
use crate::report::{self, ReportFormat};

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema file (JSON or YAML).
    pub schema: PathBuf,

    /// Document file to validate (JSON or YAML).
    pub document: PathBuf,

    /// Enforce `additionalProperties: false`.
    #[arg(long)]
    pub strict: bool,

    /// Skip `format` keyword checks.
    #[arg(long)]
    pub no_formats: bool,

    /// Leave local `$ref` nodes unresolved (and unvalidated).
    #[arg(long)]
    pub no_resolve_refs: bool,

    /// Maximum schema evaluation depth.
    #[arg(long, default_value_t = 64)]
    pub max_depth: usize,

    /// Report output format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Run validation; returns whether the document was valid.
pub fn run(args: &ValidateArgs) -> anyhow::Result<bool> {
    let schema = loader::load_document(&args.schema)?;
    let document = loader::load_document(&args.document)?;

    let options = ValidationOptions {
        strict_mode: args.strict,
        check_formats: !args.no_formats,
        resolve_references: !args.no_resolve_refs,
        max_depth: args.max_depth,
    };
    tracing::debug!(?options, schema = %args.schema.display(), "validating document");

    let result = Validator::new(options).validate(&document, &schema);
    println!("{}", report::render_validation(&result, args.format));
    Ok(result.is_valid)
}
