//! # Infer Subcommand
//!
//! Loads a sample corpus and prints the inferred schema with its
//! confidence score and any analysis warnings.

use std::path::PathBuf;

use clap::Args;

use skematic_core::InferenceOptions;
use skematic_infer::SchemaInferrer;

use crate::loader;
use crate::report::{self, ReportFormat};

/// Arguments for the infer subcommand.
#[derive(Args, Debug)]
pub struct InferArgs {
    /// Sample files (JSON or YAML). A single file whose top level is an
    /// array contributes one sample per element.
    #[arg(required = true)]
    pub samples: Vec<PathBuf>,

    /// Maximum distinct scalar values for a branch to become an enum.
    #[arg(long)]
    pub enum_threshold: Option<usize>,

    /// Disable string format detection.
    #[arg(long)]
    pub no_formats: bool,

    /// Disable enum detection.
    #[arg(long)]
    pub no_enums: bool,

    /// Synthesize only always-present properties.
    #[arg(long)]
    pub required_only: bool,

    /// Report output format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Run inference over the sample corpus.
pub fn run(args: &InferArgs) -> anyhow::Result<()> {
    let samples = loader::load_samples(&args.samples)?;

    let defaults = InferenceOptions::default();
    let options = InferenceOptions {
        infer_formats: !args.no_formats,
        infer_enums: !args.no_enums,
        enum_threshold: args.enum_threshold.unwrap_or(defaults.enum_threshold),
        generate_optional: !args.required_only,
    };
    tracing::debug!(?options, sample_count = samples.len(), "inferring schema");

    let result = SchemaInferrer::new(options).infer(&samples);
    println!("{}", report::render_inference(&result, args.format));
    Ok(())
}
