//! Normalization pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Ingest**: read the admissions CSV into a `DataFrame`
//! 2. **Normalize**: split it into six dimensions and a fact table
//! 3. **Check**: verify keys, values and references of the result
//! 4. **Output**: write one CSV per table plus `manifest.json`
//!
//! Each stage takes the output of the previous stage and returns typed results.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::{info, info_span, warn};

use star_normalize::{
    IntegrityReport, NormalizeOptions, StarSchema, check_star_schema, transform_with_options,
};
use star_output::{RunManifest, TableEntry, WrittenTable, write_manifest, write_star_schema};

/// File name of the run manifest inside the output directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Default output directory: `star/` next to the input file.
pub fn default_output_dir(input: &Path) -> PathBuf {
    input
        .parent()
        .map_or_else(|| PathBuf::from("star"), |dir| dir.join("star"))
}

// ============================================================================
// Stage 1: Ingest
// ============================================================================

/// Read the admissions CSV file.
pub fn ingest(input: &Path) -> Result<DataFrame> {
    let span = info_span!("ingest", path = %input.display());
    let _guard = span.enter();
    let start = Instant::now();

    let frame = star_ingest::read_admissions_csv(input)
        .with_context(|| format!("read {}", input.display()))?;

    info!(
        rows = frame.height(),
        columns = frame.width(),
        duration_ms = start.elapsed().as_millis(),
        "ingest complete"
    );
    Ok(frame)
}

// ============================================================================
// Stage 2: Normalize
// ============================================================================

/// Build the star schema from the ingested frame.
pub fn normalize(input: &DataFrame, options: &NormalizeOptions) -> Result<StarSchema> {
    let start = Instant::now();
    let schema = transform_with_options(input, options).context("normalize admissions")?;
    info!(
        fact_rows = schema.fact_row_count(),
        duration_ms = start.elapsed().as_millis(),
        "normalize complete"
    );
    Ok(schema)
}

// ============================================================================
// Stage 3: Check
// ============================================================================

/// Run the integrity checks on a finished schema.
pub fn check(schema: &StarSchema) -> IntegrityReport {
    let span = info_span!("check");
    let _guard = span.enter();
    let report = check_star_schema(schema);
    if report.is_valid() {
        info!("integrity check passed");
    } else {
        warn!(issue_count = report.issue_count(), "integrity check failed");
    }
    report
}

// ============================================================================
// Stage 4: Output
// ============================================================================

/// Result of the output stage.
#[derive(Debug, Default)]
pub struct OutputResult {
    /// Tables written to disk, in canonical order.
    pub written: Vec<WrittenTable>,
    pub manifest: Option<PathBuf>,
}

/// Output configuration.
pub struct OutputConfig<'a> {
    pub input: &'a Path,
    pub input_rows: usize,
    pub output_dir: &'a Path,
    pub schema: &'a StarSchema,
    pub report: &'a IntegrityReport,
    pub dry_run: bool,
    pub write_manifest: bool,
}

/// Write the seven tables and, unless disabled, the manifest.
pub fn output(config: OutputConfig<'_>) -> Result<OutputResult> {
    let span = info_span!("output", dir = %config.output_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    if config.dry_run {
        info!("output skipped (dry run)");
        return Ok(OutputResult::default());
    }

    let written = write_star_schema(config.schema, config.output_dir)
        .context("write star schema tables")?;

    let manifest = if config.write_manifest {
        let path = config.output_dir.join(MANIFEST_FILE);
        let manifest = RunManifest {
            input: config.input.to_path_buf(),
            input_rows: config.input_rows,
            fact_rows: config.schema.fact_row_count(),
            tables: written.iter().map(TableEntry::from).collect(),
            integrity_issues: config.report.issues.clone(),
        };
        write_manifest(&path, &manifest).context("write manifest")?;
        Some(path)
    } else {
        None
    };

    info!(
        table_count = written.len(),
        duration_ms = start.elapsed().as_millis(),
        "output complete"
    );
    Ok(OutputResult { written, manifest })
}

// ============================================================================
// Full run
// ============================================================================

/// Settings for one end-to-end run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub output_dir: PathBuf,
    pub dry_run: bool,
    pub write_manifest: bool,
    pub normalize: NormalizeOptions,
}

impl PipelineOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            dry_run: false,
            write_manifest: true,
            normalize: NormalizeOptions::default(),
        }
    }
}

/// Everything a run produced.
#[derive(Debug)]
pub struct PipelineResult {
    pub input_rows: usize,
    pub schema: StarSchema,
    pub report: IntegrityReport,
    pub output: OutputResult,
}

/// Ingest, normalize, check and write. Nothing is written when the
/// integrity check fails.
pub fn run(input: &Path, options: &PipelineOptions) -> Result<PipelineResult> {
    let span = info_span!("run", input = %input.display());
    let _guard = span.enter();

    let frame = ingest(input)?;
    let schema = normalize(&frame, &options.normalize)?;
    let report = check(&schema);

    let written = if report.is_valid() {
        output(OutputConfig {
            input,
            input_rows: frame.height(),
            output_dir: &options.output_dir,
            schema: &schema,
            report: &report,
            dry_run: options.dry_run,
            write_manifest: options.write_manifest,
        })?
    } else {
        warn!("outputs not written because of integrity issues");
        OutputResult::default()
    };

    Ok(PipelineResult {
        input_rows: frame.height(),
        schema,
        report,
        output: written,
    })
}
