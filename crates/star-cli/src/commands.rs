use anyhow::Result;
use comfy_table::Table;
use tracing::info_span;

use star_normalize::columns::{DIMENSIONS, FACT_TABLE, REQUIRED_COLUMNS, fact_columns};
use star_normalize::NormalizeOptions;

use star_cli::pipeline::{PipelineOptions, default_output_dir, run};

use crate::cli::NormalizeArgs;
use crate::summary::apply_table_style;
use crate::types::{NormalizeRun, TableKind, TableSummary};

pub fn run_tables() {
    let mut input = Table::new();
    input.set_header(vec!["Input column"]);
    apply_table_style(&mut input);
    for column in REQUIRED_COLUMNS {
        input.add_row(vec![column]);
    }
    println!("{input}");

    let mut output = Table::new();
    output.set_header(vec!["Table", "Source column", "Columns"]);
    apply_table_style(&mut output);
    for spec in &DIMENSIONS {
        output.add_row(vec![
            spec.table.to_string(),
            spec.source_column.to_string(),
            spec.columns().join(", "),
        ]);
    }
    output.add_row(vec![
        FACT_TABLE.to_string(),
        "-".to_string(),
        fact_columns().join(", "),
    ]);
    println!("{output}");
}

pub fn run_normalize(args: &NormalizeArgs) -> Result<NormalizeRun> {
    let span = info_span!("normalize", input = %args.input.display());
    let _guard = span.enter();

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| default_output_dir(&args.input));

    let mut normalize = NormalizeOptions::default().with_trim_categories(args.trim_categories);
    for format in &args.date_formats {
        normalize = normalize.with_date_format(format.clone());
    }
    let options = PipelineOptions {
        output_dir: output_dir.clone(),
        dry_run: args.dry_run,
        write_manifest: !args.no_manifest,
        normalize,
    };

    let result = run(&args.input, &options)?;

    let tables = result
        .schema
        .tables()
        .into_iter()
        .map(|(name, frame)| TableSummary {
            name: name.to_string(),
            kind: if name == FACT_TABLE {
                TableKind::Fact
            } else {
                TableKind::Dimension
            },
            rows: frame.height(),
            columns: frame.width(),
            file: result
                .output
                .written
                .iter()
                .find(|table| table.name == name)
                .map(|table| table.path.clone()),
        })
        .collect();

    Ok(NormalizeRun {
        input: args.input.clone(),
        input_rows: result.input_rows,
        output_dir,
        tables,
        has_errors: !result.report.is_valid(),
        issues: result.report.issues,
        manifest: result.output.manifest,
        dry_run: args.dry_run,
    })
}
