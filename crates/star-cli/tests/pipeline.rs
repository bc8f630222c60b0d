//! Integration tests for the pipeline module.

use std::fs;
use std::path::{Path, PathBuf};

use star_cli::pipeline::{MANIFEST_FILE, PipelineOptions, default_output_dir, run};
use tempfile::TempDir;

const HEADER: &str = "Name,Age,Gender,Blood Type,Medical Condition,Date of Admission,Doctor,Hospital,Insurance Provider,Billing Amount";

fn write_csv(dir: &Path, rows: &[&str]) -> PathBuf {
    let mut text = String::from(HEADER);
    text.push('\n');
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    let path = dir.join("admissions.csv");
    fs::write(&path, text).expect("write csv");
    path
}

fn sample_rows() -> Vec<&'static str> {
    vec![
        "Bobby Jackson,30,Male,B-,Cancer,2024-01-31,Matthew Smith,Sons and Miller,Blue Cross,18856.28",
        "Danny Smith,76,Female,A-,Obesity,2022-09-22,Tiffany Mitchell,Cook PLC,Aetna,27955.10",
        "Bobby Jackson,30,Male,B-,Cancer,2024-01-31,Matthew Smith,Sons and Miller,Blue Cross,18856.28",
    ]
}

#[test]
fn run_writes_tables_and_manifest() {
    let temp = TempDir::new().expect("temp dir");
    let input = write_csv(temp.path(), &sample_rows());
    let out_dir = temp.path().join("out");

    let result = run(&input, &PipelineOptions::new(&out_dir)).expect("run");

    assert_eq!(result.input_rows, 3);
    assert_eq!(result.schema.fact_row_count(), 2);
    assert!(result.report.is_valid());
    assert_eq!(result.output.written.len(), 7);
    assert_eq!(result.output.manifest, Some(out_dir.join(MANIFEST_FILE)));
    assert!(out_dir.join("fact_table.csv").exists());
    assert!(out_dir.join(MANIFEST_FILE).exists());
}

#[test]
fn dry_run_writes_nothing() {
    let temp = TempDir::new().expect("temp dir");
    let input = write_csv(temp.path(), &sample_rows());
    let out_dir = temp.path().join("out");
    let mut options = PipelineOptions::new(&out_dir);
    options.dry_run = true;

    let result = run(&input, &options).expect("run");

    assert_eq!(result.schema.fact_row_count(), 2);
    assert!(result.output.written.is_empty());
    assert!(result.output.manifest.is_none());
    assert!(!out_dir.exists());
}

#[test]
fn manifest_can_be_skipped() {
    let temp = TempDir::new().expect("temp dir");
    let input = write_csv(temp.path(), &sample_rows());
    let out_dir = temp.path().join("out");
    let mut options = PipelineOptions::new(&out_dir);
    options.write_manifest = false;

    let result = run(&input, &options).expect("run");

    assert_eq!(result.output.written.len(), 7);
    assert!(result.output.manifest.is_none());
    assert!(!out_dir.join(MANIFEST_FILE).exists());
}

#[test]
fn normalize_options_reach_the_transform() {
    let temp = TempDir::new().expect("temp dir");
    let input = write_csv(
        temp.path(),
        &[
            "Ann,30,Female,A+,Asthma,15.01.2020,Dr One,H,Medicare,10.5",
            "Bea,31,Female,A+ ,Asthma,16.01.2020,Dr One,H,Medicare,11.5",
        ],
    );
    let mut options = PipelineOptions::new(temp.path().join("out"));
    options.dry_run = true;
    options.normalize = options
        .normalize
        .with_trim_categories(true)
        .with_date_format("%d.%m.%Y");

    let result = run(&input, &options).expect("run");

    assert_eq!(result.schema.blood_type_dim.height(), 1);
    assert_eq!(result.schema.date_admission_dim.height(), 2);
}

#[test]
fn missing_column_fails_with_context() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("admissions.csv");
    fs::write(&path, "Name,Age\nAnn,30\n").expect("write csv");

    let error = run(&path, &PipelineOptions::new(temp.path().join("out"))).expect_err("fails");

    insta::assert_snapshot!(format!("{error:#}"), @"normalize admissions: column not found: Billing Amount");
    assert!(!temp.path().join("out").exists());
}

#[test]
fn missing_input_file_fails() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("absent.csv");

    let error = run(&path, &PipelineOptions::new(temp.path().join("out"))).expect_err("fails");

    assert!(format!("{error:#}").starts_with(&format!("read {}", path.display())));
}

#[test]
fn default_output_dir_sits_next_to_input() {
    assert_eq!(
        default_output_dir(Path::new("/data/admissions.csv")),
        PathBuf::from("/data/star")
    );
    assert_eq!(default_output_dir(Path::new("admissions.csv")), PathBuf::from("star"));
}
