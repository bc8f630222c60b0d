//! Integrity checks over a star schema.
//!
//! [`check_star_schema`] inspects the seven output tables without trusting
//! how they were produced, so it can also vet tables that were written out
//! and read back, or assembled by hand.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use polars::prelude::{AnyValue, Column, DataFrame};
use serde::Serialize;
use star_common::{any_to_i64, any_to_text};

use crate::columns::{
    DATE_ADMISSION_DAY, DATE_ADMISSION_MONTH, DATE_ADMISSION_YEAR, DIMENSIONS, DimensionKind,
    DimensionSpec, FACT_TABLE, PATIENT_ID, fact_columns,
};
use crate::date::{date_from_epoch_days, decompose, parse_admission_date};
use crate::schema::StarSchema;

/// Category of an integrity problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingColumn,
    NullKey,
    DuplicateKey,
    NonDenseKeys,
    DuplicateValue,
    DateMismatch,
    DanglingForeignKey,
}

impl IssueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingColumn => "missing_column",
            Self::NullKey => "null_key",
            Self::DuplicateKey => "duplicate_key",
            Self::NonDenseKeys => "non_dense_keys",
            Self::DuplicateValue => "duplicate_value",
            Self::DateMismatch => "date_mismatch",
            Self::DanglingForeignKey => "dangling_foreign_key",
        }
    }
}

/// One integrity problem found in a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityIssue {
    pub table: String,
    pub column: String,
    pub kind: IssueKind,
    pub message: String,
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} [{}]: {}",
            self.table,
            self.column,
            self.kind.as_str(),
            self.message
        )
    }
}

/// Outcome of [`check_star_schema`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct IntegrityReport {
    pub issues: Vec<IntegrityIssue>,
}

impl IntegrityReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    /// Issues raised against one table.
    pub fn issues_for<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a IntegrityIssue> {
        self.issues.iter().filter(move |issue| issue.table == table)
    }

    fn push(&mut self, table: &str, column: &str, kind: IssueKind, message: impl Into<String>) {
        self.issues.push(IntegrityIssue {
            table: table.to_string(),
            column: column.to_string(),
            kind,
            message: message.into(),
        });
    }
}

/// Passes when the star schema has no integrity issues.
pub fn validate(outputs: &StarSchema) -> bool {
    check_star_schema(outputs).is_valid()
}

/// Checks keys, values and references across all seven tables.
pub fn check_star_schema(outputs: &StarSchema) -> IntegrityReport {
    let mut report = IntegrityReport::default();
    let mut dimension_keys = Vec::with_capacity(DIMENSIONS.len());
    for spec in &DIMENSIONS {
        let keys = match outputs.get(spec.table) {
            Some(frame) => check_dimension(spec, frame, &mut report),
            None => BTreeSet::new(),
        };
        dimension_keys.push(keys);
    }
    check_fact_table(&outputs.fact_table, &dimension_keys, &mut report);

    for issue in &report.issues {
        tracing::warn!(
            table = %issue.table,
            column = %issue.column,
            kind = issue.kind.as_str(),
            "{}",
            issue.message
        );
    }
    report
}

fn require_columns<'a>(
    table: &str,
    frame: &'a DataFrame,
    names: &[&str],
    report: &mut IntegrityReport,
) -> Option<Vec<&'a Column>> {
    let mut columns = Vec::with_capacity(names.len());
    let mut missing = false;
    for name in names {
        match frame.column(name) {
            Ok(column) => columns.push(column),
            Err(_) => {
                report.push(table, name, IssueKind::MissingColumn, "column is missing");
                missing = true;
            }
        }
    }
    (!missing).then_some(columns)
}

fn cell(column: &Column, row: usize) -> AnyValue<'_> {
    column.get(row).unwrap_or(AnyValue::Null)
}

/// Checks that a key column holds exactly `0..len`; returns the keys seen.
fn check_dense_keys(
    table: &str,
    column: &Column,
    report: &mut IntegrityReport,
) -> BTreeSet<i64> {
    let mut keys = BTreeSet::new();
    let mut nulls = 0usize;
    let mut duplicates = 0usize;
    for row in 0..column.len() {
        match any_to_i64(cell(column, row)) {
            Some(key) => {
                if !keys.insert(key) {
                    duplicates += 1;
                }
            }
            None => nulls += 1,
        }
    }
    let name = column.name().as_str();
    if nulls > 0 {
        report.push(table, name, IssueKind::NullKey, format!("{nulls} null keys"));
    }
    if duplicates > 0 {
        report.push(
            table,
            name,
            IssueKind::DuplicateKey,
            format!("{duplicates} repeated keys"),
        );
    }
    let dense = keys.len() == column.len()
        && keys.first().is_none_or(|first| *first == 0)
        && keys
            .last()
            .is_none_or(|last| usize::try_from(*last).is_ok_and(|last| last + 1 == keys.len()));
    if nulls == 0 && duplicates == 0 && !dense {
        report.push(
            table,
            name,
            IssueKind::NonDenseKeys,
            format!("keys are not the range 0..{}", column.len()),
        );
    }
    keys
}

fn check_dimension(
    spec: &DimensionSpec,
    frame: &DataFrame,
    report: &mut IntegrityReport,
) -> BTreeSet<i64> {
    let names = spec.columns();
    let Some(columns) = require_columns(spec.table, frame, &names, report) else {
        return BTreeSet::new();
    };
    let keys = check_dense_keys(spec.table, columns[0], report);

    let values = columns[1];
    let mut seen = HashSet::with_capacity(values.len());
    let mut duplicates = 0usize;
    for row in 0..values.len() {
        if !seen.insert(any_to_text(cell(values, row))) {
            duplicates += 1;
        }
    }
    if duplicates > 0 {
        report.push(
            spec.table,
            spec.value_column,
            IssueKind::DuplicateValue,
            format!("{duplicates} repeated values"),
        );
    }

    if spec.kind == DimensionKind::Date {
        check_date_parts(spec, &columns, report);
    }
    keys
}

fn check_date_parts(spec: &DimensionSpec, columns: &[&Column], report: &mut IntegrityReport) {
    let (dates, days, months, years) = (columns[1], columns[2], columns[3], columns[4]);
    let mut mismatches = Vec::new();
    for row in 0..dates.len() {
        let Some(date) = (match cell(dates, row) {
            AnyValue::Date(epoch) => date_from_epoch_days(epoch),
            AnyValue::String(text) => parse_admission_date(text, &[]),
            _ => None,
        }) else {
            mismatches.push(row);
            continue;
        };
        let (day, month, year) = decompose(date);
        let stored = (
            any_to_i64(cell(days, row)),
            any_to_i64(cell(months, row)),
            any_to_i64(cell(years, row)),
        );
        if stored != (Some(i64::from(day)), Some(i64::from(month)), Some(i64::from(year))) {
            mismatches.push(row);
        }
    }
    if !mismatches.is_empty() {
        report.push(
            spec.table,
            spec.value_column,
            IssueKind::DateMismatch,
            format!(
                "{} rows where {DATE_ADMISSION_DAY}/{DATE_ADMISSION_MONTH}/{DATE_ADMISSION_YEAR} \
                 disagree with the date (first at row {})",
                mismatches.len(),
                mismatches[0]
            ),
        );
    }
}

fn check_fact_table(
    fact: &DataFrame,
    dimension_keys: &[BTreeSet<i64>],
    report: &mut IntegrityReport,
) {
    let names = fact_columns();
    if require_columns(FACT_TABLE, fact, &names, report).is_none() {
        return;
    }
    if let Ok(patient_ids) = fact.column(PATIENT_ID) {
        check_dense_keys(FACT_TABLE, patient_ids, report);
    }

    for (spec, keys) in DIMENSIONS.iter().zip(dimension_keys) {
        let Ok(column) = fact.column(spec.id_column) else {
            continue;
        };
        let mut nulls = 0usize;
        let mut dangling = 0usize;
        for row in 0..column.len() {
            match any_to_i64(cell(column, row)) {
                Some(key) if keys.contains(&key) => {}
                Some(_) => dangling += 1,
                None => nulls += 1,
            }
        }
        if nulls > 0 {
            report.push(
                FACT_TABLE,
                spec.id_column,
                IssueKind::NullKey,
                format!("{nulls} null foreign keys"),
            );
        }
        if dangling > 0 {
            report.push(
                FACT_TABLE,
                spec.id_column,
                IssueKind::DanglingForeignKey,
                format!("{dangling} keys not found in {}", spec.table),
            );
        }
    }
}
