//! Shared fixtures for normalization tests.

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::{Column, DataFrame, DataType, IntoColumn, NamedFrom, Series, TimeUnit};

/// One admissions input row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Admission {
    pub name: String,
    pub age: i64,
    pub billing_cents: i64,
    pub blood_type: String,
    pub medical_condition: String,
    pub date: String,
    pub doctor: String,
    pub insurance_provider: String,
    pub gender: String,
}

impl Admission {
    pub fn new(name: &str, blood_type: &str, date: &str) -> Self {
        Self {
            name: name.to_string(),
            age: 40,
            billing_cents: 1_250_050,
            blood_type: blood_type.to_string(),
            medical_condition: "Asthma".to_string(),
            date: date.to_string(),
            doctor: "Matthew Smith".to_string(),
            insurance_provider: "Medicare".to_string(),
            gender: "Female".to_string(),
        }
    }
}

fn text_column(name: &str, rows: &[Admission], field: fn(&Admission) -> &str) -> Column {
    let values: Vec<&str> = rows.iter().map(field).collect();
    Series::new(name.into(), values).into_column()
}

/// Builds an input frame with the nine admissions columns.
pub fn admissions_frame(rows: &[Admission]) -> DataFrame {
    let ages: Vec<i64> = rows.iter().map(|row| row.age).collect();
    let billing: Vec<f64> = rows
        .iter()
        .map(|row| row.billing_cents as f64 / 100.0)
        .collect();
    DataFrame::new(vec![
        text_column("Name", rows, |row| row.name.as_str()),
        Series::new("Age".into(), ages).into_column(),
        text_column("Gender", rows, |row| row.gender.as_str()),
        text_column("Blood Type", rows, |row| row.blood_type.as_str()),
        text_column("Medical Condition", rows, |row| row.medical_condition.as_str()),
        text_column("Date of Admission", rows, |row| row.date.as_str()),
        text_column("Doctor", rows, |row| row.doctor.as_str()),
        text_column("Insurance Provider", rows, |row| row.insurance_provider.as_str()),
        Series::new("Billing Amount".into(), billing).into_column(),
    ])
    .expect("admissions frame")
}

/// Copy of `frame` with one column swapped for `column` (matched by name).
pub fn replace_column(frame: &DataFrame, column: Column) -> DataFrame {
    let mut frame = frame.clone();
    frame.with_column(column).expect("replace column");
    frame
}

/// A `Date`-typed admission date column from ISO text.
pub fn typed_dates(dates: &[&str]) -> Column {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("epoch");
    let days: Vec<i32> = dates
        .iter()
        .map(|text| {
            let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").expect("iso date");
            i32::try_from((date - epoch).num_days()).expect("day range")
        })
        .collect();
    Series::new("Date of Admission".into(), days)
        .cast(&DataType::Date)
        .expect("date cast")
        .into_column()
}

/// A naive millisecond `Datetime`-typed admission date column from
/// `YYYY-MM-DD HH:MM:SS` text.
pub fn typed_datetimes(datetimes: &[&str]) -> Column {
    let millis: Vec<i64> = datetimes
        .iter()
        .map(|text| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
                .expect("datetime")
                .and_utc()
                .timestamp_millis()
        })
        .collect();
    Series::new("Date of Admission".into(), millis)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
        .expect("datetime cast")
        .into_column()
}

/// Reads a column as strings via the shared helper.
pub fn strings(frame: &DataFrame, column: &str) -> Vec<String> {
    let column = frame.column(column).expect("column present");
    (0..column.len())
        .map(|idx| star_common::any_to_string(column.get(idx).expect("cell")))
        .collect()
}

/// Reads an integer column.
pub fn integers(frame: &DataFrame, column: &str) -> Vec<i64> {
    let column = frame.column(column).expect("column present");
    (0..column.len())
        .map(|idx| star_common::any_to_i64(column.get(idx).expect("cell")).expect("integer"))
        .collect()
}

pub fn column_names(frame: &DataFrame) -> Vec<String> {
    frame
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}
