//! Star-schema normalization of hospital admission records.
//!
//! Takes one flat admissions table (one row per admission event) and splits
//! it into six dimension tables and a fact table that references them by
//! surrogate key.
//!
//! # Overview
//!
//! - **Duplicate removal**: exact full-row duplicates collapse to their first
//!   occurrence; `patient_id` is the position after this step.
//! - **Dimensions**: blood type, medical condition, admission date, doctor,
//!   insurance provider and gender, each with dense zero-based keys assigned
//!   in first-occurrence order. The date dimension also carries day, month
//!   and year.
//! - **Fact table**: patient id, name, age, billing amount and the six
//!   foreign keys.
//! - **Integrity**: [`check_star_schema`] and [`validate`] verify keys,
//!   values and references of a finished schema.
//!
//! # Example
//!
//! ```ignore
//! use star_normalize::{transform, validate};
//!
//! let schema = transform(&admissions)?;
//! assert!(validate(&schema));
//! for (name, table) in schema.tables() {
//!     println!("{name}: {} rows", table.height());
//! }
//! ```

pub mod columns;
mod date;
mod dedupe;
mod dimension;
mod error;
mod fact;
mod integrity;
mod normalizer;
mod options;
mod schema;

pub use date::{decompose, parse_admission_date};
pub use dedupe::drop_exact_duplicates;
pub use dimension::{CategoryDimension, DateDimension, Dimension, SurrogateKey, surrogate_key};
pub use error::{NormalizeError, Result};
pub use integrity::{IntegrityIssue, IntegrityReport, IssueKind, check_star_schema, validate};
pub use normalizer::{transform, transform_with_options};
pub use options::NormalizeOptions;
pub use schema::{StarSchema, TABLE_NAMES};
