//! Shared utilities for the admissions star-schema crates.

mod values;

pub use values::{any_to_i64, any_to_string, any_to_text, format_numeric, row_key};
