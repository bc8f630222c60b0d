//! Output generation for admissions star schemas.
//!
//! Writes each of the seven tables to `<dir>/<table>.csv` and, optionally, a
//! JSON manifest describing the run.

mod csv;
mod error;
mod manifest;

pub use csv::{WrittenTable, write_star_schema, write_table_csv};
pub use error::{OutputError, Result};
pub use manifest::{RunManifest, TableEntry, write_manifest};
