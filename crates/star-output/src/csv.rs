//! CSV export of star-schema tables.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use star_normalize::StarSchema;

use crate::error::{OutputError, Result};

/// A table written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenTable {
    pub name: String,
    pub path: PathBuf,
    pub rows: usize,
    pub columns: usize,
}

/// Writes one table as CSV with a header row. Dates are written as ISO 8601.
pub fn write_table_csv(frame: &DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path).map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    // CsvWriter::finish needs a mutable frame
    let mut frame = frame.clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut frame)
        .map_err(|e| OutputError::Polars {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    Ok(())
}

/// Writes all seven tables of a star schema into `dir` as `<table>.csv`.
///
/// The directory is created if missing; existing files are overwritten.
pub fn write_star_schema(schema: &StarSchema, dir: &Path) -> Result<Vec<WrittenTable>> {
    fs::create_dir_all(dir).map_err(|source| OutputError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(7);
    for (name, frame) in schema.tables() {
        let path = dir.join(format!("{name}.csv"));
        write_table_csv(frame, &path)?;
        tracing::debug!(
            table = name,
            rows = frame.height(),
            path = %path.display(),
            "Wrote table"
        );
        written.push(WrittenTable {
            name: name.to_string(),
            path,
            rows: frame.height(),
            columns: frame.width(),
        });
    }
    Ok(written)
}
