//! JSON run manifest.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::Serialize;
use star_normalize::IntegrityIssue;

use crate::csv::WrittenTable;
use crate::error::{OutputError, Result};

/// One output table as recorded in the manifest.
#[derive(Debug, Clone, Serialize)]
pub struct TableEntry {
    pub name: String,
    pub file: PathBuf,
    pub rows: usize,
    pub columns: usize,
}

impl From<&WrittenTable> for TableEntry {
    fn from(table: &WrittenTable) -> Self {
        Self {
            name: table.name.clone(),
            file: table.path.clone(),
            rows: table.rows,
            columns: table.columns,
        }
    }
}

/// Summary of one normalization run.
#[derive(Debug, Clone, Serialize)]
pub struct RunManifest {
    pub input: PathBuf,
    pub input_rows: usize,
    pub fact_rows: usize,
    pub tables: Vec<TableEntry>,
    pub integrity_issues: Vec<IntegrityIssue>,
}

/// Writes the manifest as pretty-printed JSON.
pub fn write_manifest(path: &Path, manifest: &RunManifest) -> Result<()> {
    let file = File::create(path).map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::to_writer_pretty(BufWriter::new(file), manifest).map_err(|source| {
        OutputError::Manifest {
            path: path.to_path_buf(),
            source,
        }
    })
}
