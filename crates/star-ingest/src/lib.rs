//! Admissions data ingestion.
//!
//! Loads the flat admissions extract (one row per admission event) from a CSV
//! file into a Polars `DataFrame`. The loader does not interpret dates; the
//! admission date column stays textual so the normalizer owns date parsing
//! and its failure mode.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use star_ingest::read_admissions_csv;
//!
//! let df = read_admissions_csv(Path::new("data/healthcare_dataset.csv"))?;
//! println!("{} admissions", df.height());
//! ```

mod csv;
mod error;

pub use csv::{
    CsvHeaders, MAX_CSV_FILE_SIZE, check_file_size, check_file_size_with_limit,
    read_admissions_csv, read_csv_headers, validate_encoding,
};
pub use error::{IngestError, Result};
