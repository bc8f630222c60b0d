//! Admissions CSV loading.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use polars::prelude::{CsvReadOptions, DataFrame, SerReader};

use crate::error::{IngestError, Result};

use super::header::{CsvHeaders, parse_csv_line};

/// Maximum file size for CSV loading (500 MB).
pub const MAX_CSV_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Rows sampled by Polars when inferring column types.
const INFER_SCHEMA_ROWS: usize = 100;

fn open_error(path: &Path, error: std::io::Error) -> IngestError {
    if error.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: error,
        }
    }
}

/// Check file size before loading.
pub fn check_file_size(path: &Path) -> Result<()> {
    check_file_size_with_limit(path, MAX_CSV_FILE_SIZE)
}

/// Check file size against a custom limit.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| open_error(path, e))?;

    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }

    Ok(())
}

/// Rejects UTF-16 encoded files. UTF-8 with or without BOM is accepted.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| open_error(path, e))?;

    let mut buffer = [0u8; 4];
    let bytes_read = file.read(&mut buffer).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    if bytes_read >= 2 {
        if buffer[0..2] == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        if buffer[0..2] == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }

    Ok(())
}

/// Reads the header row of a CSV file.
pub fn read_csv_headers(path: &Path) -> Result<CsvHeaders> {
    let file = File::open(path).map_err(|e| open_error(path, e))?;
    let mut reader = BufReader::new(file);
    let mut line = String::new();
    let bytes = reader
        .read_line(&mut line)
        .map_err(|e| IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
    if bytes == 0 {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }

    let cleaned = line.strip_prefix('\u{feff}').unwrap_or(&line);
    let cleaned = cleaned.trim_end_matches(['\r', '\n']);
    if cleaned.trim().is_empty() {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }

    let columns = parse_csv_line(cleaned);
    if columns.iter().any(String::is_empty) {
        return Err(IngestError::EmptyColumnName {
            path: path.to_path_buf(),
        });
    }
    Ok(CsvHeaders::new(columns))
}

/// Reads an admissions CSV file into a Polars DataFrame.
///
/// Column types are inferred from the first rows, so `Age` and
/// `Billing Amount` arrive numeric while `Date of Admission` stays text.
/// Header names are trimmed; the normalizer matches them exactly.
pub fn read_admissions_csv(path: &Path) -> Result<DataFrame> {
    check_file_size(path)?;
    validate_encoding(path)?;
    let headers = read_csv_headers(path)?;

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if df.width() == headers.len() {
        df.set_column_names(headers.columns.iter().map(String::as_str))?;
    } else {
        tracing::warn!(
            path = %path.display(),
            header_columns = headers.len(),
            frame_columns = df.width(),
            "Header row and parsed frame disagree on column count; keeping parsed names"
        );
    }

    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "Loaded admissions CSV"
    );
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_read_csv_headers_trims_names() {
        let file = create_temp_csv(b" Name , Blood Type ,Age\nAda,A+,30\n");
        let headers = read_csv_headers(file.path()).unwrap();
        assert_eq!(headers.columns, vec!["Name", "Blood Type", "Age"]);
    }

    #[test]
    fn test_read_csv_headers_with_bom() {
        let file = create_temp_csv("\u{feff}Name,Age\r\nAda,30\r\n".as_bytes());
        let headers = read_csv_headers(file.path()).unwrap();
        assert_eq!(headers.columns, vec!["Name", "Age"]);
    }

    #[test]
    fn test_read_csv_headers_empty_file() {
        let file = create_temp_csv(b"");
        let result = read_csv_headers(file.path());
        assert!(matches!(result, Err(IngestError::EmptyCsv { .. })));
    }

    #[test]
    fn test_read_csv_headers_blank_column() {
        let file = create_temp_csv(b"Name,,Age\n");
        let result = read_csv_headers(file.path());
        assert!(matches!(result, Err(IngestError::EmptyColumnName { .. })));
    }

    #[test]
    fn test_validate_encoding_rejects_utf16() {
        let file = create_temp_csv(&[0xFF, 0xFE, b'N', 0x00]);
        let result = validate_encoding(file.path());
        assert!(matches!(
            result,
            Err(IngestError::UnsupportedEncoding {
                encoding: "UTF-16 LE",
                ..
            })
        ));
    }

    #[test]
    fn test_check_file_size_with_limit() {
        let file = create_temp_csv(b"Name,Age\nAda,30\n");
        assert!(check_file_size_with_limit(file.path(), 1024).is_ok());
        let result = check_file_size_with_limit(file.path(), 4);
        assert!(matches!(result, Err(IngestError::FileTooLarge { .. })));
    }

    #[test]
    fn test_missing_file() {
        let result = check_file_size(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }
}
