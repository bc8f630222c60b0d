use std::path::PathBuf;

use star_normalize::IntegrityIssue;

#[derive(Debug)]
pub struct NormalizeRun {
    pub input: PathBuf,
    pub input_rows: usize,
    pub output_dir: PathBuf,
    pub tables: Vec<TableSummary>,
    pub issues: Vec<IntegrityIssue>,
    pub manifest: Option<PathBuf>,
    pub dry_run: bool,
    pub has_errors: bool,
}

#[derive(Debug)]
pub struct TableSummary {
    pub name: String,
    pub kind: TableKind,
    pub rows: usize,
    pub columns: usize,
    /// Written file, `None` on dry runs or when output was blocked.
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Dimension,
    Fact,
}

impl TableKind {
    pub fn label(self) -> &'static str {
        match self {
            TableKind::Dimension => "dimension",
            TableKind::Fact => "fact",
        }
    }
}
