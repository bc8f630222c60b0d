//! Normalization options.

/// Options controlling how the admissions table is normalized.
///
/// The default matches attribute values exactly and accepts only the
/// built-in admission date formats.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Trim surrounding whitespace from categorical values before
    /// deduplication, so `"A+"` and `"A+ "` share one dimension row.
    pub trim_categories: bool,
    /// Extra `chrono` format strings tried after the built-in date formats.
    pub date_formats: Vec<String>,
}

impl NormalizeOptions {
    #[must_use]
    pub fn with_trim_categories(mut self, enable: bool) -> Self {
        self.trim_categories = enable;
        self
    }

    #[must_use]
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_formats.push(format.into());
        self
    }
}
