//! CLI library components for the admissions star-schema normalizer.

pub mod logging;
pub mod pipeline;
