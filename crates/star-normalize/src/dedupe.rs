//! Exact duplicate row removal.

use std::collections::HashSet;

use polars::prelude::{BooleanChunked, Column, DataFrame, NewChunkedArray};
use star_common::row_key;

use crate::error::Result;

/// Returns the indices of the first occurrence of every distinct row.
///
/// Rows are compared across all columns. Indices are ascending, so the input
/// order of the surviving rows is preserved.
pub fn first_occurrence_rows(df: &DataFrame) -> Result<Vec<usize>> {
    let columns: Vec<&Column> = df.get_columns().iter().collect();
    let mut seen = HashSet::with_capacity(df.height());
    let mut kept = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        if seen.insert(row_key(&columns, idx)?) {
            kept.push(idx);
        }
    }
    Ok(kept)
}

/// Drops exact full-row duplicates, keeping first occurrences in input order.
///
/// Returns the deduplicated frame and the input index of each surviving row.
pub fn drop_exact_duplicates(df: &DataFrame) -> Result<(DataFrame, Vec<usize>)> {
    let kept = first_occurrence_rows(df)?;
    if kept.len() == df.height() {
        return Ok((df.clone(), kept));
    }
    let mut keep = vec![false; df.height()];
    for &idx in &kept {
        keep[idx] = true;
    }
    let mask = BooleanChunked::from_slice("dedupe".into(), &keep);
    let deduped = df.filter(&mask)?;
    tracing::debug!(
        input_rows = df.height(),
        kept_rows = deduped.height(),
        "Dropped exact duplicate rows"
    );
    Ok((deduped, kept))
}
