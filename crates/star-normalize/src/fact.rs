//! Fact table assembly.
//!
//! Each deduplicated admission row is resolved against the dimension lookups
//! by exact attribute value. This is the in-memory equivalent of inner-joining
//! the rows with every dimension on the attribute column, except that a value
//! resolving to anything other than exactly one key is reported instead of
//! silently adding or dropping rows.

use chrono::NaiveDate;
use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};

use crate::columns::{DIMENSIONS, DimensionSpec, FACT_MEASURES, FACT_TABLE, PATIENT_ID};
use crate::dimension::{CategoryDimension, DateDimension, SurrogateKey, surrogate_key};
use crate::error::{NormalizeError, Result};

/// Attribute values of the deduplicated rows, column by column.
pub(crate) enum AttributeValues<'a> {
    Category(&'a [Option<String>], &'a CategoryDimension),
    Date(&'a [NaiveDate], &'a DateDimension),
}

impl AttributeValues<'_> {
    /// Renders the dimension behind these values as a table.
    pub(crate) fn to_frame(&self, spec: &DimensionSpec) -> Result<DataFrame> {
        match self {
            Self::Category(_, dimension) => dimension.to_frame(spec),
            Self::Date(_, dimension) => dimension.to_frame(spec),
        }
    }

    fn resolve(&self, row: usize) -> Option<SurrogateKey> {
        match self {
            Self::Category(values, dimension) => dimension.key_of(values.get(row)?),
            Self::Date(values, dimension) => dimension.key_of(values.get(row)?),
        }
    }
}

/// Resolves one dimension's foreign keys for every fact row.
fn foreign_key_column(
    spec: &DimensionSpec,
    values: &AttributeValues<'_>,
    row_count: usize,
) -> Result<Column> {
    let keys: Vec<SurrogateKey> = (0..row_count)
        .filter_map(|row| values.resolve(row))
        .collect();
    if keys.len() != row_count {
        return Err(NormalizeError::JoinCardinality {
            dimension: spec.table.to_string(),
            expected: row_count,
            actual: keys.len(),
        });
    }
    Ok(Series::new(spec.id_column.into(), keys).into_column())
}

/// Builds the fact table from deduplicated rows and resolved dimensions.
///
/// `attributes[i]` holds the values of `DIMENSIONS[i]`.
pub(crate) fn build_fact_table(
    deduped: &DataFrame,
    attributes: &[AttributeValues<'_>; 6],
) -> Result<DataFrame> {
    let row_count = deduped.height();
    let mut columns: Vec<Column> = Vec::with_capacity(1 + FACT_MEASURES.len() + attributes.len());

    let patient_ids = (0..row_count)
        .map(surrogate_key)
        .collect::<Result<Vec<_>>>()?;
    columns.push(Series::new(PATIENT_ID.into(), patient_ids).into_column());

    for (source, target) in FACT_MEASURES {
        let measure = deduped.column(source)?;
        let renamed = measure
            .as_materialized_series()
            .clone()
            .with_name(target.into());
        columns.push(renamed.into_column());
    }

    for (spec, values) in DIMENSIONS.iter().zip(attributes) {
        columns.push(foreign_key_column(spec, values, row_count)?);
    }

    let fact = DataFrame::new(columns)?;
    if fact.height() != row_count {
        return Err(NormalizeError::JoinCardinality {
            dimension: FACT_TABLE.to_string(),
            expected: row_count,
            actual: fact.height(),
        });
    }
    Ok(fact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::GENDER_DIM;

    #[test]
    fn unresolved_value_is_a_cardinality_error() {
        let known = vec![Some("Female".to_string())];
        let dimension = CategoryDimension::from_values(&known).unwrap();
        let rows = vec![Some("Female".to_string()), Some("Male".to_string())];
        let values = AttributeValues::Category(&rows, &dimension);

        let err = foreign_key_column(&GENDER_DIM, &values, rows.len()).unwrap_err();
        assert!(matches!(
            err,
            NormalizeError::JoinCardinality {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }
}
