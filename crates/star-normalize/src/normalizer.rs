//! The admissions → star schema transform.

use chrono::NaiveDate;
use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use tracing::{debug, info, info_span};

use crate::columns::{
    DATE_ADMISSION_DIM, DIMENSIONS, DimensionKind, DimensionSpec, REQUIRED_COLUMNS,
};
use crate::date::{date_column, parse_date_column};
use crate::dedupe::drop_exact_duplicates;
use crate::dimension::{CategoryDimension, DateDimension, column_text_values};
use crate::error::{NormalizeError, Result};
use crate::fact::{AttributeValues, build_fact_table};
use crate::options::NormalizeOptions;
use crate::schema::StarSchema;

/// Normalizes an admissions table into a star schema with default options.
pub fn transform(input: &DataFrame) -> Result<StarSchema> {
    transform_with_options(input, &NormalizeOptions::default())
}

/// Normalizes an admissions table into a star schema.
///
/// The input is borrowed and never modified. Any error aborts the whole run.
pub fn transform_with_options(input: &DataFrame, options: &NormalizeOptions) -> Result<StarSchema> {
    let span = info_span!("normalize", input_rows = input.height());
    let _guard = span.enter();

    check_required_columns(input)?;

    let dates = parse_date_column(
        input.column(DATE_ADMISSION_DIM.source_column)?,
        &options.date_formats,
    )?;
    let working = prepare_working_frame(input, &dates, options)?;

    let (deduped, kept) = drop_exact_duplicates(&working)?;
    let dates: Vec<NaiveDate> = kept.iter().map(|&idx| dates[idx]).collect();
    let row_count = deduped.height();

    let date_dimension = DateDimension::from_values(&dates)?;
    debug!(
        dimension = DATE_ADMISSION_DIM.table,
        members = date_dimension.len(),
        "Built dimension"
    );
    let categories = DIMENSIONS
        .iter()
        .map(|spec| category_dimension(&deduped, spec))
        .collect::<Result<Vec<_>>>()?;

    let attributes: [AttributeValues<'_>; 6] =
        std::array::from_fn(|idx| match &categories[idx] {
            Some((values, dimension)) => AttributeValues::Category(values, dimension),
            None => AttributeValues::Date(&dates, &date_dimension),
        });
    let fact_table = build_fact_table(&deduped, &attributes)?;

    let frames: [Result<DataFrame>; 6] =
        std::array::from_fn(|idx| attributes[idx].to_frame(&DIMENSIONS[idx]));
    let [
        blood_type_dim,
        medical_condition_dim,
        date_admission_dim,
        doctor_dim,
        insurance_provider_dim,
        gender_dim,
    ] = frames;
    let schema = StarSchema {
        blood_type_dim: blood_type_dim?,
        medical_condition_dim: medical_condition_dim?,
        date_admission_dim: date_admission_dim?,
        doctor_dim: doctor_dim?,
        insurance_provider_dim: insurance_provider_dim?,
        gender_dim: gender_dim?,
        fact_table,
    };

    info!(
        input_rows = input.height(),
        fact_rows = row_count,
        duplicates_dropped = input.height() - row_count,
        "Normalized admissions into star schema"
    );

    Ok(schema)
}

/// Distinct values of a categorical dimension; `None` for the date dimension.
fn category_dimension(
    deduped: &DataFrame,
    spec: &DimensionSpec,
) -> Result<Option<(Vec<Option<String>>, CategoryDimension)>> {
    if spec.kind != DimensionKind::Categorical {
        return Ok(None);
    }
    let values = column_text_values(deduped.column(spec.source_column)?, false)?;
    let dimension = CategoryDimension::from_values(&values)?;
    debug!(
        dimension = spec.table,
        members = dimension.len(),
        "Built dimension"
    );
    Ok(Some((values, dimension)))
}

fn check_required_columns(input: &DataFrame) -> Result<()> {
    for name in REQUIRED_COLUMNS {
        if input.column(name).is_err() {
            return Err(NormalizeError::ColumnNotFound(name.to_string()));
        }
    }
    Ok(())
}

/// Copies the input with the admission date replaced by a `Date` column and,
/// when requested, categorical values trimmed.
///
/// Duplicate detection runs on this frame, so textual variants of one date
/// (or of one trimmed category) count as the same value.
fn prepare_working_frame(
    input: &DataFrame,
    dates: &[NaiveDate],
    options: &NormalizeOptions,
) -> Result<DataFrame> {
    let mut working = input.clone();
    working.with_column(date_column(DATE_ADMISSION_DIM.source_column, dates)?)?;
    if options.trim_categories {
        for spec in DIMENSIONS
            .iter()
            .filter(|spec| spec.kind == DimensionKind::Categorical)
        {
            let trimmed = column_text_values(input.column(spec.source_column)?, true)?;
            working.with_column(Series::new(spec.source_column.into(), trimmed).into_column())?;
        }
    }
    Ok(working)
}
