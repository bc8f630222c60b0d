//! Dimension extraction.
//!
//! A dimension holds the distinct values of one attribute. Surrogate keys are
//! assigned by first occurrence: walking the deduplicated rows top to bottom,
//! the first unseen value gets id 0, the next unseen value id 1, and so on.
//! Keys are therefore dense, zero-based, unique, and stable for a given row
//! order.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::NaiveDate;
use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use star_common::any_to_text;

use crate::columns::{
    DATE_ADMISSION_DAY, DATE_ADMISSION_MONTH, DATE_ADMISSION_YEAR, DimensionKind, DimensionSpec,
};
use crate::date::{date_column, decompose};
use crate::error::{NormalizeError, Result};

/// Surrogate key type used by every dimension and the fact table.
pub type SurrogateKey = u32;

/// Surrogate key for a zero-based position.
pub fn surrogate_key(position: usize) -> Result<SurrogateKey> {
    SurrogateKey::try_from(position).map_err(|_| NormalizeError::KeyOverflow { position })
}

/// Distinct values of one attribute with their surrogate keys.
#[derive(Debug, Clone)]
pub struct Dimension<K> {
    values: Vec<K>,
    keys: HashMap<K, SurrogateKey>,
}

impl<K: Clone + Eq + Hash> Dimension<K> {
    /// Collects distinct values in first-occurrence order.
    pub fn from_values<'a, I>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let mut dimension = Self {
            values: Vec::new(),
            keys: HashMap::new(),
        };
        for value in values {
            if !dimension.keys.contains_key(value) {
                let key = surrogate_key(dimension.values.len())?;
                dimension.keys.insert(value.clone(), key);
                dimension.values.push(value.clone());
            }
        }
        Ok(dimension)
    }

    /// Surrogate key of a value, if the value belongs to the dimension.
    pub fn key_of(&self, value: &K) -> Option<SurrogateKey> {
        self.keys.get(value).copied()
    }

    /// Distinct values ordered by surrogate key.
    pub fn values(&self) -> &[K] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn key_column(&self, name: &str) -> Result<Column> {
        let keys = (0..self.values.len())
            .map(surrogate_key)
            .collect::<Result<Vec<_>>>()?;
        Ok(Series::new(name.into(), keys).into_column())
    }
}

/// A text attribute dimension. `None` stands for a null input value.
pub type CategoryDimension = Dimension<Option<String>>;

/// The admission date dimension.
pub type DateDimension = Dimension<NaiveDate>;

impl CategoryDimension {
    /// Renders the dimension as `[id, value]`.
    pub fn to_frame(&self, spec: &DimensionSpec) -> Result<DataFrame> {
        debug_assert_eq!(spec.kind, DimensionKind::Categorical);
        let values = Series::new(spec.value_column.into(), self.values.clone()).into_column();
        Ok(DataFrame::new(vec![self.key_column(spec.id_column)?, values])?)
    }
}

impl DateDimension {
    /// Renders the dimension as `[id, date, day, month, year]`.
    pub fn to_frame(&self, spec: &DimensionSpec) -> Result<DataFrame> {
        debug_assert_eq!(spec.kind, DimensionKind::Date);
        let mut days = Vec::with_capacity(self.values.len());
        let mut months = Vec::with_capacity(self.values.len());
        let mut years = Vec::with_capacity(self.values.len());
        for date in &self.values {
            let (day, month, year) = decompose(*date);
            days.push(day);
            months.push(month);
            years.push(year);
        }
        Ok(DataFrame::new(vec![
            self.key_column(spec.id_column)?,
            date_column(spec.value_column, &self.values)?,
            Series::new(DATE_ADMISSION_DAY.into(), days).into_column(),
            Series::new(DATE_ADMISSION_MONTH.into(), months).into_column(),
            Series::new(DATE_ADMISSION_YEAR.into(), years).into_column(),
        ])?)
    }
}

/// Reads a column as nullable text, optionally trimming each value.
pub fn column_text_values(column: &Column, trim: bool) -> Result<Vec<Option<String>>> {
    let mut values = Vec::with_capacity(column.len());
    for row in 0..column.len() {
        let value = any_to_text(column.get(row)?);
        values.push(if trim {
            value.map(|text| text.trim().to_string())
        } else {
            value
        });
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::{BLOOD_TYPE_DIM, DATE_ADMISSION_DIM};
    use polars::prelude::AnyValue;

    fn text(values: &[Option<&str>]) -> Vec<Option<String>> {
        values.iter().map(|v| v.map(str::to_string)).collect()
    }

    #[test]
    fn keys_follow_first_occurrence() {
        let values = text(&[Some("O-"), Some("A+"), Some("O-"), Some("B+"), Some("A+")]);
        let dimension = CategoryDimension::from_values(&values).unwrap();

        assert_eq!(dimension.values(), &text(&[Some("O-"), Some("A+"), Some("B+")])[..]);
        assert_eq!(dimension.key_of(&Some("O-".to_string())), Some(0));
        assert_eq!(dimension.key_of(&Some("A+".to_string())), Some(1));
        assert_eq!(dimension.key_of(&Some("B+".to_string())), Some(2));
        assert_eq!(dimension.key_of(&Some("AB-".to_string())), None);
    }

    #[test]
    fn null_is_its_own_member() {
        let values = text(&[None, Some(""), None]);
        let dimension = CategoryDimension::from_values(&values).unwrap();
        assert_eq!(dimension.len(), 2);
        assert_eq!(dimension.key_of(&None), Some(0));
        assert_eq!(dimension.key_of(&Some(String::new())), Some(1));
    }

    #[test]
    fn category_frame_layout() {
        let values = text(&[Some("A+"), Some("B-")]);
        let frame = CategoryDimension::from_values(&values)
            .unwrap()
            .to_frame(&BLOOD_TYPE_DIM)
            .unwrap();

        let names: Vec<String> = frame
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, vec!["blood_type_id", "blood_type"]);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.column("blood_type_id").unwrap().get(1).unwrap(), AnyValue::UInt32(1));
    }

    #[test]
    fn date_frame_decomposes_dates() {
        let dates = vec![
            NaiveDate::from_ymd_opt(2023, 11, 5).unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 15).unwrap(),
        ];
        let frame = DateDimension::from_values(&dates)
            .unwrap()
            .to_frame(&DATE_ADMISSION_DIM)
            .unwrap();

        assert_eq!(frame.width(), 5);
        assert_eq!(frame.column("date_admission_day").unwrap().get(0).unwrap(), AnyValue::UInt32(5));
        assert_eq!(frame.column("date_admission_month").unwrap().get(0).unwrap(), AnyValue::UInt32(11));
        assert_eq!(frame.column("date_admission_year").unwrap().get(1).unwrap(), AnyValue::Int32(2020));
    }

    #[test]
    fn positions_past_u32_range_are_rejected() {
        assert_eq!(surrogate_key(7).unwrap(), 7);
        assert_eq!(surrogate_key(SurrogateKey::MAX as usize).unwrap(), SurrogateKey::MAX);

        let overflow = SurrogateKey::MAX as usize + 1;
        assert!(matches!(
            surrogate_key(overflow),
            Err(NormalizeError::KeyOverflow { position }) if position == overflow
        ));
    }

    #[test]
    fn column_text_values_trims_on_request() {
        let column = Series::new("Gender".into(), &[Some(" Male "), None]).into_column();
        assert_eq!(
            column_text_values(&column, true).unwrap(),
            vec![Some("Male".to_string()), None]
        );
        assert_eq!(
            column_text_values(&column, false).unwrap(),
            vec![Some(" Male ".to_string()), None]
        );
    }
}
