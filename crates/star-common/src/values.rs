//! Polars AnyValue utility functions.
//!
//! Helpers for turning Polars `AnyValue`s into comparable text, used both for
//! dimension values and for whole-row identity when dropping duplicates.

use polars::prelude::{AnyValue, Column, PolarsResult};

/// Converts a Polars `AnyValue` to a `String` representation.
///
/// Returns an empty string for `Null`, formats floats without unnecessary
/// trailing zeros.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use star_common::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Int32(42)), "42");
/// assert_eq!(any_to_string(AnyValue::String("A+")), "A+");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => {
            let s = other.to_string();
            // Display wraps some values in quotes
            if s.starts_with('"') && s.ends_with('"') && s.len() >= 2 {
                s[1..s.len() - 1].to_string()
            } else {
                s
            }
        }
    }
}

/// Converts an `AnyValue` to text, keeping `Null` distinct from the empty string.
///
/// ```
/// use polars::prelude::AnyValue;
/// use star_common::any_to_text;
///
/// assert_eq!(any_to_text(AnyValue::Null), None);
/// assert_eq!(any_to_text(AnyValue::String("")), Some(String::new()));
/// ```
pub fn any_to_text(value: AnyValue<'_>) -> Option<String> {
    match value {
        AnyValue::Null => None,
        other => Some(any_to_string(other)),
    }
}

/// Formats a floating-point number as a string without trailing zeros after decimal.
///
/// Integer-valued floats like 40.0 are formatted as "40", not "4". Negative
/// zero is written as "0" so it compares equal to positive zero.
///
/// ```
/// use star_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(-0.0), "0");
/// assert_eq!(format_numeric(18856.28), "18856.28");
/// assert_eq!(format_numeric(40.0), "40");
/// ```
pub fn format_numeric(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    let s = format!("{v}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    } else {
        s
    }
}

/// Converts an `AnyValue` to `i64`, returning `None` for non-integer or null values.
pub fn any_to_i64(value: AnyValue<'_>) -> Option<i64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(i64::from(v)),
        AnyValue::Int16(v) => Some(i64::from(v)),
        AnyValue::Int32(v) => Some(i64::from(v)),
        AnyValue::Int64(v) => Some(v),
        AnyValue::UInt8(v) => Some(i64::from(v)),
        AnyValue::UInt16(v) => Some(i64::from(v)),
        AnyValue::UInt32(v) => Some(i64::from(v)),
        AnyValue::UInt64(v) => i64::try_from(v).ok(),
        AnyValue::String(s) => s.trim().parse::<i64>().ok(),
        AnyValue::StringOwned(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Builds the identity key of one row across the given columns.
///
/// Two rows are exact duplicates when their keys are equal. Nulls are kept as
/// `None` so they never collide with an empty string.
pub fn row_key(columns: &[&Column], idx: usize) -> PolarsResult<Vec<Option<String>>> {
    let mut key = Vec::with_capacity(columns.len());
    for column in columns {
        key.push(any_to_text(column.get(idx)?));
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    #[test]
    fn test_any_to_string_integers() {
        assert_eq!(any_to_string(AnyValue::Int64(-100)), "-100");
        assert_eq!(any_to_string(AnyValue::UInt32(0)), "0");
    }

    #[test]
    fn test_any_to_string_floats() {
        assert_eq!(any_to_string(AnyValue::Float64(1.5)), "1.5");
        assert_eq!(any_to_string(AnyValue::Float64(1.0)), "1");
    }

    #[test]
    fn test_any_to_string_boolean() {
        assert_eq!(any_to_string(AnyValue::Boolean(true)), "true");
    }

    #[test]
    fn test_any_to_i64() {
        assert_eq!(any_to_i64(AnyValue::UInt32(7)), Some(7));
        assert_eq!(any_to_i64(AnyValue::String(" 12 ")), Some(12));
        assert_eq!(any_to_i64(AnyValue::Float64(1.5)), None);
        assert_eq!(any_to_i64(AnyValue::Null), None);
    }

    #[test]
    fn test_format_numeric_zero() {
        assert_eq!(format_numeric(0.0), "0");
        assert_eq!(format_numeric(100.0), "100");
    }

    #[test]
    fn test_format_numeric_signed_zero() {
        assert_eq!(format_numeric(-0.0), "0");
        assert_eq!(any_to_string(AnyValue::Float32(-0.0)), "0");
    }

    #[test]
    fn test_row_key_treats_signed_zeros_as_equal() {
        let amounts = Series::new("Billing Amount".into(), &[0.0f64, -0.0]).into_column();
        let columns = [&amounts];

        assert_eq!(row_key(&columns, 0).unwrap(), row_key(&columns, 1).unwrap());
    }

    #[test]
    fn test_row_key_separates_null_from_empty() {
        let names = Series::new("Name".into(), &[Some(""), None]).into_column();
        let ages = Series::new("Age".into(), &[30i64, 30]).into_column();
        let columns = [&names, &ages];

        let first = row_key(&columns, 0).unwrap();
        let second = row_key(&columns, 1).unwrap();

        assert_eq!(first, vec![Some(String::new()), Some("30".to_string())]);
        assert_eq!(second, vec![None, Some("30".to_string())]);
        assert_ne!(first, second);
    }
}
