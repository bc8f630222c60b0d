//! Admission date parsing and calendar decomposition.
//!
//! Dates are accepted as Polars `Date`/`Datetime` values or as text. Text is
//! matched against ISO 8601 dates, US `MM/DD/YYYY`, ISO date-times and
//! RFC 3339; a time of day is dropped. Zoned values keep the calendar date of
//! their own zone, for `Datetime` cells and offset text alike. Any value that
//! fails every format is fatal for the whole run.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use polars::prelude::{AnyValue, Column, DataType, IntoColumn, NamedFrom, Series, TimeUnit};
use star_common::any_to_string;

use crate::error::{NormalizeError, Result};

/// Days from 0001-01-01 (CE) to 1970-01-01, the Polars `Date` epoch.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a textual admission date.
///
/// Built-in formats are tried first, then `extra_formats` in order. Each extra
/// format is tried as a date and then as a date-time.
///
/// ```
/// use chrono::NaiveDate;
/// use star_normalize::parse_admission_date;
///
/// let expected = NaiveDate::from_ymd_opt(2023, 11, 5);
/// assert_eq!(parse_admission_date("2023-11-05", &[]), expected);
/// assert_eq!(parse_admission_date("11/05/2023", &[]), expected);
/// assert_eq!(parse_admission_date("2023-11-05T08:30:00", &[]), expected);
/// assert_eq!(parse_admission_date("yesterday", &[]), None);
/// ```
pub fn parse_admission_date(raw: &str, extra_formats: &[String]) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(datetime.date());
        }
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(datetime.date_naive());
    }
    for format in extra_formats {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(datetime.date());
        }
    }
    None
}

/// Converts a Polars `Date` physical value (days since epoch) to a `NaiveDate`.
pub fn date_from_epoch_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(EPOCH_DAYS_FROM_CE)?)
}

/// Converts a `NaiveDate` to the Polars `Date` physical value.
pub fn epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - EPOCH_DAYS_FROM_CE
}

/// Calendar date of a Polars `Datetime` physical value.
///
/// Without a time zone the value is wall-clock time; with one it is an
/// instant read in that zone (IANA name or fixed offset such as `+05:30`).
fn datetime_to_date(value: i64, unit: TimeUnit, time_zone: Option<&str>) -> Option<NaiveDate> {
    let per_second: i64 = match unit {
        TimeUnit::Nanoseconds => 1_000_000_000,
        TimeUnit::Microseconds => 1_000_000,
        TimeUnit::Milliseconds => 1_000,
    };
    let secs = value.div_euclid(per_second);
    let nanos = value.rem_euclid(per_second) * (1_000_000_000 / per_second);
    let nanos = u32::try_from(nanos).ok()?;
    let instant = DateTime::from_timestamp(secs, nanos)?;
    match time_zone {
        None => Some(instant.date_naive()),
        Some(zone) => local_date(&instant, zone),
    }
}

/// `None` for a zone name neither chrono-tz nor a fixed offset understands.
fn local_date(instant: &DateTime<Utc>, zone: &str) -> Option<NaiveDate> {
    if let Ok(tz) = zone.parse::<Tz>() {
        return Some(instant.with_timezone(&tz).date_naive());
    }
    let offset = zone.parse::<FixedOffset>().ok()?;
    Some(instant.with_timezone(&offset).date_naive())
}

fn any_to_date(value: AnyValue<'_>, extra_formats: &[String]) -> Option<NaiveDate> {
    match value {
        AnyValue::Null => None,
        AnyValue::Date(days) => date_from_epoch_days(days),
        AnyValue::Datetime(value, unit, tz) => {
            datetime_to_date(value, unit, tz.map(|tz| tz.as_str()))
        }
        AnyValue::DatetimeOwned(value, unit, tz) => {
            datetime_to_date(value, unit, tz.as_deref().map(|tz| tz.as_str()))
        }
        AnyValue::String(s) => parse_admission_date(s, extra_formats),
        other => parse_admission_date(&any_to_string(other), extra_formats),
    }
}

/// Parses every value of the admission date column.
///
/// Fails on the first null, empty or unparseable value.
pub fn parse_date_column(column: &Column, extra_formats: &[String]) -> Result<Vec<NaiveDate>> {
    let mut dates = Vec::with_capacity(column.len());
    for row in 0..column.len() {
        let value = column.get(row)?;
        match any_to_date(value.clone(), extra_formats) {
            Some(date) => dates.push(date),
            None => {
                return Err(NormalizeError::DateParse {
                    column: column.name().to_string(),
                    row,
                    value: any_to_string(value),
                });
            }
        }
    }
    Ok(dates)
}

/// Builds a Polars `Date` column from calendar dates.
pub fn date_column(name: &str, dates: &[NaiveDate]) -> Result<Column> {
    let days: Vec<i32> = dates.iter().copied().map(epoch_days).collect();
    let series = Series::new(name.into(), days).cast(&DataType::Date)?;
    Ok(series.into_column())
}

/// Day, month and year of a date, as stored in the date dimension.
pub fn decompose(date: NaiveDate) -> (u32, u32, i32) {
    (date.day(), date.month(), date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_builtin_formats() {
        assert_eq!(parse_admission_date("2020-01-15", &[]), Some(ymd(2020, 1, 15)));
        assert_eq!(parse_admission_date(" 2020/01/15 ", &[]), Some(ymd(2020, 1, 15)));
        assert_eq!(parse_admission_date("01/15/2020", &[]), Some(ymd(2020, 1, 15)));
        assert_eq!(
            parse_admission_date("2020-01-15 23:59:59", &[]),
            Some(ymd(2020, 1, 15))
        );
        assert_eq!(
            parse_admission_date("2020-01-15T10:00:00+02:00", &[]),
            Some(ymd(2020, 1, 15))
        );
    }

    #[test]
    fn rejects_invalid_calendar_dates() {
        assert_eq!(parse_admission_date("2023-02-30", &[]), None);
        assert_eq!(parse_admission_date("", &[]), None);
        assert_eq!(parse_admission_date("not a date", &[]), None);
    }

    #[test]
    fn extra_formats_are_tried_last() {
        let formats = vec!["%d.%m.%Y".to_string()];
        assert_eq!(parse_admission_date("15.01.2020", &[]), None);
        assert_eq!(
            parse_admission_date("15.01.2020", &formats),
            Some(ymd(2020, 1, 15))
        );
    }

    #[test]
    fn epoch_days_round_trip() {
        assert_eq!(epoch_days(ymd(1970, 1, 1)), 0);
        assert_eq!(epoch_days(ymd(1970, 1, 2)), 1);
        assert_eq!(date_from_epoch_days(-1), Some(ymd(1969, 12, 31)));
        assert_eq!(date_from_epoch_days(epoch_days(ymd(2024, 2, 29))), Some(ymd(2024, 2, 29)));
    }

    #[test]
    fn decompose_splits_calendar_parts() {
        assert_eq!(decompose(ymd(2023, 11, 5)), (5, 11, 2023));
    }

    #[test]
    fn datetime_values_truncate_to_date() {
        // 2020-01-15T12:00:00Z in milliseconds
        let millis = 1_579_089_600_000;
        assert_eq!(
            datetime_to_date(millis, TimeUnit::Milliseconds, None),
            Some(ymd(2020, 1, 15))
        );
        assert_eq!(
            datetime_to_date(millis * 1_000_000, TimeUnit::Nanoseconds, None),
            Some(ymd(2020, 1, 15))
        );
    }

    #[test]
    fn zoned_datetimes_use_the_local_calendar_date() {
        // 2020-01-15T23:30:00-05:00, i.e. 2020-01-16T04:30:00Z
        let millis = 1_579_149_000_000;
        assert_eq!(
            datetime_to_date(millis, TimeUnit::Milliseconds, None),
            Some(ymd(2020, 1, 16))
        );
        assert_eq!(
            datetime_to_date(millis, TimeUnit::Milliseconds, Some("America/New_York")),
            Some(ymd(2020, 1, 15))
        );
        assert_eq!(
            datetime_to_date(millis, TimeUnit::Milliseconds, Some("-05:00")),
            Some(ymd(2020, 1, 15))
        );
        assert_eq!(
            datetime_to_date(millis, TimeUnit::Milliseconds, Some("UTC")),
            Some(ymd(2020, 1, 16))
        );
        assert_eq!(
            datetime_to_date(millis, TimeUnit::Milliseconds, Some("America/New_York")),
            parse_admission_date("2020-01-15T23:30:00-05:00", &[])
        );
    }

    #[test]
    fn unknown_time_zone_is_unparseable() {
        assert_eq!(
            datetime_to_date(0, TimeUnit::Milliseconds, Some("Mars/Olympus_Mons")),
            None
        );
    }

    #[test]
    fn parse_date_column_reports_row_and_value() {
        let column = Series::new("Date of Admission".into(), &["2020-01-15", "15th Jan"]).into_column();
        let err = parse_date_column(&column, &[]).unwrap_err();
        match err {
            NormalizeError::DateParse { column, row, value } => {
                assert_eq!(column, "Date of Admission");
                assert_eq!(row, 1);
                assert_eq!(value, "15th Jan");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parse_date_column_rejects_null() {
        let column = Series::new("Date of Admission".into(), &[Some("2020-01-15"), None]).into_column();
        assert!(matches!(
            parse_date_column(&column, &[]),
            Err(NormalizeError::DateParse { row: 1, .. })
        ));
    }

    #[test]
    fn date_column_has_date_dtype() {
        let column = date_column("date_admission", &[ymd(2020, 1, 15)]).unwrap();
        assert_eq!(column.dtype(), &DataType::Date);
        assert_eq!(column.get(0).unwrap(), AnyValue::Date(epoch_days(ymd(2020, 1, 15))));
    }
}
