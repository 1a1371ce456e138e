//! Field parsers shared by the format extractors.
//!
//! Every format hard-codes its own date layout; nothing here guesses a
//! locale. Money goes through [`Decimal`] straight from the source text.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use crate::errors::ParseError;
use crate::types::Timestamp;

/// Order of the three components of a textual date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    YearMonthDay,
    MonthDayYear,
    DayMonthYear,
}

/// A fixed date layout: one separator and one component order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateLayout {
    separator: char,
    order: DateOrder,
}

impl DateLayout {
    /// `YYYY-MM-DD`
    pub const ISO: Self = Self::new('-', DateOrder::YearMonthDay);
    /// `MM/DD/YYYY`
    pub const US_SLASH: Self = Self::new('/', DateOrder::MonthDayYear);
    /// `MM-DD-YYYY`
    pub const US_DASH: Self = Self::new('-', DateOrder::MonthDayYear);

    pub const fn new(separator: char, order: DateOrder) -> Self {
        Self { separator, order }
    }

    pub fn parse(&self, value: &str) -> Result<NaiveDate, ParseError> {
        let invalid = || ParseError::InvalidDate {
            value: value.to_string(),
            layout: self.to_string(),
        };

        let parts: Vec<&str> = value.trim().split(self.separator).collect();
        let [first, second, third] = parts.as_slice() else {
            return Err(invalid());
        };
        let (year, month, day) = match self.order {
            DateOrder::YearMonthDay => (first, second, third),
            DateOrder::MonthDayYear => (third, first, second),
            DateOrder::DayMonthYear => (third, second, first),
        };

        let year = parse_component(year).ok_or_else(invalid)?;
        let month = parse_component(month).ok_or_else(invalid)?;
        let day = parse_component(day).ok_or_else(invalid)?;

        NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
    }
}

impl fmt::Display for DateLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = match self.order {
            DateOrder::YearMonthDay => ["YYYY", "MM", "DD"],
            DateOrder::MonthDayYear => ["MM", "DD", "YYYY"],
            DateOrder::DayMonthYear => ["DD", "MM", "YYYY"],
        };
        let sep = self.separator;
        write!(f, "{a}{sep}{b}{sep}{c}")
    }
}

fn parse_component<T: FromStr>(part: &str) -> Option<T> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Parses `HH:MM:SS`.
pub fn parse_time(value: &str) -> Result<NaiveTime, ParseError> {
    let invalid = || ParseError::InvalidTime {
        value: value.to_string(),
    };

    let parts: Vec<&str> = value.trim().split(':').collect();
    let [hour, minute, second] = parts.as_slice() else {
        return Err(invalid());
    };
    let hour = parse_component(hour).ok_or_else(invalid)?;
    let minute = parse_component(minute).ok_or_else(invalid)?;
    let second = parse_component(second).ok_or_else(invalid)?;

    NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(invalid)
}

/// Parses `<date> <HH:MM:SS>` where the date follows `layout`.
pub fn parse_datetime(value: &str, layout: DateLayout) -> Result<NaiveDateTime, ParseError> {
    let trimmed = value.trim();
    let Some((date, time)) = trimmed.split_once(' ') else {
        return Err(ParseError::InvalidDate {
            value: value.to_string(),
            layout: format!("{layout} HH:MM:SS"),
        });
    };

    Ok(NaiveDateTime::new(layout.parse(date)?, parse_time(time)?))
}

/// Parses an ISO-8601 timestamp carrying an explicit UTC offset.
///
/// Accepts `T` or a space between date and time, and `Z` or `±HH:MM`.
pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    let trimmed = value.trim();
    DateTime::parse_from_rfc3339(trimmed)
        .or_else(|_| DateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f%:z"))
        .or_else(|_| DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f%:z"))
        .map_err(|_| ParseError::InvalidTimestamp {
            value: value.to_string(),
        })
}

/// Parses an ISO-8601 date and time without an offset, e.g.
/// `2025-06-29T00:32:53` or `2025-06-29 00:32:53.036910`.
pub fn parse_local_datetime(value: &str) -> Result<NaiveDateTime, ParseError> {
    let trimmed = value.trim();
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f"))
        .map_err(|_| ParseError::InvalidTimestamp {
            value: value.to_string(),
        })
}

/// Parses an ISO-8601 timestamp with or without a UTC offset.
pub fn parse_iso_timestamp(value: &str) -> Result<Timestamp, ParseError> {
    parse_timestamp(value)
        .map(Timestamp::from)
        .or_else(|_| parse_local_datetime(value).map(Timestamp::from))
}

/// Parses an exact decimal, keeping sign and scale.
pub fn parse_decimal(value: &str) -> Result<Decimal, ParseError> {
    Decimal::from_str(value.trim()).map_err(|source| ParseError::InvalidDecimal {
        value: value.to_string(),
        source,
    })
}

/// Parses `true`/`false`, ignoring case. Anything else is rejected.
pub fn parse_bool(value: &str) -> Result<bool, ParseError> {
    let token = value.trim();
    if token.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if token.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ParseError::InvalidBoolean {
            value: value.to_string(),
        })
    }
}
