use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Value stored in [`Transaction::extra`].
///
/// Most unmapped columns are kept as the literal cell text; a format may
/// store a typed value when it knows what the column holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ExtraValue {
    Text(String),
    Decimal(Decimal),
}

impl From<&str> for ExtraValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ExtraValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Decimal> for ExtraValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

/// Moment of a transaction as the source wrote it.
///
/// Some exports carry an explicit UTC offset; others write local wall-clock
/// time and name the zone separately in [`Transaction::timezone`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Offset(DateTime<FixedOffset>),
    Local(NaiveDateTime),
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::Offset(value)
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(value: NaiveDateTime) -> Self {
        Self::Local(value)
    }
}

/// One canonical transaction, produced per data row of an export.
///
/// Only the provenance fields are always present. Build records with
/// [`Transaction::new`] and struct update syntax so the fields a format sets
/// are spelled out at the construction site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Id of the format that produced this record, e.g. `chase_credit_card`.
    pub extractor: String,
    /// Name of the source file, when the input had one.
    pub file: Option<String>,
    /// 1-based index of the row within the data section.
    pub lineno: usize,
    /// `lineno - 1 - row_count`: the last row is `-1`, the first is `-row_count`.
    pub reversed_lineno: i64,
    pub transaction_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub post_date: Option<NaiveDate>,
    pub timestamp: Option<Timestamp>,
    /// Timezone name for `timestamp`; resolving it is left to the consumer.
    pub timezone: Option<String>,
    pub desc: Option<String>,
    pub bank_desc: Option<String>,
    pub amount: Option<Decimal>,
    /// ISO 4217 code.
    pub currency: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub pending: Option<bool>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub source_account: Option<String>,
    pub dest_account: Option<String>,
    pub note: Option<String>,
    pub reference: Option<String>,
    pub payee: Option<String>,
    pub gl_code: Option<String>,
    pub name_on_card: Option<String>,
    pub last_four_digits: Option<String>,
    /// Source columns not mapped to a named field, keyed by header name.
    pub extra: Option<BTreeMap<String, ExtraValue>>,
}

impl Transaction {
    /// A record with provenance set and every optional field absent.
    pub fn new(extractor: impl Into<String>, lineno: usize, reversed_lineno: i64) -> Self {
        Self {
            extractor: extractor.into(),
            file: None,
            lineno,
            reversed_lineno,
            transaction_id: None,
            date: None,
            post_date: None,
            timestamp: None,
            timezone: None,
            desc: None,
            bank_desc: None,
            amount: None,
            currency: None,
            category: None,
            subcategory: None,
            pending: None,
            status: None,
            transaction_type: None,
            source_account: None,
            dest_account: None,
            note: None,
            reference: None,
            payee: None,
            gl_code: None,
            name_on_card: None,
            last_four_digits: None,
            extra: None,
        }
    }
}
