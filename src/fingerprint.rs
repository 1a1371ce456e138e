//! Whole-file identity used to spot repeated or overlapping imports.

use chrono::NaiveDate;
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Anchor date used when a row carries no usable date at all.
pub const EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(1970, 1, 1) {
    Some(date) => date,
    None => panic!("1970-01-01 is a valid date"),
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    /// Date of the chronologically first row of the file.
    pub starting_date: NaiveDate,
    /// Lowercase hex SHA-256 of that row's raw cells, see [`hash_record`].
    pub first_row_hash: String,
}

impl Fingerprint {
    pub fn new(starting_date: NaiveDate, record: &StringRecord) -> Self {
        Self {
            starting_date,
            first_row_hash: hash_record(record),
        }
    }
}

/// SHA-256 over the cell values in column order, with no separator.
pub fn hash_record(record: &StringRecord) -> String {
    hash_fields(record.iter())
}

pub fn hash_fields<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    let mut hasher = Sha256::new();
    for field in fields {
        hasher.update(field.as_bytes());
    }
    hex::encode(hasher.finalize())
}
