//! Mercury bank account export.
//!
//! Newest first. Dates are `MM-DD-YYYY` in UTC and the `Timestamp` column
//! carries the UTC time of day.

use std::io::{Read, Seek};

use tracing::debug;

use super::input::{InputFile, Row};
use super::primitives::{DateLayout, parse_datetime, parse_decimal};
use super::traits::{Extractor, Transactions};
use crate::errors::ExtractResult;
use crate::fingerprint::Fingerprint;
use crate::registry::FileFormat;
use crate::types::{Timestamp, Transaction};

pub const EXTRACTOR_NAME: &str = "mercury";
pub const DEFAULT_IMPORT_ID: &str = "{{ file | as_posix_path }}:{{ reversed_lineno }}";
pub const ALL_FIELDS: [&str; 14] = [
    "Date (UTC)",
    "Description",
    "Amount",
    "Status",
    "Source Account",
    "Bank Description",
    "Reference",
    "Note",
    "Last Four Digits",
    "Name On Card",
    "Category",
    "GL Code",
    "Timestamp",
    "Original Currency",
];

const DATE_LAYOUT: DateLayout = DateLayout::US_DASH;
const TIMEZONE: &str = "UTC";

pub struct MercuryExtractor<R> {
    input: InputFile<R>,
}

impl<R: Read + Seek> MercuryExtractor<R> {
    pub fn new(input: InputFile<R>) -> Self {
        Self { input }
    }
}

fn convert(mut row: Row<'_>, base: Transaction) -> ExtractResult<Transaction> {
    let txn = Transaction {
        date: Some(row.parse("Date (UTC)", |v| DATE_LAYOUT.parse(v))?),
        desc: row.text("Description")?,
        amount: Some(row.parse("Amount", parse_decimal)?),
        status: row.text("Status")?,
        source_account: row.text("Source Account")?,
        bank_desc: row.text("Bank Description")?,
        reference: row.text("Reference")?,
        note: row.text("Note")?,
        last_four_digits: row.text("Last Four Digits")?,
        name_on_card: row.text("Name On Card")?,
        category: row.text("Category")?,
        gl_code: row.text("GL Code")?,
        timestamp: row
            .parse_optional("Timestamp", |v| parse_datetime(v, DATE_LAYOUT))?
            .map(|naive| Timestamp::from(naive.and_utc().fixed_offset())),
        currency: row.text("Original Currency")?,
        timezone: Some(TIMEZONE.to_string()),
        ..base
    };
    Ok(row.finish(txn))
}

impl<R: Read + Seek> Extractor for MercuryExtractor<R> {
    fn format(&self) -> FileFormat {
        FileFormat::Mercury
    }

    fn detect(&mut self) -> bool {
        self.input.matches_header(&ALL_FIELDS)
    }

    fn fingerprint(&mut self) -> ExtractResult<Option<Fingerprint>> {
        let Some((headers, record, lineno)) = self.input.last_record()? else {
            return Ok(None);
        };
        let row = Row::new(&headers, &record, lineno);
        let starting_date = DATE_LAYOUT
            .parse(row.peek("Date (UTC)")?)
            .map_err(|source| row.invalid("Date (UTC)", source))?;
        debug!(%starting_date, lineno, "fingerprint anchored on last row");
        Ok(Some(Fingerprint::new(starting_date, &record)))
    }

    fn extract(&mut self) -> ExtractResult<Transactions<'_>> {
        self.input.transactions(EXTRACTOR_NAME, convert)
    }
}
