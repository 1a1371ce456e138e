//! Generic CSV whose headers are the canonical field names themselves.
//!
//! Any file carrying at least every field in [`ALL_FIELDS`] matches; extra
//! columns are allowed and end up in `extra`. Rows are oldest first.

use std::io::{Read, Seek};

use tracing::debug;

use super::input::{InputFile, Row};
use super::primitives::{DateLayout, parse_bool, parse_decimal, parse_iso_timestamp};
use super::traits::{Extractor, Transactions};
use crate::errors::ExtractResult;
use crate::fingerprint::{EPOCH, Fingerprint};
use crate::registry::FileFormat;
use crate::types::Transaction;

pub const EXTRACTOR_NAME: &str = "csv";
pub const DEFAULT_IMPORT_ID: &str = "{{ file | as_posix_path }}:{{ lineno }}";

/// Every canonical field except provenance and `extra`.
pub const ALL_FIELDS: [&str; 22] = [
    "transaction_id",
    "date",
    "post_date",
    "timestamp",
    "timezone",
    "desc",
    "bank_desc",
    "amount",
    "currency",
    "category",
    "subcategory",
    "pending",
    "status",
    "type",
    "source_account",
    "dest_account",
    "note",
    "reference",
    "payee",
    "gl_code",
    "name_on_card",
    "last_four_digits",
];

const DATE_LAYOUT: DateLayout = DateLayout::ISO;

pub struct CsvExtractor<R> {
    input: InputFile<R>,
}

impl<R: Read + Seek> CsvExtractor<R> {
    pub fn new(input: InputFile<R>) -> Self {
        Self { input }
    }
}

fn assign(row: &mut Row<'_>, txn: &mut Transaction, field: &str) -> ExtractResult<()> {
    match field {
        "date" => txn.date = row.parse_optional(field, |v| DATE_LAYOUT.parse(v))?,
        "post_date" => txn.post_date = row.parse_optional(field, |v| DATE_LAYOUT.parse(v))?,
        "timestamp" => txn.timestamp = row.parse_optional(field, parse_iso_timestamp)?,
        "amount" => txn.amount = row.parse_optional(field, parse_decimal)?,
        "pending" => txn.pending = row.parse_optional(field, parse_bool)?,
        "transaction_id" => txn.transaction_id = row.text(field)?,
        "timezone" => txn.timezone = row.text(field)?,
        "desc" => txn.desc = row.text(field)?,
        "bank_desc" => txn.bank_desc = row.text(field)?,
        "currency" => txn.currency = row.text(field)?,
        "category" => txn.category = row.text(field)?,
        "subcategory" => txn.subcategory = row.text(field)?,
        "status" => txn.status = row.text(field)?,
        "type" => txn.transaction_type = row.text(field)?,
        "source_account" => txn.source_account = row.text(field)?,
        "dest_account" => txn.dest_account = row.text(field)?,
        "note" => txn.note = row.text(field)?,
        "reference" => txn.reference = row.text(field)?,
        "payee" => txn.payee = row.text(field)?,
        "gl_code" => txn.gl_code = row.text(field)?,
        "name_on_card" => txn.name_on_card = row.text(field)?,
        "last_four_digits" => txn.last_four_digits = row.text(field)?,
        _ => {}
    }
    Ok(())
}

fn convert(mut row: Row<'_>, mut txn: Transaction) -> ExtractResult<Transaction> {
    for column in row.columns() {
        if ALL_FIELDS.iter().any(|field| *field == column) {
            assign(&mut row, &mut txn, column)?;
        }
    }
    Ok(row.finish(txn))
}

impl<R: Read + Seek> Extractor for CsvExtractor<R> {
    fn format(&self) -> FileFormat {
        FileFormat::Csv
    }

    fn detect(&mut self) -> bool {
        self.input
            .probe_header(|headers| ALL_FIELDS.iter().all(|field| headers.iter().any(|h| h == *field)))
    }

    fn fingerprint(&mut self) -> ExtractResult<Option<Fingerprint>> {
        let Some((headers, record)) = self.input.first_record()? else {
            return Ok(None);
        };
        let row = Row::new(&headers, &record, 1);
        let starting_date = row
            .first_date(&["date", "post_date"], DATE_LAYOUT)?
            .unwrap_or_else(|| {
                debug!("first row has no date, fingerprint anchored on epoch");
                EPOCH
            });
        Ok(Some(Fingerprint::new(starting_date, &record)))
    }

    fn extract(&mut self) -> ExtractResult<Transactions<'_>> {
        self.input.transactions(EXTRACTOR_NAME, convert)
    }
}
