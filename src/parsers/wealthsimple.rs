//! Wealthsimple cash account statement export.
//!
//! Oldest first, ISO dates, with the running balance after each row.

use std::io::{Read, Seek};

use tracing::debug;

use super::input::{InputFile, Row};
use super::primitives::{DateLayout, parse_decimal};
use super::traits::{Extractor, Transactions};
use crate::errors::ExtractResult;
use crate::fingerprint::Fingerprint;
use crate::registry::FileFormat;
use crate::types::{ExtraValue, Transaction};

pub const EXTRACTOR_NAME: &str = "wealthsimple";
pub const DEFAULT_IMPORT_ID: &str = "{{ file | as_posix_path }}:{{ reversed_lineno }}";
pub const ALL_FIELDS: [&str; 5] = ["date", "transaction", "description", "amount", "balance"];

const DATE_LAYOUT: DateLayout = DateLayout::ISO;

pub struct WealthsimpleExtractor<R> {
    input: InputFile<R>,
}

impl<R: Read + Seek> WealthsimpleExtractor<R> {
    pub fn new(input: InputFile<R>) -> Self {
        Self { input }
    }
}

fn convert(mut row: Row<'_>, base: Transaction) -> ExtractResult<Transaction> {
    let mut txn = Transaction {
        date: Some(row.parse("date", |v| DATE_LAYOUT.parse(v))?),
        transaction_type: row.text("transaction")?,
        desc: row.text("description")?,
        amount: Some(row.parse("amount", parse_decimal)?),
        ..base
    };
    let balance = row.parse("balance", parse_decimal)?;
    txn.extra
        .get_or_insert_with(Default::default)
        .insert("balance".to_string(), ExtraValue::Decimal(balance));
    Ok(row.finish(txn))
}

impl<R: Read + Seek> Extractor for WealthsimpleExtractor<R> {
    fn format(&self) -> FileFormat {
        FileFormat::Wealthsimple
    }

    fn detect(&mut self) -> bool {
        self.input.matches_header(&ALL_FIELDS)
    }

    fn fingerprint(&mut self) -> ExtractResult<Option<Fingerprint>> {
        let Some((headers, record)) = self.input.first_record()? else {
            return Ok(None);
        };
        let row = Row::new(&headers, &record, 1);
        let starting_date = DATE_LAYOUT
            .parse(row.peek("date")?)
            .map_err(|source| row.invalid("date", source))?;
        debug!(%starting_date, "fingerprint anchored on first row");
        Ok(Some(Fingerprint::new(starting_date, &record)))
    }

    fn extract(&mut self) -> ExtractResult<Transactions<'_>> {
        self.input.transactions(EXTRACTOR_NAME, convert)
    }
}
