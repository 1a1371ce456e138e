//! Plaid transactions export, flattened to one CSV column per field.
//!
//! Nested objects are flattened with a `__` separator, e.g.
//! `counterparties__name`.

use std::io::{Read, Seek};

use tracing::debug;

use super::input::{InputFile, Row};
use super::primitives::{DateLayout, parse_bool, parse_decimal, parse_timestamp};
use super::traits::{Extractor, Transactions};
use crate::errors::ExtractResult;
use crate::fingerprint::{EPOCH, Fingerprint};
use crate::registry::FileFormat;
use crate::types::{Timestamp, Transaction};

pub const EXTRACTOR_NAME: &str = "plaid";
pub const DEFAULT_IMPORT_ID: &str = "{{ transaction_id }}";
pub const ALL_FIELDS: [&str; 33] = [
    "date",
    "name",
    "amount",
    "pending",
    "website",
    "datetime",
    "logo_url",
    "account_id",
    "category_id",
    "check_number",
    "account_owner",
    "merchant_name",
    "transaction_id",
    "authorized_date",
    "payment_channel",
    "transaction_code",
    "transaction_type",
    "iso_currency_code",
    "merchant_entity_id",
    "authorized_datetime",
    "pending_transaction_id",
    "unofficial_currency_code",
    "personal_finance_category_icon_url",
    "counterparties__name",
    "counterparties__type",
    "counterparties__website",
    "counterparties__logo_url",
    "counterparties__entity_id",
    "counterparties__phone_number",
    "counterparties__confidence_level",
    "personal_finance_category__primary",
    "personal_finance_category__detailed",
    "personal_finance_category__confidence_level",
];

const DATE_LAYOUT: DateLayout = DateLayout::ISO;

pub struct PlaidExtractor<R> {
    input: InputFile<R>,
}

impl<R: Read + Seek> PlaidExtractor<R> {
    pub fn new(input: InputFile<R>) -> Self {
        Self { input }
    }
}

fn convert(mut row: Row<'_>, base: Transaction) -> ExtractResult<Transaction> {
    let listed_date = row.parse("date", |v| DATE_LAYOUT.parse(v))?;
    let amount = row.parse("amount", parse_decimal)?;
    let pending = row.parse("pending", parse_bool)?;
    let timestamp = row.parse_optional("datetime", parse_timestamp)?;

    // A posted row lists its settlement date; the authorized date is when the
    // purchase happened. Pending rows have no settlement yet.
    let (date, post_date) = if pending {
        (listed_date, None)
    } else {
        let authorized = row.parse_optional("authorized_date", |v| DATE_LAYOUT.parse(v))?;
        (authorized.unwrap_or(listed_date), Some(listed_date))
    };

    // Some institutions reissue the id when a pending transaction posts and
    // point back through pending_transaction_id; prefer it to keep one id.
    let own_id = row.text("transaction_id")?;
    let transaction_id = row.text("pending_transaction_id")?.or(own_id);

    let txn = Transaction {
        transaction_id,
        date: Some(date),
        post_date,
        status: Some(if pending { "pending" } else { "posted" }.to_string()),
        pending: Some(pending),
        desc: row.text("name")?,
        payee: row.text("merchant_name")?,
        source_account: row.text("account_id")?,
        amount: Some(amount),
        transaction_type: row.text("payment_channel")?,
        currency: row.text("iso_currency_code")?,
        category: row.text("personal_finance_category__primary")?,
        subcategory: row.text("personal_finance_category__detailed")?,
        timestamp: timestamp.map(Timestamp::from),
        ..base
    };
    Ok(row.finish(txn))
}

impl<R: Read + Seek> Extractor for PlaidExtractor<R> {
    fn format(&self) -> FileFormat {
        FileFormat::Plaid
    }

    fn detect(&mut self) -> bool {
        self.input.matches_header(&ALL_FIELDS)
    }

    fn fingerprint(&mut self) -> ExtractResult<Option<Fingerprint>> {
        let Some((headers, record)) = self.input.first_record()? else {
            return Ok(None);
        };
        let row = Row::new(&headers, &record, 1);
        let starting_date = row
            .first_date(&["authorized_date", "date"], DATE_LAYOUT)?
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
