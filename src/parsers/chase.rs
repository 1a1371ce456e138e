//! Chase credit card activity export.
//!
//! Rows come newest first, so the oldest transaction is the last row.

use std::io::{Read, Seek};

use tracing::debug;

use super::input::{InputFile, Row};
use super::primitives::{DateLayout, parse_decimal};
use super::traits::{Extractor, Transactions};
use crate::errors::ExtractResult;
use crate::fingerprint::Fingerprint;
use crate::registry::FileFormat;
use crate::types::Transaction;

pub const EXTRACTOR_NAME: &str = "chase_credit_card";
pub const DEFAULT_IMPORT_ID: &str = "{{ file | as_posix_path }}:{{ reversed_lineno }}";
pub const ALL_FIELDS: [&str; 7] = [
    "Transaction Date",
    "Post Date",
    "Description",
    "Category",
    "Type",
    "Amount",
    "Memo",
];

const DATE_LAYOUT: DateLayout = DateLayout::US_SLASH;

pub struct ChaseCreditCardExtractor<R> {
    input: InputFile<R>,
}

impl<R: Read + Seek> ChaseCreditCardExtractor<R> {
    pub fn new(input: InputFile<R>) -> Self {
        Self { input }
    }
}

fn convert(mut row: Row<'_>, base: Transaction) -> ExtractResult<Transaction> {
    let txn = Transaction {
        date: Some(row.parse("Transaction Date", |v| DATE_LAYOUT.parse(v))?),
        post_date: row.parse_optional("Post Date", |v| DATE_LAYOUT.parse(v))?,
        desc: row.text("Description")?,
        category: row.text("Category")?,
        transaction_type: row.text("Type")?,
        amount: Some(row.parse("Amount", parse_decimal)?),
        note: row.text("Memo")?,
        ..base
    };
    Ok(row.finish(txn))
}

impl<R: Read + Seek> Extractor for ChaseCreditCardExtractor<R> {
    fn format(&self) -> FileFormat {
        FileFormat::ChaseCreditCard
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
            .parse(row.peek("Transaction Date")?)
            .map_err(|source| row.invalid("Transaction Date", source))?;
        debug!(%starting_date, lineno, "fingerprint anchored on last row");
        Ok(Some(Fingerprint::new(starting_date, &record)))
    }

    fn extract(&mut self) -> ExtractResult<Transactions<'_>> {
        self.input.transactions(EXTRACTOR_NAME, convert)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExtractError;
    use chrono::NaiveDate;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    const SAMPLE_CSV: &str = include_str!("../../tests/fixtures/chase_credit_card.csv");

    fn extractor(content: &str) -> ChaseCreditCardExtractor<std::io::Cursor<Vec<u8>>> {
        ChaseCreditCardExtractor::new(InputFile::from_content(content, Some("chase_credit_card.csv")))
    }

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_extract() {
        let txns: Vec<Transaction> = extractor(SAMPLE_CSV)
            .extract()
            .unwrap()
            .collect::<ExtractResult<_>>()
            .unwrap();

        let expected = vec![
            Transaction {
                file: Some("chase_credit_card.csv".to_string()),
                date: date(2024, 4, 9),
                post_date: date(2024, 4, 9),
                desc: Some("AUTOMATIC PAYMENT - THANK".to_string()),
                amount: Some(Decimal::from_str("123.45").unwrap()),
                transaction_type: Some("Payment".to_string()),
                ..Transaction::new(EXTRACTOR_NAME, 1, -5)
            },
            Transaction {
                file: Some("chase_credit_card.csv".to_string()),
                date: date(2024, 4, 3),
                post_date: date(2024, 4, 5),
                desc: Some("APPLE.COM/BILL".to_string()),
                amount: Some(Decimal::from_str("-1.23").unwrap()),
                category: Some("Shopping".to_string()),
                transaction_type: Some("Sale".to_string()),
                ..Transaction::new(EXTRACTOR_NAME, 2, -4)
            },
            Transaction {
                file: Some("chase_credit_card.csv".to_string()),
                date: date(2024, 4, 2),
                post_date: date(2024, 4, 3),
                desc: Some("COSTCO WHSE #01234".to_string()),
                amount: Some(Decimal::from_str("-4.56").unwrap()),
                category: Some("Shopping".to_string()),
                transaction_type: Some("Sale".to_string()),
                ..Transaction::new(EXTRACTOR_NAME, 3, -3)
            },
            Transaction {
                file: Some("chase_credit_card.csv".to_string()),
                date: date(2024, 4, 2),
                post_date: date(2024, 4, 3),
                desc: Some("Amazon web services".to_string()),
                amount: Some(Decimal::from_str("-6.54").unwrap()),
                category: Some("Personal".to_string()),
                transaction_type: Some("Sale".to_string()),
                ..Transaction::new(EXTRACTOR_NAME, 4, -2)
            },
            Transaction {
                file: Some("chase_credit_card.csv".to_string()),
                date: date(2024, 4, 1),
                post_date: date(2024, 4, 2),
                desc: Some("GITHUB  INC.".to_string()),
                amount: Some(Decimal::from_str("-4.00").unwrap()),
                category: Some("Professional Services".to_string()),
                transaction_type: Some("Sale".to_string()),
                ..Transaction::new(EXTRACTOR_NAME, 5, -1)
            },
        ];
        assert_eq!(txns, expected);
    }

    #[rstest]
    #[case(SAMPLE_CSV, true)]
    #[case("Transaction Date,Post Date,Description,Category,Type,Amount,Memo\n", true)]
    #[case("Transaction Date,Post Date,Description,Category,Type,Amount\n", false)]
    #[case("Post Date,Transaction Date,Description,Category,Type,Amount,Memo\n", false)]
    #[case(include_str!("../../tests/fixtures/mercury.csv"), false)]
    #[case("foo,bar\n1,2\n", false)]
    #[case("", false)]
    fn test_detect(#[case] content: &str, #[case] expected: bool) {
        let mut extractor = extractor(content);
        assert_eq!(extractor.detect(), expected);
        assert_eq!(extractor.detect(), expected);
    }

    #[test]
    fn test_detect_does_not_disturb_extract() {
        let mut extractor = extractor(SAMPLE_CSV);
        assert!(extractor.detect());
        assert_eq!(extractor.extract().unwrap().count(), 5);
        assert!(extractor.detect());
        assert_eq!(extractor.extract().unwrap().count(), 5);
    }

    #[test]
    fn test_fingerprint() {
        let fingerprint = extractor(SAMPLE_CSV).fingerprint().unwrap();
        assert_eq!(
            fingerprint,
            Some(Fingerprint {
                starting_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
                first_row_hash: "f68f953ef2d7c7a088924728b8b6b573120fcb384ff3fbd4ca382335a336acc3".to_string(),
            })
        );
    }

    #[test]
    fn test_fingerprint_header_only() {
        let mut extractor = extractor("Transaction Date,Post Date,Description,Category,Type,Amount,Memo\n");
        assert_eq!(extractor.fingerprint().unwrap(), None);
        assert_eq!(extractor.extract().unwrap().count(), 0);
    }

    #[rstest]
    #[case("2024-04-09,04/09/2024,X,,Payment,1.00,", "Transaction Date")]
    #[case("04/09/2024,04/09/2024,X,,Payment,1.0.0,", "Amount")]
    #[case("04/09/2024,2024-04-09,X,,Payment,1.00,", "Post Date")]
    fn test_extract_invalid_field(#[case] bad_row: &str, #[case] bad_column: &str) {
        let content = format!(
            "Transaction Date,Post Date,Description,Category,Type,Amount,Memo\n04/10/2024,04/10/2024,OK,,Sale,-1.00,\n{bad_row}\n"
        );
        let results: Vec<_> = extractor(&content).extract().unwrap().collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        match &results[1] {
            Err(ExtractError::InvalidField { lineno, column, .. }) => {
                assert_eq!(*lineno, 2);
                assert_eq!(column, bad_column);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_blank_post_date_is_absent() {
        let content = "Transaction Date,Post Date,Description,Category,Type,Amount,Memo\n04/09/2024,,PENDING THING,,Sale,-1.00,\n";
        let txn = extractor(content).extract().unwrap().next().unwrap().unwrap();
        assert_eq!(txn.date, date(2024, 4, 9));
        assert_eq!(txn.post_date, None);
        assert_eq!(txn.amount, Some(Decimal::from_str("-1.00").unwrap()));
    }

    #[test]
    fn test_text_cells_keep_padding() {
        let content = "Transaction Date,Post Date,Description,Category,Type,Amount,Memo\n04/10/2024,04/11/2024,\"  PADDED DESC  \",Shopping,Sale,-2.00,\" memo \"\n";
        let txn = extractor(content).extract().unwrap().next().unwrap().unwrap();
        assert_eq!(txn.desc.as_deref(), Some("  PADDED DESC  "));
        assert_eq!(txn.note.as_deref(), Some(" memo "));
    }

    #[test]
    fn test_memo_is_kept_as_note() {
        let content = "Transaction Date,Post Date,Description,Category,Type,Amount,Memo\n04/10/2024,04/11/2024,Refund,Shopping,Return,9.99,order 42\n";
        let txn = extractor(content).extract().unwrap().next().unwrap().unwrap();
        assert_eq!(txn.note.as_deref(), Some("order 42"));
        assert_eq!(txn.lineno, 1);
        assert_eq!(txn.reversed_lineno, -1);
        assert_eq!(txn.extra, None);
    }
}
