//! Known formats, in the order auto-detection tries them.

use std::fmt;
use std::io::{Read, Seek};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ExtractError;
use crate::parsers::prelude::*;
use crate::parsers::{chase, generic_csv, mercury, plaid, wealthsimple};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileFormat {
    #[serde(rename = "mercury")]
    Mercury,
    #[serde(rename = "chase_credit_card")]
    ChaseCreditCard,
    #[serde(rename = "plaid")]
    Plaid,
    #[serde(rename = "wealthsimple")]
    Wealthsimple,
    #[serde(rename = "csv")]
    Csv,
}

/// Detection order. The generic CSV matcher accepts any superset of its
/// columns, so it goes last.
pub const ALL_FORMATS: [FileFormat; 5] = [
    FileFormat::Mercury,
    FileFormat::ChaseCreditCard,
    FileFormat::Plaid,
    FileFormat::Wealthsimple,
    FileFormat::Csv,
];

impl FileFormat {
    /// Stable id, also written to `Transaction::extractor`.
    pub fn name(self) -> &'static str {
        match self {
            FileFormat::Mercury => mercury::EXTRACTOR_NAME,
            FileFormat::ChaseCreditCard => chase::EXTRACTOR_NAME,
            FileFormat::Plaid => plaid::EXTRACTOR_NAME,
            FileFormat::Wealthsimple => wealthsimple::EXTRACTOR_NAME,
            FileFormat::Csv => generic_csv::EXTRACTOR_NAME,
        }
    }

    /// Template downstream import tools use to build a stable id per record.
    pub fn default_import_id(self) -> &'static str {
        match self {
            FileFormat::Mercury => mercury::DEFAULT_IMPORT_ID,
            FileFormat::ChaseCreditCard => chase::DEFAULT_IMPORT_ID,
            FileFormat::Plaid => plaid::DEFAULT_IMPORT_ID,
            FileFormat::Wealthsimple => wealthsimple::DEFAULT_IMPORT_ID,
            FileFormat::Csv => generic_csv::DEFAULT_IMPORT_ID,
        }
    }

    pub fn extractor<'a, R>(self, input: InputFile<R>) -> Box<dyn Extractor + 'a>
    where
        R: Read + Seek + 'a,
    {
        match self {
            FileFormat::Mercury => Box::new(MercuryExtractor::new(input)),
            FileFormat::ChaseCreditCard => Box::new(ChaseCreditCardExtractor::new(input)),
            FileFormat::Plaid => Box::new(PlaidExtractor::new(input)),
            FileFormat::Wealthsimple => Box::new(WealthsimpleExtractor::new(input)),
            FileFormat::Csv => Box::new(CsvExtractor::new(input)),
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FileFormat {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_FORMATS
            .into_iter()
            .find(|format| format.name() == s)
            .ok_or(ExtractError::UnsupportedFormat)
    }
}

/// First format in [`ALL_FORMATS`] whose `detect` accepts the input.
///
/// The input is rewound before every probe and left rewound afterwards.
pub fn detect_extractor<R: Read + Seek>(input: &mut InputFile<R>) -> Option<FileFormat> {
    let detected = ALL_FORMATS
        .into_iter()
        .find(|format| format.extractor(input.by_ref()).detect());
    match detected {
        Some(format) => debug!(file = ?input.name(), %format, "format detected"),
        None => debug!(file = ?input.name(), "no format matched"),
    }
    detected
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Cursor;

    fn input(content: &[u8]) -> InputFile<Cursor<Vec<u8>>> {
        InputFile::from_content(content, Some("input.csv"))
    }

    #[rstest]
    #[case(include_str!("../tests/fixtures/mercury.csv"), Some(FileFormat::Mercury))]
    #[case(include_str!("../tests/fixtures/chase_credit_card.csv"), Some(FileFormat::ChaseCreditCard))]
    #[case(include_str!("../tests/fixtures/plaid.csv"), Some(FileFormat::Plaid))]
    #[case(include_str!("../tests/fixtures/wealthsimple.csv"), Some(FileFormat::Wealthsimple))]
    #[case(include_str!("../tests/fixtures/csv.csv"), Some(FileFormat::Csv))]
    #[case(include_str!("../tests/fixtures/other.csv"), None)]
    #[case("", None)]
    fn test_detect_extractor(#[case] content: &str, #[case] expected: Option<FileFormat>) {
        let mut input = input(content.as_bytes());
        assert_eq!(detect_extractor(&mut input), expected);
    }

    #[test]
    fn test_detect_extractor_binary() {
        let mut input = input(&[0x50, 0x4b, 0x03, 0x04, 0x14, 0x00, 0x00, 0x00, 0xff, 0xfe]);
        assert_eq!(detect_extractor(&mut input), None);
    }

    #[test]
    fn test_detect_then_extract_from_same_input() {
        let mut input = input(include_str!("../tests/fixtures/chase_credit_card.csv").as_bytes());
        let format = detect_extractor(&mut input).unwrap();
        let mut extractor = format.extractor(input);
        assert_eq!(extractor.format(), FileFormat::ChaseCreditCard);
        let txns: Vec<_> = extractor.extract().unwrap().collect::<Result<_, _>>().unwrap();
        assert_eq!(txns.len(), 5);
        assert!(txns.iter().all(|txn| txn.extractor == "chase_credit_card"));
    }

    #[rstest]
    #[case(FileFormat::Mercury, "mercury", "{{ file | as_posix_path }}:{{ reversed_lineno }}")]
    #[case(FileFormat::ChaseCreditCard, "chase_credit_card", "{{ file | as_posix_path }}:{{ reversed_lineno }}")]
    #[case(FileFormat::Plaid, "plaid", "{{ transaction_id }}")]
    #[case(FileFormat::Wealthsimple, "wealthsimple", "{{ file | as_posix_path }}:{{ reversed_lineno }}")]
    #[case(FileFormat::Csv, "csv", "{{ file | as_posix_path }}:{{ lineno }}")]
    fn test_format_ids(#[case] format: FileFormat, #[case] name: &str, #[case] import_id: &str) {
        assert_eq!(format.name(), name);
        assert_eq!(format.to_string(), name);
        assert_eq!(format.default_import_id(), import_id);
        assert_eq!(name.parse::<FileFormat>().unwrap(), format);
        assert_eq!(serde_json::to_string(&format).unwrap(), format!("\"{name}\""));
        assert_eq!(format.extractor(input(b"")).format(), format);
    }

    #[test]
    fn test_unknown_format_name() {
        assert!(matches!(
            "qfx".parse::<FileFormat>(),
            Err(ExtractError::UnsupportedFormat)
        ));
    }
}
