use thiserror::Error;

/// Failures of the primitive field parsers.
///
/// These carry the offending text but not its location; extractors wrap them
/// into [`ExtractError::InvalidField`] together with the row and column.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("invalid date {value:?}, expected {layout}")]
    InvalidDate { value: String, layout: String },

    #[error("invalid time {value:?}, expected HH:MM:SS")]
    InvalidTime { value: String },

    #[error("invalid ISO-8601 timestamp {value:?}")]
    InvalidTimestamp { value: String },

    #[error("invalid decimal {value:?}: {source}")]
    InvalidDecimal {
        value: String,
        #[source]
        source: rust_decimal::Error,
    },

    /// Only `true` and `false` (any case) are accepted.
    #[error("invalid boolean {value:?}, expected true or false")]
    InvalidBoolean { value: String },
}

/// Errors raised while fingerprinting or extracting an input.
///
/// Detection never surfaces these: a probe that fails is simply not a match.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read CSV header: {0}")]
    Header(#[source] csv::Error),

    /// A data row could not be read, e.g. its field count differs from the header.
    #[error("row {lineno}: malformed CSV record: {source}")]
    Record {
        lineno: usize,
        #[source]
        source: csv::Error,
    },

    #[error("column {column:?} appears more than once in the header")]
    DuplicateColumn { column: String },

    #[error("row {lineno}: missing required column {column:?}")]
    MissingColumn { lineno: usize, column: String },

    #[error("row {lineno}, column {column:?}: {source}")]
    InvalidField {
        lineno: usize,
        column: String,
        #[source]
        source: ParseError,
    },

    /// No registered format recognised the input
    #[error("Unsupported file format")]
    UnsupportedFormat,

    /// The builder was used without content or a file path
    #[error("Content or filepath is required")]
    MissingInput,
}

pub type ExtractResult<T> = Result<T, ExtractError>;
