//! Detect, fingerprint and extract transactions from bank and aggregator CSV
//! exports.
//!
//! ```rust,ignore
//! use bank_extract_rs::ExtractorBuilder;
//!
//! let transactions = ExtractorBuilder::new()
//!     .filepath("statements/chase.csv")
//!     .extract()?;
//! ```
//!
//! Or drive an extractor directly over any seekable reader:
//!
//! ```rust,ignore
//! use bank_extract_rs::{InputFile, detect_extractor};
//!
//! let mut input = InputFile::open("statements/chase.csv")?;
//! if let Some(format) = detect_extractor(&mut input) {
//!     let mut extractor = format.extractor(input);
//!     let fingerprint = extractor.fingerprint()?;
//!     for txn in extractor.extract()? {
//!         println!("{:?}", txn?);
//!     }
//! }
//! ```

mod builder;
mod types;
mod utils;

pub mod errors;
pub mod fingerprint;
pub mod parsers;
pub mod registry;

pub use builder::ExtractorBuilder;
pub use errors::{ExtractError, ExtractResult, ParseError};
pub use fingerprint::Fingerprint;
pub use parsers::prelude::*;
pub use registry::{ALL_FORMATS, FileFormat, detect_extractor};
pub use types::{ExtraValue, Timestamp, Transaction};
pub use utils::strip_base_path;
