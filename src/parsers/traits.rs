use crate::errors::ExtractResult;
use crate::fingerprint::Fingerprint;
use crate::registry::FileFormat;
use crate::types::Transaction;

/// Lazy, finite sequence of extracted records in physical row order.
///
/// It stops after yielding the first error.
pub type Transactions<'a> = Box<dyn Iterator<Item = ExtractResult<Transaction>> + 'a>;

/// Detect / fingerprint / extract contract shared by every export format.
///
/// Each call rewinds the input first, so calls can be made in any order on
/// the same instance. An instance is not meant to be shared between threads.
pub trait Extractor {
    fn format(&self) -> FileFormat;

    /// Whether the header row belongs to this format. Never fails.
    fn detect(&mut self) -> bool;

    /// `None` when the input has no data rows.
    fn fingerprint(&mut self) -> ExtractResult<Option<Fingerprint>>;

    fn extract(&mut self) -> ExtractResult<Transactions<'_>>;
}
