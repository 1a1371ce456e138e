pub mod chase;
pub mod generic_csv;
pub mod input;
pub mod mercury;
pub mod plaid;
pub mod primitives;
pub mod traits;
pub mod wealthsimple;

pub mod prelude {
    pub use super::chase::ChaseCreditCardExtractor;
    pub use super::generic_csv::CsvExtractor;
    pub use super::input::InputFile;
    pub use super::mercury::MercuryExtractor;
    pub use super::plaid::PlaidExtractor;
    pub use super::traits::{Extractor, Transactions};
    pub use super::wealthsimple::WealthsimpleExtractor;
}
