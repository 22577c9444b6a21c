//! Lossless marshaling of calendar dates and money between JSON, memory, and SQLite.
//!
//! Dates travel as `YYYY-MM-DD` text everywhere. Amounts and rates are fixed-point
//! decimals with two fractional digits; binary floating point is refused on every
//! boundary that carries money.

mod date;
mod money;

pub use date::{CalendarDate, StorageValue, DATE_FORMAT};
pub use money::{Amount, Rate};

/// Failures raised while converting dates or decimals.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("malformed date '{0}': expected YYYY-MM-DD")]
    MalformedDate(String),
    #[error("unsupported storage value of type {0} for a calendar date or decimal column")]
    UnsupportedStorageValue(String),
    #[error("malformed decimal '{0}'")]
    MalformedDecimal(String),
    #[error("{field} must be sent as a decimal string, not a binary floating point number")]
    BinaryFloat { field: &'static str },
    #[error("{field} '{value}' exceeds {integer_digits} integer digits")]
    DecimalOverflow {
        field: &'static str,
        value: String,
        integer_digits: u32,
    },
}
