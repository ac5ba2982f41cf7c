//! Case identifier handling
//!
//! A case identifier has the form `NUMBER/RD/YEAR` (for example `123/RD/2023`).
//! The year selects which yearly bulletin has to be scanned; the full string is
//! the token searched for inside that bulletin.

mod parser;

pub use parser::{CaseId, MAX_YEAR, MIN_YEAR, RD_TAG};

use thiserror::Error;

/// Reasons a case identifier is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaseIdError {
    #[error("invalid format, use NUMBER/RD/YEAR (e.g. 123/RD/2023)")]
    Shape,

    #[error("case number must have between 1 and 5 digits, got '{0}'")]
    Number(String),

    #[error("year must have exactly 4 digits, got '{0}'")]
    YearDigits(String),

    #[error("year {0} is outside the valid range 2000-2100")]
    YearOutOfRange(u16),
}
