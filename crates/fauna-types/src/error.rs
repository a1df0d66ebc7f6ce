use thiserror::Error;

/// Errors produced by type construction and validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("name too long: {actual} characters (max {max})")]
    NameTooLong { max: usize, actual: usize },

    #[error("year {0} outside the plausible range {min}..={max}", min = crate::year::MIN_YEAR, max = crate::year::MAX_YEAR)]
    YearOutOfRange(i32),
}
