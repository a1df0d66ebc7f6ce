use fauna_store::{StoreError, CHANGE_UNIQUE_INDEX};

/// Errors produced by ledger operations.
///
/// The first three variants are domain-rule violations meant to be
/// recovered locally and redisplayed to the submitter; they never
/// propagate as faults.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// No `InitialPopulation` exists for the (settlement, species) pair.
    #[error("no baseline data for this species in this settlement; contact an administrator")]
    MissingBaseline,

    /// A change for this (settlement, species, year) already exists,
    /// detected pre-flight or via the store's uniqueness index at commit.
    #[error("data for this species and year has already been entered")]
    DuplicateEntry,

    /// The proposed delta would drive the running count below zero.
    #[error("the change would make the population negative (count before: {before}, delta: {delta})")]
    NegativePopulation { before: i64, delta: i64 },

    /// The submission year is outside the plausible range.
    #[error("year {0} is outside the accepted range")]
    InvalidYear(i32),

    /// Unexpected storage failure outside the known uniqueness case.
    #[error("store error: {0}")]
    Store(String),
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            // The storage uniqueness index on the change triple is the
            // authoritative duplicate guard; both detection paths converge
            // on the same user-facing error.
            StoreError::UniqueViolation {
                index: CHANGE_UNIQUE_INDEX,
            } => Self::DuplicateEntry,
            StoreError::Invalid(fauna_types::TypeError::YearOutOfRange(year)) => {
                Self::InvalidYear(year)
            }
            other => Self::Store(other.to_string()),
        }
    }
}
