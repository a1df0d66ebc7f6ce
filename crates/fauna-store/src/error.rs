use fauna_types::TypeError;

/// Index name reported when the one-change-per-year rule rejects a write.
///
/// Callers that map [`StoreError::UniqueViolation`] to a domain conflict
/// match on this constant rather than a literal, so a rename here is a
/// compile error there instead of a silent behavior change.
pub const CHANGE_UNIQUE_INDEX: &str = "population_change.settlement_id+species_id+year";

/// Errors from wildlife store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A storage-level uniqueness index rejected the write.
    ///
    /// This is the authoritative duplicate guard: callers that pre-check
    /// for duplicates must still handle this variant, because two
    /// concurrent writers can both pass the pre-check.
    #[error("unique constraint violated: {index}")]
    UniqueViolation { index: &'static str },

    /// A write referenced a parent row that does not exist.
    #[error("missing parent row in {table}")]
    MissingParent { table: &'static str },

    /// The value failed entity-level validation.
    #[error(transparent)]
    Invalid(#[from] TypeError),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
