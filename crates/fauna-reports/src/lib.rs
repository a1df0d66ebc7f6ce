//! Read-side report aggregation for the fauna wildlife tracker.
//!
//! Everything here is a pure read over [`fauna_store::WildlifeStore`] state
//! for a given year; nothing mutates. The primitive is the one-pass
//! counts-for-year map (every baseline plus grouped delta sums); the
//! settlement×species matrix, municipality/species totals, endangered
//! detection, and year-over-year growth all derive from it.

pub mod aggregator;
pub mod views;
pub mod years;

pub use aggregator::{ReportAggregator, ReportError};
pub use views::{
    EndangeredReport, EndangeredRow, Growth, GrowthFigures, MatrixCell, MatrixRow,
    MunicipalityTotal, SettlementMatrix, SpeciesTotal,
};
pub use years::{ReportYears, FIRST_TRACKED_YEAR};
