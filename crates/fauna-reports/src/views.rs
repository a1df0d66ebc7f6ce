use std::fmt;

use serde::{Deserialize, Serialize};

use fauna_types::{MunicipalityId, SettlementId, SpeciesId};

/// One cell of the settlement×species matrix.
///
/// A pair with no baseline and no deltas is unknown, not zero — the report
/// must not invent a count of 0 for data that was never collected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatrixCell {
    Count(i64),
    Unknown,
}

impl fmt::Display for MatrixCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Unknown => write!(f, "-"),
        }
    }
}

/// One matrix row: a settlement with a cell per species column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixRow {
    pub settlement_name: String,
    pub cells: Vec<MatrixCell>,
}

/// The settlement×species matrix for a year. Rows are settlements sorted
/// by name; columns are species sorted by name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementMatrix {
    pub year: i32,
    pub year_options: Vec<i32>,
    pub species_headers: Vec<String>,
    pub rows: Vec<MatrixRow>,
}

/// Municipality drill-down total. `total` stays `None` until both filters
/// are supplied — this is a user-driven drill-down, not a default
/// aggregate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MunicipalityTotal {
    pub year: i32,
    pub year_options: Vec<i32>,
    pub municipality_id: Option<MunicipalityId>,
    pub municipality_name: Option<String>,
    pub species_id: Option<SpeciesId>,
    pub species_name: Option<String>,
    pub total: Option<i64>,
}

/// Species total across all settlements. `total` is `None` until the
/// species filter is supplied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesTotal {
    pub year: i32,
    pub year_options: Vec<i32>,
    pub species_id: Option<SpeciesId>,
    pub species_name: Option<String>,
    pub total: Option<i64>,
}

/// One endangered species: its summed current count has strictly decreased
/// from its summed baseline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndangeredRow {
    pub species_name: String,
    pub initial_total: i64,
    pub current_total: i64,
}

/// Endangered species list for a year, sorted by species name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndangeredReport {
    pub year: i32,
    pub year_options: Vec<i32>,
    pub items: Vec<EndangeredRow>,
}

/// Growth figures for one (settlement, species) pair.
///
/// `percent_change` is `None` when the previous count is zero: a growth
/// rate from a zero baseline cannot be expressed, and is deliberately not
/// treated as infinite or zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrowthFigures {
    pub previous_count: i64,
    pub current_count: i64,
    pub percent_change: Option<f64>,
}

/// Year-over-year growth drill-down. `figures` stays `None` until both
/// filters are supplied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Growth {
    pub year: i32,
    pub year_options: Vec<i32>,
    pub settlement_id: Option<SettlementId>,
    pub settlement_name: Option<String>,
    pub species_id: Option<SpeciesId>,
    pub species_name: Option<String>,
    pub figures: Option<GrowthFigures>,
}
