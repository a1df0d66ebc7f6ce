use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::ids::{MunicipalityId, SettlementId, SpeciesId, UserId};

/// Maximum length of a municipality name.
pub const MUNICIPALITY_NAME_MAX: usize = 100;

/// Maximum length of a settlement or species name.
pub const NAME_MAX: usize = 120;

fn check_name(name: &str, max: usize) -> Result<(), TypeError> {
    if name.trim().is_empty() {
        return Err(TypeError::EmptyName);
    }
    let actual = name.chars().count();
    if actual > max {
        return Err(TypeError::NameTooLong { max, actual });
    }
    Ok(())
}

/// A municipality. Immutable reference data, created by administrative
/// seeding and never by end users.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Municipality {
    pub id: MunicipalityId,
    pub name: String,
}

impl Municipality {
    pub fn new(id: MunicipalityId, name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        check_name(&name, MUNICIPALITY_NAME_MAX)?;
        Ok(Self { id, name })
    }
}

/// A settlement belonging to exactly one municipality. Its name is unique
/// within that municipality.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub id: SettlementId,
    pub municipality_id: MunicipalityId,
    pub name: String,
}

impl Settlement {
    pub fn new(
        id: SettlementId,
        municipality_id: MunicipalityId,
        name: impl Into<String>,
    ) -> Result<Self, TypeError> {
        let name = name.into();
        check_name(&name, NAME_MAX)?;
        Ok(Self {
            id,
            municipality_id,
            name,
        })
    }
}

/// An animal species with a globally unique name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    pub id: SpeciesId,
    pub name: String,
}

impl Species {
    pub fn new(id: SpeciesId, name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        check_name(&name, NAME_MAX)?;
        Ok(Self { id, name })
    }
}

/// The population of a species in a settlement at the start of tracking.
///
/// One record per (settlement, species) pair, never updated after creation.
/// Acts as the baseline for every running-count computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialPopulation {
    pub settlement_id: SettlementId,
    pub species_id: SpeciesId,
    pub count: u32,
}

/// An append-only ledger entry: a signed yearly adjustment to a running
/// population count.
///
/// At most one change exists per (settlement, species, year). Rows are
/// created by volunteer submission and never updated or deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationChange {
    pub settlement_id: SettlementId,
    pub species_id: SpeciesId,
    pub year: i32,
    pub delta: i64,
    pub entered_by: UserId,
    pub created_at: DateTime<Utc>,
}
