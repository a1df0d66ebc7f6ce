use std::collections::HashMap;

use fauna_types::{
    InitialPopulation, Municipality, MunicipalityId, PopulationChange, Settlement, SettlementId,
    Species, SpeciesId,
};

use crate::error::StoreResult;

/// Relational store for the wildlife tracker entities.
///
/// All implementations must satisfy these invariants:
/// - Reference data (municipalities, settlements, species, initial
///   populations) is insert-only; there is no update or delete surface, so
///   referential integrity can never be broken after a successful insert.
/// - Uniqueness indexes are enforced inside the store: species name
///   (global), settlement name (within its municipality), one
///   `InitialPopulation` per (settlement, species), one `PopulationChange`
///   per (settlement, species, year).
/// - [`insert_change`](WildlifeStore::insert_change) performs its duplicate
///   check and the insert as one atomic unit. It is the source of truth for
///   the one-entry-per-year rule; any pre-flight `change_exists` call is a
///   fast-path UX optimization only.
/// - Reads are always safe to run concurrently with writes and never
///   observe a partially applied insert.
pub trait WildlifeStore: Send + Sync {
    // -- reference reads ----------------------------------------------------

    /// All municipalities, sorted by name.
    fn municipalities(&self) -> StoreResult<Vec<Municipality>>;

    /// All settlements, sorted by name.
    fn settlements(&self) -> StoreResult<Vec<Settlement>>;

    /// Settlements belonging to one municipality, sorted by name.
    fn settlements_in(&self, municipality: MunicipalityId) -> StoreResult<Vec<Settlement>>;

    /// All species, sorted by name.
    fn species(&self) -> StoreResult<Vec<Species>>;

    /// Look up a single municipality. `Ok(None)` when the id is unknown.
    fn municipality(&self, id: MunicipalityId) -> StoreResult<Option<Municipality>>;

    /// Look up a single settlement. `Ok(None)` when the id is unknown.
    fn settlement(&self, id: SettlementId) -> StoreResult<Option<Settlement>>;

    /// Look up a single species. `Ok(None)` when the id is unknown.
    fn one_species(&self, id: SpeciesId) -> StoreResult<Option<Species>>;

    // -- reference writes (administrative seeding only) ---------------------

    /// Insert a municipality, assigning its id.
    fn insert_municipality(&self, name: &str) -> StoreResult<Municipality>;

    /// Insert a settlement under an existing municipality, assigning its id.
    fn insert_settlement(
        &self,
        municipality: MunicipalityId,
        name: &str,
    ) -> StoreResult<Settlement>;

    /// Insert a species, assigning its id.
    fn insert_species(&self, name: &str) -> StoreResult<Species>;

    /// Insert the baseline count for a (settlement, species) pair.
    fn insert_initial_population(&self, initial: InitialPopulation) -> StoreResult<()>;

    // -- ledger reads -------------------------------------------------------

    /// Baseline count for a pair. `Ok(None)` when no baseline was seeded.
    fn initial_count(
        &self,
        settlement: SettlementId,
        species: SpeciesId,
    ) -> StoreResult<Option<u32>>;

    /// Every seeded baseline record.
    fn initial_populations(&self) -> StoreResult<Vec<InitialPopulation>>;

    /// Sum of deltas for one pair with `year' <= year`. Zero when no rows.
    fn sum_deltas_up_to(
        &self,
        settlement: SettlementId,
        species: SpeciesId,
        year: i32,
    ) -> StoreResult<i64>;

    /// Delta sums for every pair with `year' <= year`, grouped by pair.
    /// Pairs without any matching change are absent from the map.
    fn delta_sums_up_to(
        &self,
        year: i32,
    ) -> StoreResult<HashMap<(SettlementId, SpeciesId), i64>>;

    /// Whether a change row already exists for the triple.
    fn change_exists(
        &self,
        settlement: SettlementId,
        species: SpeciesId,
        year: i32,
    ) -> StoreResult<bool>;

    /// All change rows for a settlement, in insertion order.
    fn changes_for_settlement(
        &self,
        settlement: SettlementId,
    ) -> StoreResult<Vec<PopulationChange>>;

    // -- ledger write -------------------------------------------------------

    /// Append a change row.
    ///
    /// Fails with [`StoreError::UniqueViolation`] when a row for the
    /// (settlement, species, year) triple already exists, and with
    /// [`StoreError::MissingParent`] when the settlement or species id is
    /// unknown. Never overwrites.
    fn insert_change(&self, change: PopulationChange) -> StoreResult<()>;
}
