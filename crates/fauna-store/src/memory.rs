use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::RwLock;

use fauna_types::{
    check_year, InitialPopulation, Municipality, MunicipalityId, PopulationChange, Settlement,
    SettlementId, Species, SpeciesId,
};

use crate::error::{StoreError, StoreResult, CHANGE_UNIQUE_INDEX};
use crate::traits::WildlifeStore;

/// In-memory, map-based wildlife store.
///
/// Intended for tests, demos, and embedding. All rows are held in memory
/// behind a `RwLock`; the duplicate check and insert for change rows happen
/// under a single write lock, so the uniqueness guard is atomic.
pub struct InMemoryStore {
    inner: RwLock<StoreState>,
}

#[derive(Default)]
struct StoreState {
    municipalities: BTreeMap<MunicipalityId, Municipality>,
    settlements: BTreeMap<SettlementId, Settlement>,
    species: BTreeMap<SpeciesId, Species>,
    initials: HashMap<(SettlementId, SpeciesId), u32>,
    changes: Vec<PopulationChange>,
    // Uniqueness index over (settlement, species, year).
    change_index: HashSet<(SettlementId, SpeciesId, i32)>,
    next_municipality: u32,
    next_settlement: u32,
    next_species: u32,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreState::default()),
        }
    }

    /// Number of change rows currently stored.
    pub fn change_count(&self) -> usize {
        self.inner.read().expect("lock poisoned").changes.len()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn sorted_by_name<T: Clone>(rows: impl Iterator<Item = T>, name: impl Fn(&T) -> String) -> Vec<T> {
    let mut out: Vec<T> = rows.collect();
    out.sort_by_key(name);
    out
}

impl WildlifeStore for InMemoryStore {
    fn municipalities(&self) -> StoreResult<Vec<Municipality>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(sorted_by_name(state.municipalities.values().cloned(), |m| {
            m.name.clone()
        }))
    }

    fn settlements(&self) -> StoreResult<Vec<Settlement>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(sorted_by_name(state.settlements.values().cloned(), |s| {
            s.name.clone()
        }))
    }

    fn settlements_in(&self, municipality: MunicipalityId) -> StoreResult<Vec<Settlement>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(sorted_by_name(
            state
                .settlements
                .values()
                .filter(|s| s.municipality_id == municipality)
                .cloned(),
            |s| s.name.clone(),
        ))
    }

    fn species(&self) -> StoreResult<Vec<Species>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(sorted_by_name(state.species.values().cloned(), |s| {
            s.name.clone()
        }))
    }

    fn municipality(&self, id: MunicipalityId) -> StoreResult<Option<Municipality>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state.municipalities.get(&id).cloned())
    }

    fn settlement(&self, id: SettlementId) -> StoreResult<Option<Settlement>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state.settlements.get(&id).cloned())
    }

    fn one_species(&self, id: SpeciesId) -> StoreResult<Option<Species>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state.species.get(&id).cloned())
    }

    fn insert_municipality(&self, name: &str) -> StoreResult<Municipality> {
        let mut state = self.inner.write().expect("lock poisoned");
        if state.municipalities.values().any(|m| m.name == name) {
            return Err(StoreError::UniqueViolation {
                index: "municipality.name",
            });
        }
        state.next_municipality += 1;
        let municipality = Municipality::new(MunicipalityId(state.next_municipality), name)?;
        state
            .municipalities
            .insert(municipality.id, municipality.clone());
        Ok(municipality)
    }

    fn insert_settlement(
        &self,
        municipality: MunicipalityId,
        name: &str,
    ) -> StoreResult<Settlement> {
        let mut state = self.inner.write().expect("lock poisoned");
        if !state.municipalities.contains_key(&municipality) {
            return Err(StoreError::MissingParent {
                table: "municipality",
            });
        }
        if state
            .settlements
            .values()
            .any(|s| s.municipality_id == municipality && s.name == name)
        {
            return Err(StoreError::UniqueViolation {
                index: "settlement.municipality_id+name",
            });
        }
        state.next_settlement += 1;
        let settlement = Settlement::new(SettlementId(state.next_settlement), municipality, name)?;
        state.settlements.insert(settlement.id, settlement.clone());
        Ok(settlement)
    }

    fn insert_species(&self, name: &str) -> StoreResult<Species> {
        let mut state = self.inner.write().expect("lock poisoned");
        if state.species.values().any(|s| s.name == name) {
            return Err(StoreError::UniqueViolation {
                index: "species.name",
            });
        }
        state.next_species += 1;
        let species = Species::new(SpeciesId(state.next_species), name)?;
        state.species.insert(species.id, species.clone());
        Ok(species)
    }

    fn insert_initial_population(&self, initial: InitialPopulation) -> StoreResult<()> {
        let mut state = self.inner.write().expect("lock poisoned");
        if !state.settlements.contains_key(&initial.settlement_id) {
            return Err(StoreError::MissingParent {
                table: "settlement",
            });
        }
        if !state.species.contains_key(&initial.species_id) {
            return Err(StoreError::MissingParent { table: "species" });
        }
        let key = (initial.settlement_id, initial.species_id);
        if state.initials.contains_key(&key) {
            return Err(StoreError::UniqueViolation {
                index: "initial_population.settlement_id+species_id",
            });
        }
        state.initials.insert(key, initial.count);
        Ok(())
    }

    fn initial_count(
        &self,
        settlement: SettlementId,
        species: SpeciesId,
    ) -> StoreResult<Option<u32>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state.initials.get(&(settlement, species)).copied())
    }

    fn initial_populations(&self) -> StoreResult<Vec<InitialPopulation>> {
        let state = self.inner.read().expect("lock poisoned");
        let mut rows: Vec<InitialPopulation> = state
            .initials
            .iter()
            .map(|(&(settlement_id, species_id), &count)| InitialPopulation {
                settlement_id,
                species_id,
                count,
            })
            .collect();
        rows.sort_by_key(|r| (r.settlement_id, r.species_id));
        Ok(rows)
    }

    fn sum_deltas_up_to(
        &self,
        settlement: SettlementId,
        species: SpeciesId,
        year: i32,
    ) -> StoreResult<i64> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state
            .changes
            .iter()
            .filter(|c| {
                c.settlement_id == settlement && c.species_id == species && c.year <= year
            })
            .map(|c| c.delta)
            .sum())
    }

    fn delta_sums_up_to(
        &self,
        year: i32,
    ) -> StoreResult<HashMap<(SettlementId, SpeciesId), i64>> {
        let state = self.inner.read().expect("lock poisoned");
        let mut sums: HashMap<(SettlementId, SpeciesId), i64> = HashMap::new();
        for change in state.changes.iter().filter(|c| c.year <= year) {
            *sums
                .entry((change.settlement_id, change.species_id))
                .or_insert(0) += change.delta;
        }
        Ok(sums)
    }

    fn change_exists(
        &self,
        settlement: SettlementId,
        species: SpeciesId,
        year: i32,
    ) -> StoreResult<bool> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state.change_index.contains(&(settlement, species, year)))
    }

    fn changes_for_settlement(
        &self,
        settlement: SettlementId,
    ) -> StoreResult<Vec<PopulationChange>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state
            .changes
            .iter()
            .filter(|c| c.settlement_id == settlement)
            .cloned()
            .collect())
    }

    fn insert_change(&self, change: PopulationChange) -> StoreResult<()> {
        check_year(change.year)?;
        let mut state = self.inner.write().expect("lock poisoned");
        if !state.settlements.contains_key(&change.settlement_id) {
            return Err(StoreError::MissingParent {
                table: "settlement",
            });
        }
        if !state.species.contains_key(&change.species_id) {
            return Err(StoreError::MissingParent { table: "species" });
        }
        let key = (change.settlement_id, change.species_id, change.year);
        // Check and insert under one write lock: this is the authoritative
        // one-entry-per-year guard.
        if !state.change_index.insert(key) {
            return Err(StoreError::UniqueViolation {
                index: CHANGE_UNIQUE_INDEX,
            });
        }
        state.changes.push(change);
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.read().expect("lock poisoned");
        f.debug_struct("InMemoryStore")
            .field("municipalities", &state.municipalities.len())
            .field("settlements", &state.settlements.len())
            .field("species", &state.species.len())
            .field("initials", &state.initials.len())
            .field("changes", &state.changes.len())
            .finish()
    }
}
