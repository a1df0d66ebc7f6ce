use std::collections::HashMap;
use std::sync::Arc;

use fauna_store::{StoreError, WildlifeStore};
use fauna_types::{MunicipalityId, SettlementId, SpeciesId};

use crate::views::{
    EndangeredReport, EndangeredRow, Growth, GrowthFigures, MatrixCell, MatrixRow,
    MunicipalityTotal, SettlementMatrix, SpeciesTotal,
};
use crate::years::ReportYears;

/// Errors produced by report queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    #[error("store error: {0}")]
    Store(String),
}

impl From<StoreError> for ReportError {
    fn from(err: StoreError) -> Self {
        Self::Store(err.to_string())
    }
}

/// Cross-sectional report views over the population ledger state.
///
/// Every operation clamps its requested year into the valid report range
/// first, then reads; nothing here mutates the store.
pub struct ReportAggregator<S> {
    store: Arc<S>,
    years: ReportYears,
}

impl<S> Clone for ReportAggregator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            years: self.years,
        }
    }
}

impl<S: WildlifeStore> ReportAggregator<S> {
    pub fn new(store: Arc<S>, years: ReportYears) -> Self {
        Self { store, years }
    }

    pub fn years(&self) -> ReportYears {
        self.years
    }

    /// Batch running counts for every known pair in one pass: start from
    /// every baseline, then fold in the grouped delta sums with
    /// `year' <= year`.
    ///
    /// Pairs with neither a baseline nor any delta are absent from the map
    /// (unknown, not zero). Pairs with deltas but no baseline appear with
    /// the bare delta sum, matching the single-pair degenerate read.
    pub fn counts_for_year(
        &self,
        year: i32,
    ) -> Result<HashMap<(SettlementId, SpeciesId), i64>, ReportError> {
        let mut counts: HashMap<(SettlementId, SpeciesId), i64> = self
            .store
            .initial_populations()?
            .into_iter()
            .map(|initial| {
                (
                    (initial.settlement_id, initial.species_id),
                    i64::from(initial.count),
                )
            })
            .collect();

        for (pair, sum) in self.store.delta_sums_up_to(year)? {
            *counts.entry(pair).or_insert(0) += sum;
        }

        Ok(counts)
    }

    /// Settlement×species matrix: rows = settlements sorted by name,
    /// columns = species sorted by name, unknown pairs marked, never 0.
    pub fn settlement_matrix(&self, year: i32) -> Result<SettlementMatrix, ReportError> {
        let year = self.years.clamp(year);
        let settlements = self.store.settlements()?;
        let species = self.store.species()?;
        let counts = self.counts_for_year(year)?;

        let rows = settlements
            .iter()
            .map(|settlement| MatrixRow {
                settlement_name: settlement.name.clone(),
                cells: species
                    .iter()
                    .map(|sp| match counts.get(&(settlement.id, sp.id)) {
                        Some(&count) => MatrixCell::Count(count),
                        None => MatrixCell::Unknown,
                    })
                    .collect(),
            })
            .collect();

        Ok(SettlementMatrix {
            year,
            year_options: self.years.options(),
            species_headers: species.into_iter().map(|sp| sp.name).collect(),
            rows,
        })
    }

    /// Total for one species across one municipality's settlements. No
    /// computation until both filters are present.
    pub fn municipality_total(
        &self,
        year: i32,
        municipality: Option<MunicipalityId>,
        species: Option<SpeciesId>,
    ) -> Result<MunicipalityTotal, ReportError> {
        let year = self.years.clamp(year);
        let mut report = MunicipalityTotal {
            year,
            year_options: self.years.options(),
            municipality_id: municipality,
            municipality_name: None,
            species_id: species,
            species_name: None,
            total: None,
        };

        let (Some(municipality), Some(species)) = (municipality, species) else {
            return Ok(report);
        };

        report.municipality_name = self.store.municipality(municipality)?.map(|m| m.name);
        report.species_name = self.store.one_species(species)?.map(|s| s.name);

        let settlement_ids: Vec<SettlementId> = self
            .store
            .settlements_in(municipality)?
            .into_iter()
            .map(|s| s.id)
            .collect();
        let counts = self.counts_for_year(year)?;

        report.total = Some(
            counts
                .iter()
                .filter(|((settlement_id, species_id), _)| {
                    *species_id == species && settlement_ids.contains(settlement_id)
                })
                .map(|(_, &count)| count)
                .sum(),
        );
        Ok(report)
    }

    /// Total for one species across all settlements. No computation until
    /// the species filter is present.
    pub fn species_total(
        &self,
        year: i32,
        species: Option<SpeciesId>,
    ) -> Result<SpeciesTotal, ReportError> {
        let year = self.years.clamp(year);
        let mut report = SpeciesTotal {
            year,
            year_options: self.years.options(),
            species_id: species,
            species_name: None,
            total: None,
        };

        let Some(species) = species else {
            return Ok(report);
        };

        report.species_name = self.store.one_species(species)?.map(|s| s.name);
        let counts = self.counts_for_year(year)?;
        report.total = Some(
            counts
                .iter()
                .filter(|((_, species_id), _)| *species_id == species)
                .map(|(_, &count)| count)
                .sum(),
        );
        Ok(report)
    }

    /// Species whose summed current count has strictly decreased from the
    /// summed baseline, sorted by species name.
    ///
    /// Missing pairs count as 0 here — and only here — so a species with
    /// partial data is still detected rather than skipped.
    pub fn endangered_species(&self, year: i32) -> Result<EndangeredReport, ReportError> {
        let year = self.years.clamp(year);

        let mut initial_by_species: HashMap<SpeciesId, i64> = HashMap::new();
        for initial in self.store.initial_populations()? {
            *initial_by_species.entry(initial.species_id).or_insert(0) +=
                i64::from(initial.count);
        }

        let mut current_by_species: HashMap<SpeciesId, i64> = HashMap::new();
        for ((_, species_id), count) in self.counts_for_year(year)? {
            *current_by_species.entry(species_id).or_insert(0) += count;
        }

        let mut items = Vec::new();
        for (species_id, initial_total) in initial_by_species {
            let current_total = current_by_species.get(&species_id).copied().unwrap_or(0);
            if current_total < initial_total {
                let species_name = self
                    .store
                    .one_species(species_id)?
                    .map(|s| s.name)
                    .unwrap_or_default();
                items.push(EndangeredRow {
                    species_name,
                    initial_total,
                    current_total,
                });
            }
        }
        items.sort_by(|a, b| a.species_name.cmp(&b.species_name));

        Ok(EndangeredReport {
            year,
            year_options: self.years.options(),
            items,
        })
    }

    /// Year-over-year growth for one pair. No computation until both
    /// filters are present; a zero previous count yields no percent.
    pub fn growth(
        &self,
        year: i32,
        settlement: Option<SettlementId>,
        species: Option<SpeciesId>,
    ) -> Result<Growth, ReportError> {
        let year = self.years.clamp(year);
        let mut report = Growth {
            year,
            year_options: self.years.options(),
            settlement_id: settlement,
            settlement_name: None,
            species_id: species,
            species_name: None,
            figures: None,
        };

        let (Some(settlement), Some(species)) = (settlement, species) else {
            return Ok(report);
        };

        report.settlement_name = self.store.settlement(settlement)?.map(|s| s.name);
        report.species_name = self.store.one_species(species)?.map(|s| s.name);

        let pair = (settlement, species);
        let current = self
            .counts_for_year(year)?
            .get(&pair)
            .copied()
            .unwrap_or(0);
        let previous = self
            .counts_for_year(year - 1)?
            .get(&pair)
            .copied()
            .unwrap_or(0);

        let percent_change = if previous == 0 {
            None
        } else {
            Some((current - previous) as f64 / previous as f64 * 100.0)
        };

        report.figures = Some(GrowthFigures {
            previous_count: previous,
            current_count: current,
            percent_change,
        });
        Ok(report)
    }
}
