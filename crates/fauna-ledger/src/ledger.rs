use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fauna_store::WildlifeStore;
use fauna_types::{check_year, PopulationChange, SettlementId, SpeciesId, UserId};

use crate::error::LedgerError;

/// Result of validating a proposed delta against the preceding year.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaCheck {
    /// Running count as of the year before the submission year.
    pub before: i64,
    /// Human-readable rejection reason; `None` when the delta is valid.
    pub reason: Option<String>,
}

impl DeltaCheck {
    pub fn is_ok(&self) -> bool {
        self.reason.is_none()
    }
}

/// One row of a settlement's submission history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRow {
    pub species_id: SpeciesId,
    pub species_name: String,
    pub year: i32,
    pub delta: i64,
    pub entered_by: UserId,
    pub created_at: DateTime<Utc>,
}

/// The append-only record of population deltas and initial counts.
///
/// Answers point-in-time count queries and validates proposed deltas
/// against the non-negativity invariant. Counts are pure prefix sums over
/// the sparse by-year delta sequence, so submissions may arrive in any
/// year order and still produce a consistent historical view: deltas are
/// never summed beyond the requested year boundary.
pub struct PopulationLedger<S> {
    store: Arc<S>,
}

impl<S> Clone for PopulationLedger<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: WildlifeStore> PopulationLedger<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Running count for a pair as of the end of `year`:
    /// `initial + Σ{delta : year' ≤ year}`.
    ///
    /// A missing baseline is treated as 0 — no submissions should be
    /// possible without one, but the query must not fail.
    pub fn count_up_to_year(
        &self,
        settlement: SettlementId,
        species: SpeciesId,
        year: i32,
    ) -> Result<i64, LedgerError> {
        let initial = self
            .store
            .initial_count(settlement, species)?
            .map(i64::from)
            .unwrap_or(0);
        let deltas = self.store.sum_deltas_up_to(settlement, species, year)?;
        Ok(initial + deltas)
    }

    /// Validate a proposed delta against the count as of `year - 1`.
    ///
    /// Strictly the preceding year: later-dated entries never retroactively
    /// influence earlier validity. A delta whose application would leave
    /// `i64` range is rejected the same way as an overdraw, so every
    /// accepted running count stays representable.
    pub fn check_delta(
        &self,
        settlement: SettlementId,
        species: SpeciesId,
        year: i32,
        delta: i64,
    ) -> Result<DeltaCheck, LedgerError> {
        let preceding = year
            .checked_sub(1)
            .ok_or(LedgerError::InvalidYear(year))?;
        let before = self.count_up_to_year(settlement, species, preceding)?;
        let reason = match before.checked_add(delta) {
            Some(after) if after >= 0 => None,
            _ => Some(LedgerError::NegativePopulation { before, delta }.to_string()),
        };
        Ok(DeltaCheck { before, reason })
    }

    /// Append a population change.
    ///
    /// Succeeds only when a baseline exists for the pair, no change exists
    /// for the (settlement, species, year) triple, and the delta keeps the
    /// running count non-negative. The duplicate pre-check here is a fast
    /// path; the store's uniqueness index makes the final call, so a
    /// concurrent loser still receives [`LedgerError::DuplicateEntry`].
    pub fn submit_change(
        &self,
        settlement: SettlementId,
        species: SpeciesId,
        year: i32,
        delta: i64,
        entered_by: UserId,
    ) -> Result<PopulationChange, LedgerError> {
        check_year(year).map_err(|_| LedgerError::InvalidYear(year))?;

        if self.store.initial_count(settlement, species)?.is_none() {
            return Err(LedgerError::MissingBaseline);
        }

        if self.store.change_exists(settlement, species, year)? {
            return Err(LedgerError::DuplicateEntry);
        }

        let check = self.check_delta(settlement, species, year, delta)?;
        if !check.is_ok() {
            return Err(LedgerError::NegativePopulation {
                before: check.before,
                delta,
            });
        }

        let change = PopulationChange {
            settlement_id: settlement,
            species_id: species,
            year,
            delta,
            entered_by,
            created_at: Utc::now(),
        };
        self.store.insert_change(change.clone())?;

        tracing::info!(
            settlement = %settlement,
            species = %species,
            year,
            delta,
            entered_by = %entered_by,
            "population change recorded"
        );
        Ok(change)
    }

    /// Submission history for a settlement: newest year first, ties broken
    /// by species name.
    pub fn changes_for_settlement(
        &self,
        settlement: SettlementId,
    ) -> Result<Vec<ChangeRow>, LedgerError> {
        let changes = self.store.changes_for_settlement(settlement)?;
        let mut rows = Vec::with_capacity(changes.len());
        for change in changes {
            let species_name = self
                .store
                .one_species(change.species_id)?
                .map(|s| s.name)
                .unwrap_or_default();
            rows.push(ChangeRow {
                species_id: change.species_id,
                species_name,
                year: change.year,
                delta: change.delta,
                entered_by: change.entered_by,
                created_at: change.created_at,
            });
        }
        rows.sort_by(|a, b| {
            b.year
                .cmp(&a.year)
                .then_with(|| a.species_name.cmp(&b.species_name))
        });
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use fauna_store::{InMemoryStore, WildlifeStore};
    use fauna_types::InitialPopulation;

    use super::*;

    const VOLUNTEER: UserId = UserId(1);

    fn ledger_with_pair(count: u32) -> (PopulationLedger<InMemoryStore>, SettlementId, SpeciesId) {
        let store = InMemoryStore::new();
        let mun = store.insert_municipality("Cedar Valley").unwrap();
        let stl = store.insert_settlement(mun.id, "Riverside").unwrap();
        let spc = store.insert_species("Red Deer").unwrap();
        store
            .insert_initial_population(InitialPopulation {
                settlement_id: stl.id,
                species_id: spc.id,
                count,
            })
            .unwrap();
        (PopulationLedger::new(Arc::new(store)), stl.id, spc.id)
    }

    #[test]
    fn count_is_initial_plus_prefix_sum() {
        let (ledger, stl, spc) = ledger_with_pair(100);
        ledger.submit_change(stl, spc, 2023, -10, VOLUNTEER).unwrap();
        ledger.submit_change(stl, spc, 2025, 7, VOLUNTEER).unwrap();

        assert_eq!(ledger.count_up_to_year(stl, spc, 2022).unwrap(), 100);
        assert_eq!(ledger.count_up_to_year(stl, spc, 2023).unwrap(), 90);
        assert_eq!(ledger.count_up_to_year(stl, spc, 2024).unwrap(), 90);
        assert_eq!(ledger.count_up_to_year(stl, spc, 2025).unwrap(), 97);
    }

    #[test]
    fn missing_baseline_counts_as_zero_but_blocks_submission() {
        let (ledger, stl, _) = ledger_with_pair(100);
        let other = ledger.store().insert_species("Grey Wolf").unwrap();

        // The read degenerates to 0 instead of failing.
        assert_eq!(ledger.count_up_to_year(stl, other.id, 2024).unwrap(), 0);

        let err = ledger
            .submit_change(stl, other.id, 2024, 5, VOLUNTEER)
            .unwrap_err();
        assert_eq!(err, LedgerError::MissingBaseline);
    }

    #[test]
    fn overdraw_is_rejected_but_a_smaller_delta_passes() {
        // Baseline 100. delta -20 @2024 ok; -90 @2025 would go to -10 and
        // is rejected; -30 @2025 lands at 50 and succeeds.
        let (ledger, stl, spc) = ledger_with_pair(100);

        ledger.submit_change(stl, spc, 2024, -20, VOLUNTEER).unwrap();
        assert_eq!(ledger.count_up_to_year(stl, spc, 2024).unwrap(), 80);

        let err = ledger
            .submit_change(stl, spc, 2025, -90, VOLUNTEER)
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::NegativePopulation {
                before: 80,
                delta: -90
            }
        );

        ledger.submit_change(stl, spc, 2025, -30, VOLUNTEER).unwrap();
        assert_eq!(ledger.count_up_to_year(stl, spc, 2025).unwrap(), 50);
    }

    #[test]
    fn duplicate_year_is_rejected_either_path() {
        let (ledger, stl, spc) = ledger_with_pair(100);
        ledger.submit_change(stl, spc, 2024, 3, VOLUNTEER).unwrap();

        // Pre-flight path.
        let err = ledger
            .submit_change(stl, spc, 2024, 8, VOLUNTEER)
            .unwrap_err();
        assert_eq!(err, LedgerError::DuplicateEntry);

        // Commit-time path: bypass the pre-check by writing straight to the
        // store, as a racing submitter would.
        let store_err = ledger
            .store()
            .insert_change(PopulationChange {
                settlement_id: stl,
                species_id: spc,
                year: 2024,
                delta: 8,
                entered_by: VOLUNTEER,
                created_at: Utc::now(),
            })
            .unwrap_err();
        assert_eq!(LedgerError::from(store_err), LedgerError::DuplicateEntry);
    }

    #[test]
    fn check_delta_uses_preceding_year_only() {
        let (ledger, stl, spc) = ledger_with_pair(50);
        // A later-dated gain must not rescue an earlier overdraw.
        ledger.submit_change(stl, spc, 2025, 40, VOLUNTEER).unwrap();

        let check = ledger.check_delta(stl, spc, 2024, -60).unwrap();
        assert_eq!(check.before, 50);
        assert!(!check.is_ok());
        assert!(check.reason.unwrap().contains("50"));

        let check = ledger.check_delta(stl, spc, 2024, -50).unwrap();
        assert!(check.is_ok());
    }

    #[test]
    fn extreme_deltas_are_rejected_not_wrapped() {
        let (ledger, stl, spc) = ledger_with_pair(100);

        let err = ledger
            .submit_change(stl, spc, 2024, i64::MAX, VOLUNTEER)
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::NegativePopulation {
                before: 100,
                delta: i64::MAX
            }
        );
        // Nothing was recorded.
        assert_eq!(ledger.count_up_to_year(stl, spc, 2024).unwrap(), 100);

        let check = ledger.check_delta(stl, spc, 2024, i64::MIN).unwrap();
        assert_eq!(check.before, 100);
        assert!(!check.is_ok());
    }

    #[test]
    fn preceding_year_lookup_does_not_underflow() {
        let (ledger, stl, spc) = ledger_with_pair(10);
        let err = ledger.check_delta(stl, spc, i32::MIN, 1).unwrap_err();
        assert_eq!(err, LedgerError::InvalidYear(i32::MIN));
    }

    #[test]
    fn implausible_year_is_rejected_before_domain_checks() {
        let (ledger, stl, spc) = ledger_with_pair(10);
        let err = ledger
            .submit_change(stl, spc, 1899, 1, VOLUNTEER)
            .unwrap_err();
        assert_eq!(err, LedgerError::InvalidYear(1899));
    }

    #[test]
    fn history_is_newest_year_first_with_species_name_ties() {
        let (ledger, stl, deer) = ledger_with_pair(100);
        let boar = ledger.store().insert_species("Wild Boar").unwrap();
        ledger
            .store()
            .insert_initial_population(InitialPopulation {
                settlement_id: stl,
                species_id: boar.id,
                count: 40,
            })
            .unwrap();

        ledger.submit_change(stl, boar.id, 2024, 2, VOLUNTEER).unwrap();
        ledger.submit_change(stl, deer, 2023, -5, VOLUNTEER).unwrap();
        ledger.submit_change(stl, deer, 2024, 1, VOLUNTEER).unwrap();

        let rows = ledger.changes_for_settlement(stl).unwrap();
        let keys: Vec<(i32, &str)> = rows
            .iter()
            .map(|r| (r.year, r.species_name.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![(2024, "Red Deer"), (2024, "Wild Boar"), (2023, "Red Deer")]
        );
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            /// Any sequence of accepted submissions keeps every prefix
            /// count non-negative, in every recorded year.
            #[test]
            fn accepted_submissions_never_go_negative(
                initial in 0u32..500,
                deltas in proptest::collection::vec(-200i64..200, 0..20),
            ) {
                let (ledger, stl, spc) = ledger_with_pair(initial);
                let mut year = 2023;
                for delta in deltas {
                    let _ = ledger.submit_change(stl, spc, year, delta, VOLUNTEER);
                    year += 1;
                }
                for check_year in 2023..year {
                    let count = ledger.count_up_to_year(stl, spc, check_year).unwrap();
                    prop_assert!(count >= 0, "count {count} in {check_year}");
                }
            }

            /// The running count equals initial + the sum of recorded
            /// deltas up to the year, for every year boundary.
            #[test]
            fn count_matches_manual_prefix_sum(
                initial in 0u32..500,
                deltas in proptest::collection::vec(-50i64..80, 1..10),
            ) {
                let (ledger, stl, spc) = ledger_with_pair(initial);
                let mut recorded: Vec<(i32, i64)> = Vec::new();
                for (offset, delta) in deltas.iter().enumerate() {
                    let year = 2023 + offset as i32;
                    if ledger.submit_change(stl, spc, year, *delta, VOLUNTEER).is_ok() {
                        recorded.push((year, *delta));
                    }
                }
                for boundary in 2022..2023 + deltas.len() as i32 {
                    let expected: i64 = i64::from(initial)
                        + recorded.iter().filter(|(y, _)| *y <= boundary).map(|(_, d)| d).sum::<i64>();
                    prop_assert_eq!(ledger.count_up_to_year(stl, spc, boundary).unwrap(), expected);
                }
            }
        }
    }
}
