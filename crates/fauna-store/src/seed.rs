use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use fauna_types::{
    InitialPopulation, PopulationChange, Role, SettlementId, UserAccount, UserId,
};

use crate::error::StoreResult;
use crate::traits::WildlifeStore;

/// Fixed RNG seed so the demo dataset is identical on every run.
const DEMO_SEED: u64 = 0xFA04A;

/// User id of the demo employee account.
pub const DEMO_EMPLOYEE_ID: UserId = UserId(1000);

const MUNICIPALITIES: &[(&str, &[&str])] = &[
    ("Cedar Valley", &["Riverside", "Oakhurst", "Mill Creek"]),
    ("Lakeshore", &["Northport", "Heron Bay", "Stonebridge"]),
    ("Pinewood", &["Falcon Ridge", "Larchfield", "Brookvale"]),
];

const SPECIES: &[&str] = &[
    "European Hare",
    "Golden Eagle",
    "Grey Wolf",
    "Red Deer",
    "Wild Boar",
];

/// Row counts produced by [`seed_demo_data`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedSummary {
    pub municipalities: usize,
    pub settlements: usize,
    pub species: usize,
    pub initial_populations: usize,
    pub changes: usize,
}

/// Populate a store with the deterministic demo dataset.
///
/// The data is illustrative only; what matters is that it respects the
/// domain invariants: every change has a baseline, at most one change per
/// (settlement, species, year), and no running count ever goes negative.
/// A few pairs are deliberately left without a baseline so the matrix
/// report has "unknown" cells to show.
pub fn seed_demo_data(store: &impl WildlifeStore, years: &[i32]) -> StoreResult<SeedSummary> {
    let mut rng = StdRng::seed_from_u64(DEMO_SEED);
    let mut summary = SeedSummary {
        municipalities: 0,
        settlements: 0,
        species: 0,
        initial_populations: 0,
        changes: 0,
    };

    for (municipality_name, settlement_names) in MUNICIPALITIES {
        let municipality = store.insert_municipality(municipality_name)?;
        summary.municipalities += 1;
        for settlement_name in *settlement_names {
            store.insert_settlement(municipality.id, settlement_name)?;
            summary.settlements += 1;
        }
    }

    let mut species_ids = Vec::new();
    for species_name in SPECIES {
        species_ids.push(store.insert_species(species_name)?.id);
        summary.species += 1;
    }

    // Volunteer ids follow the name-sorted settlement order, matching
    // `demo_accounts`.
    let settlements = store.settlements()?;
    for (position, settlement) in settlements.iter().enumerate() {
        let volunteer = UserId(position as u32 + 1);
        for &species_id in &species_ids {
            // Roughly one pair in six has no baseline (never tracked here).
            if rng.gen_range(0..6) == 0 {
                continue;
            }
            let count = rng.gen_range(20..=400u32);
            store.insert_initial_population(InitialPopulation {
                settlement_id: settlement.id,
                species_id,
                count,
            })?;
            summary.initial_populations += 1;

            let mut running = i64::from(count);
            for &year in years {
                // Some years simply have no report from the field.
                if rng.gen_range(0..4) == 0 {
                    continue;
                }
                let floor = -running.min(35);
                let delta = rng.gen_range(floor..=40);
                store.insert_change(PopulationChange {
                    settlement_id: settlement.id,
                    species_id,
                    year,
                    delta,
                    entered_by: volunteer,
                    created_at: Utc::now(),
                })?;
                running += delta;
                summary.changes += 1;
            }
        }
    }

    tracing::info!(
        municipalities = summary.municipalities,
        settlements = summary.settlements,
        species = summary.species,
        initials = summary.initial_populations,
        changes = summary.changes,
        "seeded demo dataset"
    );

    Ok(summary)
}

/// Demo user accounts: one volunteer per settlement plus one employee.
///
/// Volunteer ids are positional over the name-sorted settlement list, the
/// same assignment `seed_demo_data` uses for `entered_by`.
pub fn demo_accounts(settlements: &[fauna_types::Settlement]) -> Vec<UserAccount> {
    let mut accounts: Vec<UserAccount> = settlements
        .iter()
        .enumerate()
        .map(|(position, settlement)| {
            let username = format!(
                "vol-{}",
                settlement.name.to_lowercase().replace(' ', "-")
            );
            UserAccount::new(UserId(position as u32 + 1), username)
                .with_role(Role::Volunteer)
                .assigned_to(settlement.id)
        })
        .collect();
    accounts.push(
        UserAccount::new(DEMO_EMPLOYEE_ID, "inspector").with_role(Role::Employee),
    );
    accounts
}

/// Convenience: the settlement a demo volunteer is assigned to, if any.
pub fn volunteer_settlement(accounts: &[UserAccount], user: UserId) -> Option<SettlementId> {
    accounts
        .iter()
        .find(|a| a.id == user)
        .and_then(|a| a.settlement_id)
}
