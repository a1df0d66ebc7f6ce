//! Foundation types for the fauna wildlife population tracker.
//!
//! This crate provides the identity, entity, and account types used
//! throughout the fauna system. Every other fauna crate depends on
//! `fauna-types`.
//!
//! # Key Types
//!
//! - [`SettlementId`], [`SpeciesId`], [`MunicipalityId`], [`UserId`] —
//!   surrogate identity keys for the relational entities
//! - [`Settlement`], [`Species`], [`Municipality`] — immutable reference data
//! - [`InitialPopulation`] — the fixed baseline count per (settlement, species)
//! - [`PopulationChange`] — an append-only yearly delta record
//! - [`Role`] / [`UserAccount`] — capability tags for volunteers and staff

pub mod account;
pub mod entity;
pub mod error;
pub mod ids;
pub mod year;

pub use account::{Role, UserAccount};
pub use entity::{InitialPopulation, Municipality, PopulationChange, Settlement, Species};
pub use error::TypeError;
pub use ids::{MunicipalityId, SettlementId, SpeciesId, UserId};
pub use year::{check_year, MAX_YEAR, MIN_YEAR};
