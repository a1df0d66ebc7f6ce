//! Append-only population ledger for the fauna wildlife tracker.
//!
//! This crate is the heart of fauna. It provides:
//! - Point-in-time running counts (`initial + Σ deltas with year' ≤ year`)
//! - Delta validation against the count as of the preceding year
//! - Guarded append-only submission (baseline, duplicate, and
//!   non-negativity checks, with the store's uniqueness index as the
//!   authoritative duplicate guard)
//! - Per-settlement submission history

pub mod error;
pub mod ledger;

pub use error::LedgerError;
pub use ledger::{ChangeRow, DeltaCheck, PopulationLedger};
