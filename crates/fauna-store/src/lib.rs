//! Storage boundary for the fauna wildlife population tracker.
//!
//! This crate provides:
//! - The [`WildlifeStore`] trait — transactional create/read/query over the
//!   reference entities and the population ledger rows, with uniqueness and
//!   referential-integrity rules enforced at the storage level
//! - [`InMemoryStore`] — `RwLock`-guarded implementation for tests, demos,
//!   and embedding
//! - [`seed`] — a deterministic demo dataset

pub mod error;
pub mod memory;
pub mod seed;
pub mod traits;

pub use error::{StoreError, StoreResult, CHANGE_UNIQUE_INDEX};
pub use memory::InMemoryStore;
pub use seed::{demo_accounts, seed_demo_data, volunteer_settlement, SeedSummary, DEMO_EMPLOYEE_ID};
pub use traits::WildlifeStore;
