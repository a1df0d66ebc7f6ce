use std::sync::Arc;

use axum::http::HeaderMap;

use fauna_ledger::PopulationLedger;
use fauna_reports::{ReportAggregator, ReportYears};
use fauna_store::{demo_accounts, seed_demo_data, InMemoryStore, WildlifeStore};
use fauna_types::UserAccount;

use crate::auth::{bearer_token, Identity, IdentityProvider, StaticIdentityProvider};
use crate::config::ServerConfig;
use crate::error::ServerResult;

/// Shared application state: the ledger and aggregator over one store,
/// plus the identity provider. Cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub ledger: PopulationLedger<InMemoryStore>,
    pub reports: ReportAggregator<InMemoryStore>,
    pub identities: Arc<dyn IdentityProvider>,
}

impl AppState {
    /// Build state from configuration, seeding the demo dataset and demo
    /// accounts when enabled.
    pub fn from_config(config: &ServerConfig) -> ServerResult<Self> {
        let store = Arc::new(InMemoryStore::new());
        let years = ReportYears::new(config.first_tracked_year);

        let accounts: Vec<UserAccount> = if config.demo_seed {
            let mut seed_years = years.options();
            seed_years.reverse();
            seed_demo_data(store.as_ref(), &seed_years)?;
            demo_accounts(&store.settlements()?)
        } else {
            Vec::new()
        };

        Ok(Self::new(store, years, Arc::new(StaticIdentityProvider::new(accounts))))
    }

    pub fn new(
        store: Arc<InMemoryStore>,
        years: ReportYears,
        identities: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            ledger: PopulationLedger::new(Arc::clone(&store)),
            reports: ReportAggregator::new(store, years),
            identities,
        }
    }

    /// Resolve the caller from request headers.
    pub async fn authenticate(&self, headers: &HeaderMap) -> ServerResult<Identity> {
        let token = bearer_token(headers)?;
        self.identities.resolve(token).await
    }
}
