use std::collections::HashMap;

use async_trait::async_trait;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

use fauna_types::{Role, SettlementId, UserAccount, UserId};

use crate::error::{ServerError, ServerResult};

/// The authenticated caller, as resolved by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub username: String,
    pub settlement_id: Option<SettlementId>,
    pub roles: Vec<Role>,
}

impl Identity {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Capability check: fails with an access-denied error, not a form
    /// error, so it short-circuits before any domain logic.
    pub fn require_role(&self, role: Role) -> ServerResult<()> {
        if self.has_role(role) {
            Ok(())
        } else {
            Err(ServerError::Forbidden(format!(
                "this operation requires the {role} role"
            )))
        }
    }

    /// The settlement a volunteer may submit for. Volunteers without an
    /// assigned settlement are denied.
    pub fn require_settlement(&self) -> ServerResult<SettlementId> {
        self.settlement_id.ok_or_else(|| {
            ServerError::Forbidden("no settlement is assigned to this account".into())
        })
    }
}

impl From<&UserAccount> for Identity {
    fn from(account: &UserAccount) -> Self {
        Self {
            user_id: account.id,
            username: account.username.clone(),
            settlement_id: account.settlement_id,
            roles: account.roles.clone(),
        }
    }
}

/// Resolves presented credentials to an [`Identity`].
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve a bearer token. Fails with
    /// [`ServerError::Unauthenticated`] for unknown tokens.
    async fn resolve(&self, token: &str) -> ServerResult<Identity>;
}

/// Token-to-account map resolver backed by a fixed account list.
///
/// Tokens are the account usernames; good enough for the demo deployment
/// and for tests. A real deployment would wire a session provider here.
pub struct StaticIdentityProvider {
    accounts: HashMap<String, UserAccount>,
}

impl StaticIdentityProvider {
    pub fn new(accounts: Vec<UserAccount>) -> Self {
        Self {
            accounts: accounts
                .into_iter()
                .map(|a| (a.username.clone(), a))
                .collect(),
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn resolve(&self, token: &str) -> ServerResult<Identity> {
        self.accounts
            .get(token)
            .map(Identity::from)
            .ok_or(ServerError::Unauthenticated)
    }
}

/// Pull the bearer token out of the request headers.
pub fn bearer_token(headers: &HeaderMap) -> ServerResult<&str> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(ServerError::Unauthenticated)?;
    let value = value.to_str().map_err(|_| ServerError::Unauthenticated)?;
    value
        .strip_prefix("Bearer ")
        .ok_or(ServerError::Unauthenticated)
}
