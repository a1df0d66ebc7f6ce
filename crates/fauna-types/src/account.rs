use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{SettlementId, UserId};

/// Capability tag for a user account.
///
/// Roles are a flat capability check, not a hierarchy: an operation names
/// the role it requires and callers are tested with [`UserAccount::has_role`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// May submit population changes for their assigned settlement.
    Volunteer,
    /// May view aggregated reports.
    Employee,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Volunteer => write!(f, "Volunteer"),
            Self::Employee => write!(f, "Employee"),
        }
    }
}

/// A user account as seen by the core: identity, assigned settlement
/// (volunteers only, at most one), and role set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub username: String,
    pub settlement_id: Option<SettlementId>,
    pub roles: Vec<Role>,
}

impl UserAccount {
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            settlement_id: None,
            roles: Vec::new(),
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        if !self.roles.contains(&role) {
            self.roles.push(role);
        }
        self
    }

    pub fn assigned_to(mut self, settlement: SettlementId) -> Self {
        self.settlement_id = Some(settlement);
        self
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_display() {
        assert_eq!(format!("{}", Role::Volunteer), "Volunteer");
        assert_eq!(format!("{}", Role::Employee), "Employee");
    }

    #[test]
    fn builder_sets_roles_and_settlement() {
        let account = UserAccount::new(UserId(1), "maria")
            .with_role(Role::Volunteer)
            .assigned_to(SettlementId(4));

        assert!(account.has_role(Role::Volunteer));
        assert!(!account.has_role(Role::Employee));
        assert_eq!(account.settlement_id, Some(SettlementId(4)));
    }

    #[test]
    fn with_role_is_idempotent() {
        let account = UserAccount::new(UserId(2), "ivan")
            .with_role(Role::Employee)
            .with_role(Role::Employee);
        assert_eq!(account.roles.len(), 1);
    }
}
