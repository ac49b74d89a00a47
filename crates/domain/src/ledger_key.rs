use std::fmt::{Display, Formatter};

use crate::RumorId;

/// Key prefix for role definitions.
pub const ROLE_KEY_PREFIX: &str = "ROLE_";

/// Key prefix for user role assignments.
pub const USER_ROLE_KEY_PREFIX: &str = "USER_ROLE_";

/// Prefixes owned by the authorization service. Record ids may not start
/// with any of them.
pub const RESERVED_KEY_PREFIXES: &[&str] = &[ROLE_KEY_PREFIX, USER_ROLE_KEY_PREFIX];

/// Ownership-tagged key into the shared ledger namespace.
///
/// Both services write the same channel, so every key is built through this
/// type. Rendered keys keep the flat `ROLE_…` / `USER_ROLE_…` / bare-id layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LedgerKey {
    /// Role definition keyed by role name.
    Role(String),
    /// Role assignment keyed by user identifier.
    UserRole(String),
    /// Rumor record keyed by its validated id.
    Rumor(RumorId),
}

impl LedgerKey {
    /// Builds the key of a role definition.
    #[must_use]
    pub fn role(name: &str) -> Self {
        Self::Role(name.to_owned())
    }

    /// Builds the key of a user's role assignment.
    #[must_use]
    pub fn user_role(user_id: &str) -> Self {
        Self::UserRole(user_id.to_owned())
    }

    /// Builds the key of a rumor record.
    #[must_use]
    pub fn rumor(id: &RumorId) -> Self {
        Self::Rumor(id.clone())
    }

    /// Renders the flat storage key.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Role(name) => format!("{ROLE_KEY_PREFIX}{name}"),
            Self::UserRole(user_id) => format!("{USER_ROLE_KEY_PREFIX}{user_id}"),
            Self::Rumor(id) => id.as_str().to_owned(),
        }
    }
}

impl Display for LedgerKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.render().as_str())
    }
}
