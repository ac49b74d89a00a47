use serde::{Deserialize, Serialize};

/// Built-in capability names checked by the record service.
///
/// Roles store permissions as free-form strings, so custom roles may carry
/// names outside this set; those simply never match a built-in check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    /// Allows creating new rumor records.
    CreateRumor,
    /// Allows recording a verification verdict.
    VerifyRumor,
    /// Allows reading records and their history.
    ViewRumor,
    /// Allows managing role definitions and assignments.
    ManageRoles,
    /// Allows managing permission catalogs.
    ManagePermissions,
}

impl Permission {
    /// Returns a stable storage value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateRumor => "CREATE_RUMOR",
            Self::VerifyRumor => "VERIFY_RUMOR",
            Self::ViewRumor => "VIEW_RUMOR",
            Self::ManageRoles => "MANAGE_ROLES",
            Self::ManagePermissions => "MANAGE_PERMISSIONS",
        }
    }
}

/// Roles installed, and reset, by the authorization service's init.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservedRole {
    /// Full administrative access.
    Admin,
    /// Reviews and verifies records.
    Verifier,
    /// Reports and reads records.
    User,
}

impl ReservedRole {
    /// Returns the stored role name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Verifier => "VERIFIER",
            Self::User => "USER",
        }
    }

    /// Returns the seed permissions in their stored order.
    #[must_use]
    pub fn default_permissions(&self) -> &'static [Permission] {
        match self {
            Self::Admin => &[
                Permission::CreateRumor,
                Permission::VerifyRumor,
                Permission::ManageRoles,
                Permission::ManagePermissions,
            ],
            Self::Verifier => &[Permission::VerifyRumor, Permission::ViewRumor],
            Self::User => &[Permission::CreateRumor, Permission::ViewRumor],
        }
    }

    /// Returns every reserved role in seeding order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[Self::Admin, Self::Verifier, Self::User]
    }
}

/// Event names a transaction may attach to its commit receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedgerEventKind {
    /// Emitted when a rumor record is created.
    RumorCreated,
    /// Emitted when a verification verdict is recorded.
    RumorVerified,
}

impl LedgerEventKind {
    /// Returns a stable event name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RumorCreated => "RumorCreated",
            Self::RumorVerified => "RumorVerified",
        }
    }
}
