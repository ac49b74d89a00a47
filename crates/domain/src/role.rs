use serde::{Deserialize, Serialize};
use veritrail_core::{AppError, AppResult};

use crate::ReservedRole;

/// Named bundle of permission names.
///
/// Permissions keep their given order and are not deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    name: String,
    #[serde(default)]
    permissions: Vec<String>,
}

impl Role {
    /// Creates a role from a name and an ordered permission list.
    #[must_use]
    pub fn new(name: impl Into<String>, permissions: Vec<String>) -> Self {
        Self {
            name: name.into(),
            permissions,
        }
    }

    /// Builds the seed definition of a reserved role.
    #[must_use]
    pub fn reserved(role: ReservedRole) -> Self {
        Self::new(
            role.name(),
            role.default_permissions()
                .iter()
                .map(|permission| permission.as_str().to_owned())
                .collect(),
        )
    }

    /// Returns the role name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the permissions in stored order.
    #[must_use]
    pub fn permissions(&self) -> &[String] {
        self.permissions.as_slice()
    }

    /// Replaces the whole permission list.
    pub fn replace_permissions(&mut self, permissions: Vec<String>) {
        self.permissions = permissions;
    }

    /// Returns whether the role lists the given permission name.
    #[must_use]
    pub fn grants(&self, permission: &str) -> bool {
        self.permissions.iter().any(|value| value == permission)
    }
}

/// Parses the JSON array of permission names taken by `createRole` and
/// `updateRole`.
pub fn parse_permission_list(raw: &str) -> AppResult<Vec<String>> {
    serde_json::from_str::<Vec<String>>(raw).map_err(|error| {
        AppError::Argument(format!(
            "permissions must be a JSON array of strings: {error}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{Role, parse_permission_list};
    use crate::ReservedRole;

    #[test]
    fn parse_permission_list_keeps_order_and_duplicates() {
        let parsed = parse_permission_list(r#"["B","A","B"]"#);
        assert_eq!(
            parsed.unwrap_or_default(),
            vec!["B".to_owned(), "A".to_owned(), "B".to_owned()]
        );
    }

    #[test]
    fn parse_permission_list_rejects_non_string_arrays() {
        assert!(parse_permission_list("[1, 2]").is_err());
        assert!(parse_permission_list(r#"{"a":"b"}"#).is_err());
        assert!(parse_permission_list("CREATE_RUMOR").is_err());
    }

    #[test]
    fn role_serializes_with_stored_field_names() {
        let json = serde_json::to_string(&Role::reserved(ReservedRole::Verifier));
        assert_eq!(
            json.unwrap_or_default(),
            r#"{"name":"VERIFIER","permissions":["VERIFY_RUMOR","VIEW_RUMOR"]}"#
        );
    }

    proptest! {
        #[test]
        fn role_grants_exactly_its_permissions(
            permissions in proptest::collection::vec("[A-Z_]{1,12}", 0..8),
            probe in "[A-Z_]{1,12}",
        ) {
            let role = Role::new("CUSTOM", permissions.clone());
            prop_assert_eq!(role.grants(probe.as_str()), permissions.contains(&probe));
            for permission in &permissions {
                prop_assert!(role.grants(permission.as_str()));
            }
        }
    }
}
