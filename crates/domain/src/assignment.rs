use serde::{Deserialize, Serialize};
use veritrail_core::{AppError, AppResult};

/// Ordered role names currently held by one user.
///
/// Insertion order is preserved. Duplicates are rejected when a role is
/// assigned, and revoking the last role leaves an empty assignment behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRoleAssignment {
    #[serde(rename = "userId")]
    user_id: String,
    #[serde(default)]
    roles: Vec<String>,
}

impl UserRoleAssignment {
    /// Creates the first assignment for a user.
    #[must_use]
    pub fn first(user_id: impl Into<String>, role_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            roles: vec![role_name.into()],
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub fn user_id(&self) -> &str {
        self.user_id.as_str()
    }

    /// Returns held role names in assignment order.
    #[must_use]
    pub fn roles(&self) -> &[String] {
        self.roles.as_slice()
    }

    /// Returns whether the user holds the role.
    #[must_use]
    pub fn holds(&self, role_name: &str) -> bool {
        self.roles.iter().any(|role| role == role_name)
    }

    /// Appends a role, rejecting one the user already holds.
    pub fn assign(&mut self, role_name: &str) -> AppResult<()> {
        if self.holds(role_name) {
            return Err(AppError::Conflict(format!(
                "role '{role_name}' is already assigned to user '{}'",
                self.user_id
            )));
        }

        self.roles.push(role_name.to_owned());
        Ok(())
    }

    /// Removes a role, failing when the user does not hold it.
    pub fn revoke(&mut self, role_name: &str) -> AppResult<()> {
        if !self.holds(role_name) {
            return Err(AppError::RoleNotAssigned(format!(
                "role '{role_name}' is not assigned to user '{}'",
                self.user_id
            )));
        }

        self.roles.retain(|role| role != role_name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use veritrail_core::AppError;

    use super::UserRoleAssignment;

    #[test]
    fn assign_appends_in_order_and_rejects_duplicates() {
        let mut assignment = UserRoleAssignment::first("alice", "USER");
        assert!(assignment.assign("VERIFIER").is_ok());
        assert!(matches!(
            assignment.assign("USER"),
            Err(AppError::Conflict(_))
        ));
        assert_eq!(assignment.roles(), ["USER".to_owned(), "VERIFIER".to_owned()]);
    }

    #[test]
    fn revoke_can_leave_an_empty_assignment() {
        let mut assignment = UserRoleAssignment::first("alice", "USER");
        assert!(assignment.revoke("USER").is_ok());
        assert!(assignment.roles().is_empty());
        assert!(matches!(
            assignment.revoke("USER"),
            Err(AppError::RoleNotAssigned(_))
        ));
    }

    #[test]
    fn assignment_uses_stored_field_names() {
        let json = serde_json::to_string(&UserRoleAssignment::first("alice", "ADMIN"));
        assert_eq!(
            json.unwrap_or_default(),
            r#"{"userId":"alice","roles":["ADMIN"]}"#
        );
    }
}
