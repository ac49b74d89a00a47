use tracing::{info, warn};
use veritrail_core::{AppError, AppResult};
use veritrail_domain::{LedgerKey, ReservedRole, Role};

use crate::{Payload, TransactionContext};

use super::AuthorizationService;

impl AuthorizationService {
    /// Creates a role, overwriting any existing definition with that name.
    pub fn create_role(
        &self,
        context: &mut TransactionContext,
        name: &str,
        permissions: Vec<String>,
    ) -> AppResult<Role> {
        let role = Role::new(name, permissions);
        context.put_json(&LedgerKey::role(name), &role)?;

        info!(
            tx_id = %context.tx_id(),
            role = name,
            permissions = role.permissions().len(),
            "role definition written"
        );
        Ok(role)
    }

    /// Replaces the permission list of an existing role.
    pub async fn update_role(
        &self,
        context: &mut TransactionContext,
        name: &str,
        permissions: Vec<String>,
    ) -> AppResult<Role> {
        let mut role = self
            .find_role(context, name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{name}' does not exist")))?;

        role.replace_permissions(permissions);
        context.put_json(&LedgerKey::role(name), &role)?;

        info!(
            tx_id = %context.tx_id(),
            role = name,
            permissions = role.permissions().len(),
            "role permissions replaced"
        );
        Ok(role)
    }

    /// Returns a stored role definition.
    pub async fn get_role_permissions(
        &self,
        context: &TransactionContext,
        name: &str,
    ) -> AppResult<Role> {
        self.find_role(context, name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{name}' does not exist")))
    }

    /// Returns the stored role bytes verbatim.
    pub(super) async fn role_payload(
        &self,
        context: &TransactionContext,
        name: &str,
    ) -> AppResult<Payload> {
        context
            .get_state(&LedgerKey::role(name))
            .await?
            .map(Payload::from_bytes)
            .ok_or_else(|| AppError::NotFound(format!("role '{name}' does not exist")))
    }

    /// Resets `ADMIN`, `VERIFIER` and `USER` to their seed permissions.
    ///
    /// Destructive: customizations of those three roles are overwritten.
    pub fn reset_reserved_roles(&self, context: &mut TransactionContext) -> AppResult<Vec<Role>> {
        let roles: Vec<Role> = ReservedRole::all()
            .iter()
            .map(|reserved| Role::reserved(*reserved))
            .collect();

        for role in &roles {
            context.put_json(&LedgerKey::role(role.name()), role)?;
        }

        warn!(
            tx_id = %context.tx_id(),
            roles = ?ReservedRole::all().iter().map(ReservedRole::name).collect::<Vec<_>>(),
            "reserved roles reset to default permissions"
        );
        Ok(roles)
    }
}
