use tracing::info;
use veritrail_core::{AppError, AppResult};
use veritrail_domain::{LedgerKey, UserRoleAssignment};

use crate::{Payload, TransactionContext};

use super::AuthorizationService;

/// Payload returned for a user without an assignment record.
const NO_ROLES_PAYLOAD: &str = "[]";

impl AuthorizationService {
    /// Assigns an existing role to a user.
    pub async fn assign_role(
        &self,
        context: &mut TransactionContext,
        user_id: &str,
        role_name: &str,
    ) -> AppResult<UserRoleAssignment> {
        if context.get_state(&LedgerKey::role(role_name)).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "role '{role_name}' does not exist"
            )));
        }

        let assignment = match self.find_assignment(context, user_id).await? {
            None => UserRoleAssignment::first(user_id, role_name),
            Some(mut assignment) => {
                assignment.assign(role_name)?;
                assignment
            }
        };

        context.put_json(&LedgerKey::user_role(user_id), &assignment)?;

        info!(
            tx_id = %context.tx_id(),
            user_id,
            role = role_name,
            "role assigned"
        );
        Ok(assignment)
    }

    /// Revokes a role from a user, keeping the assignment record even when it
    /// becomes empty.
    pub async fn revoke_role(
        &self,
        context: &mut TransactionContext,
        user_id: &str,
        role_name: &str,
    ) -> AppResult<UserRoleAssignment> {
        let mut assignment = self
            .find_assignment(context, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' has no roles")))?;

        assignment.revoke(role_name)?;
        context.put_json(&LedgerKey::user_role(user_id), &assignment)?;

        info!(
            tx_id = %context.tx_id(),
            user_id,
            role = role_name,
            remaining = assignment.roles().len(),
            "role revoked"
        );
        Ok(assignment)
    }

    /// Returns a user's assignment, or `None` when the user never held a role.
    pub async fn get_user_roles(
        &self,
        context: &TransactionContext,
        user_id: &str,
    ) -> AppResult<Option<UserRoleAssignment>> {
        self.find_assignment(context, user_id).await
    }

    /// Returns the stored assignment bytes verbatim, or `[]` when absent.
    pub(super) async fn user_roles_payload(
        &self,
        context: &TransactionContext,
        user_id: &str,
    ) -> AppResult<Payload> {
        Ok(context
            .get_state(&LedgerKey::user_role(user_id))
            .await?
            .map(Payload::from_bytes)
            .unwrap_or_else(|| Payload::text(NO_ROLES_PAYLOAD)))
    }
}
