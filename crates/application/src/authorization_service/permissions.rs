use tracing::{debug, warn};
use veritrail_core::AppResult;

use crate::TransactionContext;

use super::AuthorizationService;

impl AuthorizationService {
    /// Returns whether any of the user's roles lists the permission.
    ///
    /// Roles are scanned in assignment order and the first match wins. A role
    /// that cannot be read or decoded is skipped, so it never masks a grant
    /// from another role; if every lookup fails the answer is `false`. Failing
    /// to read the assignment itself is still an error.
    pub async fn check_permission(
        &self,
        context: &TransactionContext,
        user_id: &str,
        permission: &str,
    ) -> AppResult<bool> {
        let Some(assignment) = self.find_assignment(context, user_id).await? else {
            debug!(user_id, permission, "user has no role assignment");
            return Ok(false);
        };

        for role_name in assignment.roles() {
            let role = match self.find_role(context, role_name).await {
                Ok(Some(role)) => role,
                Ok(None) => {
                    warn!(user_id, role = %role_name, "assigned role does not exist, skipping");
                    continue;
                }
                Err(error) => {
                    warn!(
                        user_id,
                        role = %role_name,
                        error = %error,
                        "failed to load assigned role, skipping"
                    );
                    continue;
                }
            };

            if role.grants(permission) {
                debug!(user_id, permission, role = %role_name, "permission granted");
                return Ok(true);
            }
        }

        Ok(false)
    }
}
