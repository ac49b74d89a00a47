use async_trait::async_trait;
use veritrail_core::AppResult;
use veritrail_domain::{LedgerKey, Role, UserRoleAssignment};

use crate::{Authorizer, TransactionContext};

mod assignments;
mod dispatch;
mod permissions;
mod roles;

#[cfg(test)]
mod tests;

pub use dispatch::AuthorizationFunction;

/// Application service owning role definitions and user role assignments.
///
/// Holds no state of its own: every operation reads and writes through the
/// transaction context it is handed.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationService;

impl AuthorizationService {
    /// Creates the authorization service.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    async fn find_role(&self, context: &TransactionContext, name: &str) -> AppResult<Option<Role>> {
        context.get_json(&LedgerKey::role(name)).await
    }

    async fn find_assignment(
        &self,
        context: &TransactionContext,
        user_id: &str,
    ) -> AppResult<Option<UserRoleAssignment>> {
        context.get_json(&LedgerKey::user_role(user_id)).await
    }
}

#[async_trait]
impl Authorizer for AuthorizationService {
    async fn check_permission(
        &self,
        context: &TransactionContext,
        user_id: &str,
        permission: &str,
    ) -> AppResult<bool> {
        AuthorizationService::check_permission(self, context, user_id, permission).await
    }
}
