use std::sync::Arc;

use tracing::warn;
use veritrail_core::{AppError, AppResult};
use veritrail_domain::{LedgerKey, Permission, Rumor, RumorId};

use crate::{Authorizer, TransactionContext};

mod dispatch;
mod lifecycle;
mod queries;


pub use dispatch::RumorFunction;

/// Application service for the rumor record lifecycle.
///
/// Every operation consults the injected authorizer inside the same
/// transaction before touching its own keys.
#[derive(Clone)]
pub struct RumorService {
    authorizer: Arc<dyn Authorizer>,
}

impl RumorService {
    /// Creates a rumor service guarded by an authorizer.
    #[must_use]
    pub fn new(authorizer: Arc<dyn Authorizer>) -> Self {
        Self { authorizer }
    }

    /// Ensures the user holds the permission, failing closed.
    ///
    /// A negative answer and a failed check are both reported as
    /// `PermissionDenied`.
    async fn require_permission(
        &self,
        context: &TransactionContext,
        user_id: &str,
        permission: Permission,
    ) -> AppResult<()> {
        match self
            .authorizer
            .check_permission(context, user_id, permission.as_str())
            .await
        {
            Ok(true) => Ok(()),
            Ok(false) => {
                warn!(
                    tx_id = %context.tx_id(),
                    user_id,
                    permission = permission.as_str(),
                    "permission denied"
                );
                Err(AppError::PermissionDenied(format!(
                    "user '{user_id}' is missing permission '{}'",
                    permission.as_str()
                )))
            }
            Err(error) => {
                warn!(
                    tx_id = %context.tx_id(),
                    user_id,
                    permission = permission.as_str(),
                    error = %error,
                    "permission check failed, denying"
                );
                Err(AppError::PermissionDenied(format!(
                    "permission check for user '{user_id}' failed: {error}"
                )))
            }
        }
    }

    async fn find_rumor(&self, context: &TransactionContext, id: &RumorId) -> AppResult<Option<Rumor>> {
        context.get_json(&LedgerKey::rumor(id)).await
    }

    async fn require_rumor(&self, context: &TransactionContext, id: &RumorId) -> AppResult<Rumor> {
        self.find_rumor(context, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("rumor '{id}' does not exist")))
    }
}
