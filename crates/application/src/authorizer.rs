use std::sync::Weak;

use async_trait::async_trait;
use veritrail_core::{AppError, AppResult};

use crate::{Invocation, ServiceAddress, ServiceRouter, TransactionContext};

/// Capability to answer permission queries inside a transaction.
///
/// Receives the context by shared reference, so an implementation cannot
/// buffer writes into the caller's transaction.
#[async_trait]
pub trait Authorizer: Send + Sync {
    /// Returns whether the user currently holds the permission.
    async fn check_permission(
        &self,
        context: &TransactionContext,
        user_id: &str,
        permission: &str,
    ) -> AppResult<bool>;
}

/// Authorizer that issues a nested `checkPermission` invocation to another
/// installed service.
///
/// The nested call runs on a read-only fork of the caller's context, so it
/// sees the same snapshot and header and cannot commit state of its own.
pub struct ChaincodeAuthorizer {
    router: Weak<ServiceRouter>,
    target: ServiceAddress,
}

impl ChaincodeAuthorizer {
    /// Function name invoked on the target service.
    pub const CHECK_PERMISSION: &'static str = "checkPermission";

    /// Creates an authorizer targeting a service through the router.
    #[must_use]
    pub fn new(router: Weak<ServiceRouter>, target: ServiceAddress) -> Self {
        Self { router, target }
    }
}

#[async_trait]
impl Authorizer for ChaincodeAuthorizer {
    async fn check_permission(
        &self,
        context: &TransactionContext,
        user_id: &str,
        permission: &str,
    ) -> AppResult<bool> {
        let router = self
            .router
            .upgrade()
            .ok_or_else(|| AppError::Internal("service router is no longer available".to_owned()))?;
        let service = router.resolve(self.target.service()).await?;

        let mut nested = context.fork_read_only(self.target.channel().clone());
        let invocation = Invocation::new(
            Self::CHECK_PERMISSION,
            vec![user_id.to_owned(), permission.to_owned()],
        );
        let payload = service.invoke(&mut nested, &invocation).await?;

        if nested.has_pending_writes() {
            return Err(AppError::Internal(format!(
                "nested invocation of '{}' attempted to write state",
                self.target.service()
            )));
        }

        match payload.as_bytes() {
            b"true" => Ok(true),
            b"false" => Ok(false),
            _ => Err(AppError::Internal(format!(
                "unexpected checkPermission payload '{}'",
                payload.to_text()
            ))),
        }
    }
}
