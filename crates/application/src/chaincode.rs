use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use veritrail_core::{AppError, AppResult, ChannelName, NonEmptyString};

use crate::{Invocation, Payload, TransactionContext};

/// A service installed on the ledger and invoked by function name.
#[async_trait]
pub trait Chaincode: Send + Sync {
    /// Runs the service's initialization transaction.
    async fn init(&self, context: &mut TransactionContext, args: &[String]) -> AppResult<Payload>;

    /// Dispatches one invocation inside a transaction.
    async fn invoke(
        &self,
        context: &mut TransactionContext,
        invocation: &Invocation,
    ) -> AppResult<Payload>;
}

/// Fixed logical target of a cross-service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAddress {
    service: String,
    channel: ChannelName,
}

impl ServiceAddress {
    /// Creates a validated service address.
    pub fn new(service: impl Into<String>, channel: ChannelName) -> AppResult<Self> {
        let service = NonEmptyString::new(service)
            .map_err(|_| AppError::Argument("service name must not be empty".to_owned()))?;

        Ok(Self {
            service: service.into(),
            channel,
        })
    }

    /// Returns the logical service name.
    #[must_use]
    pub fn service(&self) -> &str {
        self.service.as_str()
    }

    /// Returns the channel the service is reached on.
    #[must_use]
    pub fn channel(&self) -> &ChannelName {
        &self.channel
    }
}

/// Registry of installed services keyed by logical name.
///
/// Populated once while the node is composed and only read afterwards.
#[derive(Default)]
pub struct ServiceRouter {
    services: RwLock<HashMap<String, Arc<dyn Chaincode>>>,
}

impl ServiceRouter {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a service under a logical name.
    pub async fn register(&self, name: &str, service: Arc<dyn Chaincode>) -> AppResult<()> {
        let mut services = self.services.write().await;
        if services.contains_key(name) {
            return Err(AppError::Conflict(format!(
                "service '{name}' is already registered"
            )));
        }

        services.insert(name.to_owned(), service);
        Ok(())
    }

    /// Resolves a service by logical name.
    pub async fn resolve(&self, name: &str) -> AppResult<Arc<dyn Chaincode>> {
        self.services
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("service '{name}' is not registered")))
    }

    /// Returns registered service names in sorted order.
    pub async fn service_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.services.read().await.keys().cloned().collect();
        names.sort();
        names
    }
}
