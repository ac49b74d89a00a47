use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};
use veritrail_core::{AppResult, ChannelName, TransactionHeader, TxId};

use crate::{Invocation, LedgerEvent, LedgerStore, Payload, ServiceRouter, TransactionContext};

/// Outcome of a committed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReceipt {
    /// Transaction identifier from the header.
    pub tx_id: TxId,
    /// Success payload returned by the invoked service.
    pub payload: Payload,
    /// Digest of the applied write set.
    pub state_digest: String,
    /// Number of keys written.
    pub writes: usize,
    /// Event set by the transaction, if any.
    pub event: Option<LedgerEvent>,
}

#[derive(Clone, Copy)]
enum Call<'a> {
    Init(&'a [String]),
    Invoke(&'a Invocation),
}

/// Applies transactions to one channel, one at a time.
///
/// A transaction's writes reach the store only when the invoked service
/// returns successfully; any error discards them.
pub struct LedgerExecutor {
    store: Arc<dyn LedgerStore>,
    router: Arc<ServiceRouter>,
    channel: ChannelName,
    commit_lock: Mutex<()>,
}

impl LedgerExecutor {
    /// Creates an executor for a channel.
    #[must_use]
    pub fn new(store: Arc<dyn LedgerStore>, router: Arc<ServiceRouter>, channel: ChannelName) -> Self {
        Self {
            store,
            router,
            channel,
            commit_lock: Mutex::new(()),
        }
    }

    /// Returns the channel this executor applies transactions to.
    #[must_use]
    pub fn channel(&self) -> &ChannelName {
        &self.channel
    }

    /// Runs a service's initialization transaction.
    pub async fn init(
        &self,
        service: &str,
        args: &[String],
        header: TransactionHeader,
    ) -> AppResult<CommitReceipt> {
        self.execute(service, Call::Init(args), header).await
    }

    /// Runs one invocation as an atomic transaction.
    pub async fn submit(
        &self,
        service: &str,
        invocation: &Invocation,
        header: TransactionHeader,
    ) -> AppResult<CommitReceipt> {
        self.execute(service, Call::Invoke(invocation), header).await
    }

    async fn execute(
        &self,
        service_name: &str,
        call: Call<'_>,
        header: TransactionHeader,
    ) -> AppResult<CommitReceipt> {
        let service = self.router.resolve(service_name).await?;
        let function = match &call {
            Call::Init(_) => "init",
            Call::Invoke(invocation) => invocation.function(),
        };

        let _guard = self.commit_lock.lock().await;
        let tx_id = header.tx_id().clone();
        let mut context = TransactionContext::new(Arc::clone(&self.store), self.channel.clone(), header);

        let outcome = match call {
            Call::Init(args) => service.init(&mut context, args).await,
            Call::Invoke(invocation) => service.invoke(&mut context, invocation).await,
        };

        let payload = match outcome {
            Ok(payload) => payload,
            Err(error) if error.is_not_found() => {
                info!(
                    tx_id = %tx_id,
                    channel = %self.channel,
                    service = service_name,
                    function,
                    error = %error,
                    "transaction aborted on missing record"
                );
                return Err(error);
            }
            Err(error) => {
                warn!(
                    tx_id = %tx_id,
                    channel = %self.channel,
                    service = service_name,
                    function,
                    error = %error,
                    "transaction aborted"
                );
                return Err(error);
            }
        };

        let (write_set, event) = context.into_effects();
        let state_digest = write_set.digest();
        if !write_set.is_empty() {
            self.store
                .apply_write_set(&self.channel, &write_set)
                .await
                .inspect_err(|error| {
                    warn!(
                        tx_id = %tx_id,
                        channel = %self.channel,
                        error = %error,
                        "failed to apply write set"
                    );
                })?;
        }

        info!(
            tx_id = %tx_id,
            channel = %self.channel,
            service = service_name,
            function,
            writes = write_set.len(),
            state_digest = %state_digest,
            "transaction committed"
        );

        Ok(CommitReceipt {
            tx_id,
            payload,
            state_digest,
            writes: write_set.len(),
            event,
        })
    }
}
