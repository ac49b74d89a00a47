use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use veritrail_core::{AppError, AppResult, ChannelName, TransactionHeader, TxId, TxTimestamp};
use veritrail_domain::{LedgerEventKind, LedgerKey};

use crate::{LedgerEvent, LedgerStore, WriteSet};

/// Execution context of one ledger transaction.
///
/// Reads go to the committed snapshot and never observe this transaction's
/// own pending writes. Writing requires `&mut`, so code handed a shared
/// reference is read-only by construction.
pub struct TransactionContext {
    store: Arc<dyn LedgerStore>,
    channel: ChannelName,
    header: TransactionHeader,
    write_set: WriteSet,
    event: Option<LedgerEvent>,
}

impl TransactionContext {
    /// Opens a context over a store for one transaction.
    #[must_use]
    pub fn new(store: Arc<dyn LedgerStore>, channel: ChannelName, header: TransactionHeader) -> Self {
        Self {
            store,
            channel,
            header,
            write_set: WriteSet::new(),
            event: None,
        }
    }

    /// Returns the channel the transaction executes on.
    #[must_use]
    pub fn channel(&self) -> &ChannelName {
        &self.channel
    }

    /// Returns the transaction identifier.
    #[must_use]
    pub fn tx_id(&self) -> &TxId {
        self.header.tx_id()
    }

    /// Returns the canonical transaction timestamp.
    #[must_use]
    pub fn timestamp(&self) -> TxTimestamp {
        self.header.timestamp()
    }

    /// Reads the committed bytes stored under a key.
    pub async fn get_state(&self, key: &LedgerKey) -> AppResult<Option<Vec<u8>>> {
        self.store
            .get_state(&self.channel, key.render().as_str())
            .await
    }

    /// Reads and decodes a JSON value stored under a key.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &LedgerKey) -> AppResult<Option<T>> {
        let Some(bytes) = self.get_state(key).await? else {
            return Ok(None);
        };

        serde_json::from_slice(bytes.as_slice())
            .map(Some)
            .map_err(|error| AppError::Storage(format!("failed to decode '{key}': {error}")))
    }

    /// Buffers a write; it becomes visible only after the transaction commits.
    pub fn put_state(&mut self, key: &LedgerKey, value: Vec<u8>) {
        self.write_set.insert(key.render(), value);
    }

    /// Encodes a value as JSON and buffers the write.
    pub fn put_json<T: Serialize>(&mut self, key: &LedgerKey, value: &T) -> AppResult<()> {
        let bytes = serde_json::to_vec(value)
            .map_err(|error| AppError::Internal(format!("failed to encode '{key}': {error}")))?;
        self.put_state(key, bytes);
        Ok(())
    }

    /// Attaches the transaction's event, replacing any earlier one.
    pub fn set_event(&mut self, kind: LedgerEventKind, payload: impl Into<String>) {
        self.event = Some(LedgerEvent {
            kind,
            payload: payload.into(),
        });
    }

    /// Returns whether the transaction has buffered writes.
    #[must_use]
    pub fn has_pending_writes(&self) -> bool {
        !self.write_set.is_empty()
    }

    /// Builds the context of a nested invocation on the same snapshot.
    ///
    /// The fork shares the header and store but starts with an empty write
    /// set that is never committed.
    #[must_use]
    pub fn fork_read_only(&self, channel: ChannelName) -> Self {
        Self {
            store: Arc::clone(&self.store),
            channel,
            header: self.header.clone(),
            write_set: WriteSet::new(),
            event: None,
        }
    }

    /// Consumes the context into its pending writes and event.
    #[must_use]
    pub fn into_effects(self) -> (WriteSet, Option<LedgerEvent>) {
        (self.write_set, self.event)
    }
}
