use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use veritrail_core::{
    AppError, AppResult, ChannelName, TransactionHeader, TxId, TxTimestamp,
};

use crate::{LedgerStore, TransactionContext, WriteSet};

pub const TEST_CHANNEL: &str = "rumor-channel";

/// Ledger store fake with injectable read and write failures.
#[derive(Default)]
pub struct FakeLedgerStore {
    state: Mutex<BTreeMap<(String, String), Vec<u8>>>,
    failing_reads: Mutex<HashSet<String>>,
    fail_writes: Mutex<bool>,
}

impl FakeLedgerStore {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn insert_raw(&self, key: &str, value: Vec<u8>) {
        self.state
            .lock()
            .await
            .insert((TEST_CHANNEL.to_owned(), key.to_owned()), value);
    }

    pub async fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.state
            .lock()
            .await
            .get(&(TEST_CHANNEL.to_owned(), key.to_owned()))
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.len()
    }

    pub async fn fail_reads_of(&self, key: &str) {
        self.failing_reads.lock().await.insert(key.to_owned());
    }

    pub async fn fail_writes(&self) {
        *self.fail_writes.lock().await = true;
    }
}

#[async_trait]
impl LedgerStore for FakeLedgerStore {
    async fn get_state(&self, channel: &ChannelName, key: &str) -> AppResult<Option<Vec<u8>>> {
        if self.failing_reads.lock().await.contains(key) {
            return Err(AppError::Storage(format!("injected read failure for '{key}'")));
        }

        Ok(self
            .state
            .lock()
            .await
            .get(&(channel.as_str().to_owned(), key.to_owned()))
            .cloned())
    }

    async fn apply_write_set(&self, channel: &ChannelName, write_set: &WriteSet) -> AppResult<()> {
        if *self.fail_writes.lock().await {
            return Err(AppError::Storage("injected write failure".to_owned()));
        }

        let mut state = self.state.lock().await;
        for (key, value) in write_set.iter() {
            state.insert((channel.as_str().to_owned(), key.to_owned()), value.to_vec());
        }

        Ok(())
    }
}

pub fn channel() -> ChannelName {
    match ChannelName::new(TEST_CHANNEL) {
        Ok(channel) => channel,
        Err(error) => panic!("invalid test channel: {error}"),
    }
}

pub fn header(seconds: i64) -> TransactionHeader {
    match TxTimestamp::from_unix(seconds, 0) {
        Ok(timestamp) => TransactionHeader::new(TxId::from_raw(format!("tx-{seconds}")), timestamp),
        Err(error) => panic!("invalid test timestamp: {error}"),
    }
}

pub fn context_on(store: &Arc<FakeLedgerStore>, seconds: i64) -> TransactionContext {
    let store: Arc<dyn LedgerStore> = store.clone();
    TransactionContext::new(store, channel(), header(seconds))
}

/// Applies a context's writes the way the executor does on success.
pub async fn commit(store: &Arc<FakeLedgerStore>, context: TransactionContext) -> AppResult<()> {
    let (write_set, _) = context.into_effects();
    store.apply_write_set(&channel(), &write_set).await
}
