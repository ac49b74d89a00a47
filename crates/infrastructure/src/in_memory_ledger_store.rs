use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use veritrail_application::{LedgerStore, WriteSet};
use veritrail_core::{AppResult, ChannelName};

/// In-memory world state, one ordered key space per channel.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    channels: RwLock<HashMap<ChannelName, BTreeMap<String, Vec<u8>>>>,
}

impl InMemoryLedgerStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn get_state(&self, channel: &ChannelName, key: &str) -> AppResult<Option<Vec<u8>>> {
        Ok(self
            .channels
            .read()
            .await
            .get(channel)
            .and_then(|state| state.get(key))
            .cloned())
    }

    async fn apply_write_set(&self, channel: &ChannelName, write_set: &WriteSet) -> AppResult<()> {
        let mut channels = self.channels.write().await;
        let state = channels.entry(channel.clone()).or_default();

        for (key, value) in write_set.iter() {
            state.insert(key.to_owned(), value.to_vec());
        }

        Ok(())
    }
}
