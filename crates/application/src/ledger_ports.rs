use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;
use sha2::{Digest, Sha256};
use veritrail_core::{AppResult, ChannelName};
use veritrail_domain::LedgerEventKind;

/// Repository port for the replicated key-value ledger.
///
/// Implementations are the persistence half of the replication layer: reads
/// return committed state only and a write set is applied all-or-nothing.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Reads the committed value stored under a key.
    async fn get_state(&self, channel: &ChannelName, key: &str) -> AppResult<Option<Vec<u8>>>;

    /// Atomically applies every write of one transaction.
    async fn apply_write_set(&self, channel: &ChannelName, write_set: &WriteSet) -> AppResult<()>;
}

/// Pending writes of one transaction, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSet {
    entries: BTreeMap<String, Vec<u8>>,
}

impl WriteSet {
    /// Creates an empty write set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a write; a later write to the same key replaces the earlier one.
    pub fn insert(&mut self, key: String, value: Vec<u8>) {
        self.entries.insert(key, value);
    }

    /// Returns the pending value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Returns the number of distinct keys written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether nothing was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates writes in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_slice()))
    }

    /// Returns the hex SHA-256 digest replicas compare after executing the
    /// same transaction.
    ///
    /// Keys and values are length-prefixed so distinct write sets never hash
    /// the same concatenation.
    #[must_use]
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for (key, value) in &self.entries {
            hasher.update((key.len() as u64).to_be_bytes());
            hasher.update(key.as_bytes());
            hasher.update((value.len() as u64).to_be_bytes());
            hasher.update(value);
        }

        hex::encode(hasher.finalize())
    }
}

/// Event attached to a committed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEvent {
    /// Event name.
    pub kind: LedgerEventKind,
    /// Event payload, the affected record id for rumor events.
    pub payload: String,
}

#[cfg(test)]
mod tests {
    use super::WriteSet;

    #[test]
    fn digest_is_independent_of_insertion_order() {
        let mut first = WriteSet::new();
        first.insert("b".to_owned(), b"2".to_vec());
        first.insert("a".to_owned(), b"1".to_vec());

        let mut second = WriteSet::new();
        second.insert("a".to_owned(), b"1".to_vec());
        second.insert("b".to_owned(), b"2".to_vec());

        assert_eq!(first.digest(), second.digest());
        assert_eq!(first.digest().len(), 64);
    }

    #[test]
    fn digest_separates_key_and_value_boundaries() {
        let mut first = WriteSet::new();
        first.insert("ab".to_owned(), b"c".to_vec());

        let mut second = WriteSet::new();
        second.insert("a".to_owned(), b"bc".to_vec());

        assert_ne!(first.digest(), second.digest());
    }

    #[test]
    fn later_write_to_same_key_wins() {
        let mut write_set = WriteSet::new();
        write_set.insert("k".to_owned(), b"old".to_vec());
        write_set.insert("k".to_owned(), b"new".to_vec());

        assert_eq!(write_set.len(), 1);
        assert_eq!(write_set.get("k"), Some(b"new".as_slice()));
    }
}
