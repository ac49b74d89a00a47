use std::fmt::{Display, Formatter};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppError, AppResult};

/// Identifier assigned to one transaction by the ordering layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxId(String);

impl TxId {
    /// Creates a random transaction identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps an identifier issued elsewhere.
    #[must_use]
    pub fn from_raw(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for TxId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for TxId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Canonical transaction timestamp.
///
/// Every replica executing the same transaction observes the same value, so
/// services must read time only from here and never from the wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TxTimestamp(DateTime<Utc>);

impl TxTimestamp {
    /// Wraps a timestamp chosen by the ordering layer.
    #[must_use]
    pub fn from_datetime(value: DateTime<Utc>) -> Self {
        Self(value)
    }

    /// Builds a timestamp from seconds and nanoseconds since the Unix epoch.
    pub fn from_unix(seconds: i64, nanos: u32) -> AppResult<Self> {
        DateTime::from_timestamp(seconds, nanos)
            .map(Self)
            .ok_or_else(|| {
                AppError::Argument(format!(
                    "transaction timestamp {seconds}.{nanos:09} is out of range"
                ))
            })
    }

    /// Returns the stable RFC3339 rendering stored in ledger values.
    #[must_use]
    pub fn to_ledger_string(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Nanos, true)
    }
}

impl Display for TxTimestamp {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.to_ledger_string())
    }
}

/// Header shared by a transaction and every nested invocation inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHeader {
    tx_id: TxId,
    timestamp: TxTimestamp,
}

impl TransactionHeader {
    /// Creates a header from the ordering layer's identifier and timestamp.
    #[must_use]
    pub fn new(tx_id: TxId, timestamp: TxTimestamp) -> Self {
        Self { tx_id, timestamp }
    }

    /// Returns the transaction identifier.
    #[must_use]
    pub fn tx_id(&self) -> &TxId {
        &self.tx_id
    }

    /// Returns the canonical transaction timestamp.
    #[must_use]
    pub fn timestamp(&self) -> TxTimestamp {
        self.timestamp
    }
}
