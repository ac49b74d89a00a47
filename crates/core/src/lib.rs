//! Shared primitives for all Rust crates in Veritrail.

#![forbid(unsafe_code)]

/// Transaction header primitives supplied by the ordering layer.
pub mod transaction;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use transaction::{TransactionHeader, TxId, TxTimestamp};

/// Result type used across Veritrail crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Argument(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Logical channel name used as the partition key for every ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChannelName(String);

impl ChannelName {
    /// Creates a validated channel name.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = NonEmptyString::new(value)
            .map_err(|_| AppError::Argument("channel name must not be empty".to_owned()))?;
        Ok(Self(value.into()))
    }

    /// Returns the channel name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for ChannelName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Common application error categories.
///
/// Every variant aborts the enclosing transaction; the ledger never applies
/// a partial write set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Wrong arity or malformed argument payload.
    #[error("argument error: {0}")]
    Argument(String),

    /// Role, record or assignment is absent where it is required to exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Revoked role is not present in the user's assignment.
    #[error("role not assigned: {0}")]
    RoleNotAssigned(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Caller lacks the permission the operation requires.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Underlying ledger read or write failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Dispatch target is not a known function.
    #[error("invalid function: {0}")]
    InvalidFunction(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns whether the error belongs to the not-found class.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::RoleNotAssigned(_))
    }
}
