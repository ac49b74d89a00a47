use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use veritrail_core::{AppError, AppResult, TxId, TxTimestamp};

use crate::RESERVED_KEY_PREFIXES;

/// Comment written on the mandatory creation history entry.
pub const RUMOR_CREATED_COMMENT: &str = "Rumor created";

/// Caller-supplied record identifier, validated against reserved prefixes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RumorId(String);

impl RumorId {
    /// Creates a validated rumor id.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Argument("rumor id must not be empty".to_owned()));
        }

        if let Some(prefix) = RESERVED_KEY_PREFIXES
            .iter()
            .find(|prefix| value.starts_with(**prefix))
        {
            return Err(AppError::Argument(format!(
                "rumor id '{value}' collides with reserved key prefix '{prefix}'"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for RumorId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RumorId> for String {
    fn from(value: RumorId) -> Self {
        value.0
    }
}

impl Display for RumorId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Kind of lifecycle step recorded in a rumor's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryAction {
    /// The record was created.
    Create,
    /// A verification verdict was recorded.
    Verify,
}

/// Immutable audit trail entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    /// Canonical timestamp of the transaction that appended the entry.
    pub timestamp: String,
    /// Lifecycle step.
    pub action: HistoryAction,
    /// User that performed the step.
    pub operator: String,
    /// Free-text comment.
    pub comment: String,
    /// Transaction that appended the entry.
    #[serde(default)]
    pub transaction_id: String,
}

impl HistoryRecord {
    fn new(
        action: HistoryAction,
        operator: &str,
        comment: &str,
        tx_id: &TxId,
        timestamp: TxTimestamp,
    ) -> Self {
        Self {
            timestamp: timestamp.to_ledger_string(),
            action,
            operator: operator.to_owned(),
            comment: comment.to_owned(),
            transaction_id: tx_id.as_str().to_owned(),
        }
    }
}

/// Governed record with its current verification view and audit trail.
///
/// The verification fields are a projection overwritten on every verdict;
/// `history` is the append-only source of truth and always starts with the
/// creation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rumor {
    id: RumorId,
    content: String,
    creator: String,
    create_time: String,
    is_verified: bool,
    #[serde(default)]
    verifier: String,
    #[serde(default)]
    verify_time: String,
    #[serde(default)]
    verification_comment: String,
    history: Vec<HistoryRecord>,
}

impl Rumor {
    /// Creates an unverified rumor with its mandatory creation entry.
    #[must_use]
    pub fn create(
        id: RumorId,
        content: impl Into<String>,
        creator: impl Into<String>,
        tx_id: &TxId,
        timestamp: TxTimestamp,
    ) -> Self {
        let creator = creator.into();
        let creation = HistoryRecord::new(
            HistoryAction::Create,
            creator.as_str(),
            RUMOR_CREATED_COMMENT,
            tx_id,
            timestamp,
        );

        Self {
            id,
            content: content.into(),
            creator,
            create_time: timestamp.to_ledger_string(),
            is_verified: false,
            verifier: String::new(),
            verify_time: String::new(),
            verification_comment: String::new(),
            history: vec![creation],
        }
    }

    /// Records a verdict: overwrites the current view and appends history.
    pub fn record_verification(
        &mut self,
        verifier: &str,
        is_verified: bool,
        comment: &str,
        tx_id: &TxId,
        timestamp: TxTimestamp,
    ) {
        self.is_verified = is_verified;
        self.verifier = verifier.to_owned();
        self.verify_time = timestamp.to_ledger_string();
        self.verification_comment = comment.to_owned();
        self.history.push(HistoryRecord::new(
            HistoryAction::Verify,
            verifier,
            comment,
            tx_id,
            timestamp,
        ));
    }

    /// Returns the record id.
    #[must_use]
    pub fn id(&self) -> &RumorId {
        &self.id
    }

    /// Returns the reported content.
    #[must_use]
    pub fn content(&self) -> &str {
        self.content.as_str()
    }

    /// Returns the creating user.
    #[must_use]
    pub fn creator(&self) -> &str {
        self.creator.as_str()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn create_time(&self) -> &str {
        self.create_time.as_str()
    }

    /// Returns the latest verdict.
    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.is_verified
    }

    /// Returns the latest verifier, empty before the first verdict.
    #[must_use]
    pub fn verifier(&self) -> &str {
        self.verifier.as_str()
    }

    /// Returns the latest verification timestamp.
    #[must_use]
    pub fn verify_time(&self) -> &str {
        self.verify_time.as_str()
    }

    /// Returns the latest verification comment.
    #[must_use]
    pub fn verification_comment(&self) -> &str {
        self.verification_comment.as_str()
    }

    /// Returns the history in append order.
    #[must_use]
    pub fn history(&self) -> &[HistoryRecord] {
        self.history.as_slice()
    }
}
