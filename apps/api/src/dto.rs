use serde::{Deserialize, Serialize};
use veritrail_application::{CommitReceipt, LedgerEvent};

/// Health response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Incoming service invocation.
#[derive(Debug, Deserialize)]
pub struct InvokeServiceRequest {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Incoming service initialization.
#[derive(Debug, Default, Deserialize)]
pub struct InitServiceRequest {
    #[serde(default)]
    pub args: Vec<String>,
}

/// Event attached to a committed transaction.
#[derive(Debug, Serialize)]
pub struct LedgerEventResponse {
    pub name: &'static str,
    pub payload: String,
}

impl From<LedgerEvent> for LedgerEventResponse {
    fn from(value: LedgerEvent) -> Self {
        Self {
            name: value.kind.as_str(),
            payload: value.payload,
        }
    }
}

/// API representation of a committed transaction.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitReceiptResponse {
    pub tx_id: String,
    pub payload: String,
    pub state_digest: String,
    pub writes: usize,
    pub event: Option<LedgerEventResponse>,
}

impl From<CommitReceipt> for CommitReceiptResponse {
    fn from(value: CommitReceipt) -> Self {
        Self {
            tx_id: value.tx_id.as_str().to_owned(),
            payload: value.payload.to_text(),
            state_digest: value.state_digest,
            writes: value.writes,
            event: value.event.map(LedgerEventResponse::from),
        }
    }
}
