//! Application services and ports.

#![forbid(unsafe_code)]

mod authorization_service;
mod authorizer;
mod chaincode;
mod invocation;
mod ledger_executor;
mod ledger_ports;
mod rumor_service;
mod transaction;

#[cfg(test)]
mod test_support;

pub use authorization_service::{AuthorizationFunction, AuthorizationService};
pub use authorizer::{Authorizer, ChaincodeAuthorizer};
pub use chaincode::{Chaincode, ServiceAddress, ServiceRouter};
pub use invocation::{Invocation, Payload, ServiceFunction, expect_arity};
pub use ledger_executor::{CommitReceipt, LedgerExecutor};
pub use ledger_ports::{LedgerEvent, LedgerStore, WriteSet};
pub use rumor_service::{RumorFunction, RumorService};
pub use transaction::TransactionContext;
