//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod assignment;
mod ledger_key;
mod role;
mod rumor;
mod security;

pub use assignment::UserRoleAssignment;
pub use ledger_key::{LedgerKey, RESERVED_KEY_PREFIXES, ROLE_KEY_PREFIX, USER_ROLE_KEY_PREFIX};
pub use role::{Role, parse_permission_list};
pub use rumor::{HistoryAction, HistoryRecord, RUMOR_CREATED_COMMENT, Rumor, RumorId};
pub use security::{LedgerEventKind, Permission, ReservedRole};
