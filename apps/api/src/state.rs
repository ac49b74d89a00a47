use std::sync::Arc;

use veritrail_application::LedgerExecutor;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<LedgerExecutor>,
}
