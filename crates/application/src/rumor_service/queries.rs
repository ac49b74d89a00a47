use veritrail_core::AppResult;
use veritrail_domain::{HistoryRecord, Permission, Rumor, RumorId};

use crate::TransactionContext;

use super::RumorService;

impl RumorService {
    /// Returns the full current record, history included.
    pub async fn get_rumor(
        &self,
        context: &TransactionContext,
        id: &str,
        requester_id: &str,
    ) -> AppResult<Rumor> {
        let id = RumorId::new(id)?;
        self.require_permission(context, requester_id, Permission::ViewRumor)
            .await?;
        self.require_rumor(context, &id).await
    }

    /// Returns the history entries in append order.
    pub async fn get_rumor_history(
        &self,
        context: &TransactionContext,
        id: &str,
        requester_id: &str,
    ) -> AppResult<Vec<HistoryRecord>> {
        let id = RumorId::new(id)?;
        self.require_permission(context, requester_id, Permission::ViewRumor)
            .await?;
        Ok(self.require_rumor(context, &id).await?.history().to_vec())
    }
}
