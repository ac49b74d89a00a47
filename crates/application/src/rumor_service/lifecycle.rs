use tracing::info;
use veritrail_core::{AppError, AppResult};
use veritrail_domain::{LedgerEventKind, LedgerKey, Permission, Rumor, RumorId};

use crate::TransactionContext;

use super::RumorService;

impl RumorService {
    /// Creates a new unverified rumor owned by `creator`.
    pub async fn create_rumor(
        &self,
        context: &mut TransactionContext,
        id: &str,
        content: &str,
        creator: &str,
    ) -> AppResult<Rumor> {
        let id = RumorId::new(id)?;
        self.require_permission(context, creator, Permission::CreateRumor)
            .await?;

        let key = LedgerKey::rumor(&id);
        if context.get_state(&key).await?.is_some() {
            return Err(AppError::Conflict(format!("rumor '{id}' already exists")));
        }

        let rumor = Rumor::create(id, content, creator, context.tx_id(), context.timestamp());
        context.put_json(&key, &rumor)?;
        context.set_event(LedgerEventKind::RumorCreated, rumor.id().as_str());

        info!(
            tx_id = %context.tx_id(),
            rumor_id = %rumor.id(),
            creator,
            "rumor created"
        );
        Ok(rumor)
    }

    /// Records a verification verdict.
    ///
    /// Overwrites the current verification fields and appends a `VERIFY`
    /// history entry. Verdicts can flip freely; there is no terminal state.
    pub async fn verify_rumor(
        &self,
        context: &mut TransactionContext,
        id: &str,
        verifier: &str,
        is_verified: bool,
        comment: &str,
    ) -> AppResult<Rumor> {
        let id = RumorId::new(id)?;
        self.require_permission(context, verifier, Permission::VerifyRumor)
            .await?;

        let mut rumor = self.require_rumor(context, &id).await?;
        rumor.record_verification(
            verifier,
            is_verified,
            comment,
            context.tx_id(),
            context.timestamp(),
        );
        context.put_json(&LedgerKey::rumor(&id), &rumor)?;
        context.set_event(LedgerEventKind::RumorVerified, id.as_str());

        info!(
            tx_id = %context.tx_id(),
            rumor_id = %id,
            verifier,
            is_verified,
            history_len = rumor.history().len(),
            "rumor verification recorded"
        );
        Ok(rumor)
    }
}
