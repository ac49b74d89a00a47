use async_trait::async_trait;
use veritrail_core::AppResult;

use crate::{Chaincode, Invocation, Payload, ServiceFunction, TransactionContext, expect_arity};

use super::RumorService;

/// Functions exposed by the rumor service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RumorFunction {
    /// `createRumor(id, content, creator)`.
    CreateRumor,
    /// `verifyRumor(id, verifier, isVerified, comment)`.
    VerifyRumor,
    /// `getRumor(id, requesterId)`.
    GetRumor,
    /// `getRumorHistory(id, requesterId)`.
    GetRumorHistory,
}

impl ServiceFunction for RumorFunction {
    const SERVICE: &'static str = "rumor";

    const TABLE: &'static [(&'static str, Self)] = &[
        ("createRumor", Self::CreateRumor),
        ("verifyRumor", Self::VerifyRumor),
        ("getRumor", Self::GetRumor),
        ("getRumorHistory", Self::GetRumorHistory),
    ];
}

/// Only the exact string `true` sets the flag; any other value clears it.
fn parse_verdict(raw: &str) -> bool {
    raw == "true"
}

#[async_trait]
impl Chaincode for RumorService {
    async fn init(&self, _context: &mut TransactionContext, _args: &[String]) -> AppResult<Payload> {
        Ok(Payload::empty())
    }

    async fn invoke(
        &self,
        context: &mut TransactionContext,
        invocation: &Invocation,
    ) -> AppResult<Payload> {
        let args = invocation.args();

        match RumorFunction::from_name(invocation.function())? {
            RumorFunction::CreateRumor => {
                let [id, content, creator] = expect_arity(args, "id, content and creator")?;
                self.create_rumor(context, id, content, creator).await?;
                Ok(Payload::empty())
            }
            RumorFunction::VerifyRumor => {
                let [id, verifier, verdict, comment] =
                    expect_arity(args, "id, verifier, isVerified and comment")?;
                self.verify_rumor(context, id, verifier, parse_verdict(verdict), comment)
                    .await?;
                Ok(Payload::empty())
            }
            RumorFunction::GetRumor => {
                let [id, requester_id] = expect_arity(args, "id and requesterId")?;
                Payload::json(&self.get_rumor(context, id, requester_id).await?)
            }
            RumorFunction::GetRumorHistory => {
                let [id, requester_id] = expect_arity(args, "id and requesterId")?;
                Payload::json(&self.get_rumor_history(context, id, requester_id).await?)
            }
        }
    }
}
