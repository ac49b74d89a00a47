use async_trait::async_trait;
use veritrail_core::AppResult;
use veritrail_domain::parse_permission_list;

use crate::{Chaincode, Invocation, Payload, ServiceFunction, TransactionContext, expect_arity};

use super::AuthorizationService;

/// Functions exposed by the authorization service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationFunction {
    /// `assignRole(userId, roleName)`.
    AssignRole,
    /// `revokeRole(userId, roleName)`.
    RevokeRole,
    /// `checkPermission(userId, permission)`.
    CheckPermission,
    /// `createRole(roleName, permissionsJSON)`.
    CreateRole,
    /// `updateRole(roleName, permissionsJSON)`.
    UpdateRole,
    /// `getUserRoles(userId)`.
    GetUserRoles,
    /// `getRolePermissions(roleName)`.
    GetRolePermissions,
}

impl ServiceFunction for AuthorizationFunction {
    const SERVICE: &'static str = "authorization";

    const TABLE: &'static [(&'static str, Self)] = &[
        ("assignRole", Self::AssignRole),
        ("revokeRole", Self::RevokeRole),
        ("checkPermission", Self::CheckPermission),
        ("createRole", Self::CreateRole),
        ("updateRole", Self::UpdateRole),
        ("getUserRoles", Self::GetUserRoles),
        ("getRolePermissions", Self::GetRolePermissions),
    ];
}

#[async_trait]
impl Chaincode for AuthorizationService {
    async fn init(&self, context: &mut TransactionContext, _args: &[String]) -> AppResult<Payload> {
        self.reset_reserved_roles(context)?;
        Ok(Payload::empty())
    }

    async fn invoke(
        &self,
        context: &mut TransactionContext,
        invocation: &Invocation,
    ) -> AppResult<Payload> {
        let args = invocation.args();

        match AuthorizationFunction::from_name(invocation.function())? {
            AuthorizationFunction::AssignRole => {
                let [user_id, role_name] = expect_arity(args, "userId and roleName")?;
                self.assign_role(context, user_id, role_name).await?;
                Ok(Payload::empty())
            }
            AuthorizationFunction::RevokeRole => {
                let [user_id, role_name] = expect_arity(args, "userId and roleName")?;
                self.revoke_role(context, user_id, role_name).await?;
                Ok(Payload::empty())
            }
            AuthorizationFunction::CheckPermission => {
                let [user_id, permission] = expect_arity(args, "userId and permission")?;
                let granted = self.check_permission(context, user_id, permission).await?;
                Ok(Payload::text(if granted { "true" } else { "false" }))
            }
            AuthorizationFunction::CreateRole => {
                let [name, permissions] = expect_arity(args, "roleName and permissions")?;
                self.create_role(context, name, parse_permission_list(permissions)?)?;
                Ok(Payload::empty())
            }
            AuthorizationFunction::UpdateRole => {
                let [name, permissions] = expect_arity(args, "roleName and permissions")?;
                self.update_role(context, name, parse_permission_list(permissions)?)
                    .await?;
                Ok(Payload::empty())
            }
            AuthorizationFunction::GetUserRoles => {
                let [user_id] = expect_arity(args, "userId")?;
                self.user_roles_payload(context, user_id).await
            }
            AuthorizationFunction::GetRolePermissions => {
                let [name] = expect_arity(args, "roleName")?;
                self.role_payload(context, name).await
            }
        }
    }
}
