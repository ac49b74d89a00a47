use std::sync::Arc;

use proptest::prelude::*;
use veritrail_core::AppError;
use veritrail_domain::{LedgerKey, Role};

use crate::test_support::{FakeLedgerStore, commit, context_on};
use crate::{AuthorizationFunction, Chaincode, Invocation, Payload, ServiceFunction};

use super::AuthorizationService;

fn invocation(function: &str, args: &[&str]) -> Invocation {
    Invocation::new(
        function,
        args.iter().map(|value| (*value).to_owned()).collect(),
    )
}

async fn seeded_store() -> Arc<FakeLedgerStore> {
    let store = FakeLedgerStore::shared();
    let mut context = context_on(&store, 1);
    assert!(AuthorizationService::new().init(&mut context, &[]).await.is_ok());
    assert!(commit(&store, context).await.is_ok());
    store
}

/// Runs one invocation as its own committed transaction.
async fn run(
    store: &Arc<FakeLedgerStore>,
    function: &str,
    args: &[&str],
) -> Result<Payload, AppError> {
    let service = AuthorizationService::new();
    let mut context = context_on(store, 2);
    let payload = service.invoke(&mut context, &invocation(function, args)).await?;
    commit(store, context).await?;
    Ok(payload)
}

async fn stored_roles(store: &Arc<FakeLedgerStore>, user_id: &str) -> Vec<String> {
    let context = context_on(store, 3);
    AuthorizationService::new()
        .get_user_roles(&context, user_id)
        .await
        .ok()
        .flatten()
        .map(|assignment| assignment.roles().to_vec())
        .unwrap_or_default()
}

#[tokio::test]
async fn init_seeds_reserved_roles() {
    let store = seeded_store().await;

    let admin = run(&store, "getRolePermissions", &["ADMIN"]).await;
    assert_eq!(
        admin.map(|payload| payload.to_text()).unwrap_or_default(),
        r#"{"name":"ADMIN","permissions":["CREATE_RUMOR","VERIFY_RUMOR","MANAGE_ROLES","MANAGE_PERMISSIONS"]}"#
    );
    assert_eq!(store.len().await, 3);
}

#[tokio::test]
async fn init_overwrites_customized_reserved_roles() {
    let store = seeded_store().await;
    assert!(run(&store, "updateRole", &["USER", r#"["NOTHING"]"#]).await.is_ok());

    let mut context = context_on(&store, 4);
    assert!(AuthorizationService::new().init(&mut context, &[]).await.is_ok());
    assert!(commit(&store, context).await.is_ok());

    let user = run(&store, "getRolePermissions", &["USER"]).await;
    assert_eq!(
        user.map(|payload| payload.to_text()).unwrap_or_default(),
        r#"{"name":"USER","permissions":["CREATE_RUMOR","VIEW_RUMOR"]}"#
    );
}

#[tokio::test]
async fn create_role_overwrites_existing_definition() {
    let store = seeded_store().await;
    assert!(run(&store, "createRole", &["AUDITOR", r#"["A","A"]"#]).await.is_ok());
    assert!(run(&store, "createRole", &["AUDITOR", r#"["B"]"#]).await.is_ok());

    let context = context_on(&store, 5);
    let role = AuthorizationService::new()
        .get_role_permissions(&context, "AUDITOR")
        .await;
    assert_eq!(role.ok(), Some(Role::new("AUDITOR", vec!["B".to_owned()])));
}

#[tokio::test]
async fn create_role_rejects_malformed_permissions_and_wrong_arity() {
    let store = seeded_store().await;

    let malformed = run(&store, "createRole", &["AUDITOR", "not-json"]).await;
    assert!(matches!(malformed, Err(AppError::Argument(_))));

    let arity = run(&store, "createRole", &["AUDITOR"]).await;
    assert!(matches!(arity, Err(AppError::Argument(_))));
    assert!(store.raw("ROLE_AUDITOR").await.is_none());
}

#[tokio::test]
async fn update_role_requires_existing_role_and_replaces_list() {
    let store = seeded_store().await;

    let missing = run(&store, "updateRole", &["GHOST", "[]"]).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    assert!(run(&store, "updateRole", &["VERIFIER", r#"["VIEW_RUMOR"]"#]).await.is_ok());
    let context = context_on(&store, 5);
    let role = AuthorizationService::new()
        .get_role_permissions(&context, "VERIFIER")
        .await;
    assert_eq!(
        role.map(|role| role.permissions().to_vec()).unwrap_or_default(),
        vec!["VIEW_RUMOR".to_owned()]
    );
}

#[tokio::test]
async fn assign_role_requires_existing_role() {
    let store = seeded_store().await;

    let result = run(&store, "assignRole", &["alice", "GHOST"]).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert!(store.raw("USER_ROLE_alice").await.is_none());
}

#[tokio::test]
async fn assigning_same_role_twice_conflicts_and_keeps_list() {
    let store = seeded_store().await;
    assert!(run(&store, "assignRole", &["alice", "USER"]).await.is_ok());
    assert!(run(&store, "assignRole", &["alice", "VERIFIER"]).await.is_ok());

    let duplicate = run(&store, "assignRole", &["alice", "USER"]).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
    assert_eq!(
        stored_roles(&store, "alice").await,
        vec!["USER".to_owned(), "VERIFIER".to_owned()]
    );
}

#[tokio::test]
async fn revoking_unassigned_role_fails_and_keeps_list() {
    let store = seeded_store().await;
    assert!(run(&store, "assignRole", &["alice", "USER"]).await.is_ok());

    let result = run(&store, "revokeRole", &["alice", "ADMIN"]).await;
    assert!(matches!(result, Err(AppError::RoleNotAssigned(_))));
    assert_eq!(stored_roles(&store, "alice").await, vec!["USER".to_owned()]);
}

#[tokio::test]
async fn revoke_without_assignment_is_not_found() {
    let store = seeded_store().await;
    let result = run(&store, "revokeRole", &["nobody", "USER"]).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn revoking_last_role_keeps_empty_assignment() {
    let store = seeded_store().await;
    assert!(run(&store, "assignRole", &["alice", "USER"]).await.is_ok());
    assert!(run(&store, "revokeRole", &["alice", "USER"]).await.is_ok());

    assert_eq!(
        store.raw("USER_ROLE_alice").await,
        Some(br#"{"userId":"alice","roles":[]}"#.to_vec())
    );
    let check = run(&store, "checkPermission", &["alice", "VIEW_RUMOR"]).await;
    assert_eq!(check.map(|payload| payload.to_text()).ok(), Some("false".to_owned()));
}

#[tokio::test]
async fn user_without_assignment_has_no_permissions_and_empty_roles() {
    let store = seeded_store().await;

    let check = run(&store, "checkPermission", &["stranger", "VIEW_RUMOR"]).await;
    assert_eq!(check.map(|payload| payload.to_text()).ok(), Some("false".to_owned()));

    let roles = run(&store, "getUserRoles", &["stranger"]).await;
    assert_eq!(roles.map(|payload| payload.to_text()).ok(), Some("[]".to_owned()));
}

#[tokio::test]
async fn missing_role_lookup_is_an_error_but_missing_user_is_not() {
    let store = seeded_store().await;

    let role = run(&store, "getRolePermissions", &["GHOST"]).await;
    assert!(matches!(role, Err(AppError::NotFound(_))));

    let user = run(&store, "getUserRoles", &["ghost"]).await;
    assert!(user.is_ok());
}

#[tokio::test]
async fn get_user_roles_returns_stored_record() {
    let store = seeded_store().await;
    assert!(run(&store, "assignRole", &["alice", "VERIFIER"]).await.is_ok());

    let roles = run(&store, "getUserRoles", &["alice"]).await;
    assert_eq!(
        roles.map(|payload| payload.to_text()).unwrap_or_default(),
        r#"{"userId":"alice","roles":["VERIFIER"]}"#
    );
}

#[tokio::test]
async fn check_permission_skips_unreadable_and_corrupt_roles() {
    let store = seeded_store().await;
    assert!(run(&store, "createRole", &["BROKEN", r#"["VIEW_RUMOR"]"#]).await.is_ok());
    assert!(run(&store, "createRole", &["CORRUPT", r#"["VIEW_RUMOR"]"#]).await.is_ok());
    assert!(run(&store, "assignRole", &["alice", "BROKEN"]).await.is_ok());
    assert!(run(&store, "assignRole", &["alice", "CORRUPT"]).await.is_ok());
    assert!(run(&store, "assignRole", &["alice", "VERIFIER"]).await.is_ok());

    store.fail_reads_of("ROLE_BROKEN").await;
    store.insert_raw("ROLE_CORRUPT", b"\x00garbage".to_vec()).await;

    let granted = run(&store, "checkPermission", &["alice", "VIEW_RUMOR"]).await;
    assert_eq!(granted.map(|payload| payload.to_text()).ok(), Some("true".to_owned()));
}

#[tokio::test]
async fn check_permission_is_false_when_every_role_lookup_fails() {
    let store = seeded_store().await;
    assert!(run(&store, "assignRole", &["alice", "USER"]).await.is_ok());
    store.fail_reads_of("ROLE_USER").await;

    let context = context_on(&store, 9);
    let result = AuthorizationService::new()
        .check_permission(&context, "alice", "CREATE_RUMOR")
        .await;
    assert_eq!(result.ok(), Some(false));
}

#[tokio::test]
async fn check_permission_skips_deleted_role_names() {
    let store = seeded_store().await;
    store
        .insert_raw(
            "USER_ROLE_alice",
            br#"{"userId":"alice","roles":["GHOST","USER"]}"#.to_vec(),
        )
        .await;

    let granted = run(&store, "checkPermission", &["alice", "CREATE_RUMOR"]).await;
    assert_eq!(granted.map(|payload| payload.to_text()).ok(), Some("true".to_owned()));
}

#[tokio::test]
async fn check_permission_propagates_assignment_read_failure() {
    let store = seeded_store().await;
    store.fail_reads_of("USER_ROLE_alice").await;

    let result = run(&store, "checkPermission", &["alice", "VIEW_RUMOR"]).await;
    assert!(matches!(result, Err(AppError::Storage(_))));
}

#[tokio::test]
async fn check_permission_performs_no_writes() {
    let store = seeded_store().await;
    assert!(run(&store, "assignRole", &["alice", "USER"]).await.is_ok());

    let mut context = context_on(&store, 6);
    let result = AuthorizationService::new()
        .invoke(&mut context, &invocation("checkPermission", &["alice", "CREATE_RUMOR"]))
        .await;
    assert!(result.is_ok());
    assert!(!context.has_pending_writes());
}

#[tokio::test]
async fn unknown_function_is_rejected() {
    let store = seeded_store().await;
    let result = run(&store, "deleteRole", &["ADMIN"]).await;
    assert!(matches!(result, Err(AppError::InvalidFunction(_))));
}

#[test]
fn function_table_resolves_every_wire_name() {
    for (name, function) in AuthorizationFunction::TABLE {
        assert_eq!(AuthorizationFunction::from_name(name).ok(), Some(*function));
    }
}

#[tokio::test]
async fn storage_failure_on_commit_leaves_state_untouched() {
    let store = seeded_store().await;
    store.fail_writes().await;

    let result = run(&store, "createRole", &["AUDITOR", "[]"]).await;
    assert!(matches!(result, Err(AppError::Storage(_))));
    assert!(store.raw(LedgerKey::role("AUDITOR").render().as_str()).await.is_none());
}

fn check_after_grant(permissions: Vec<String>, probe: String) -> Option<bool> {
    let runtime = tokio::runtime::Builder::new_current_thread().build().ok()?;
    runtime.block_on(async {
        let store = FakeLedgerStore::shared();
        let service = AuthorizationService::new();

        let mut setup = context_on(&store, 1);
        service.create_role(&mut setup, "CUSTOM", permissions).ok()?;
        commit(&store, setup).await.ok()?;

        let mut assign = context_on(&store, 2);
        service.assign_role(&mut assign, "bob", "CUSTOM").await.ok()?;
        commit(&store, assign).await.ok()?;

        let context = context_on(&store, 3);
        service.check_permission(&context, "bob", probe.as_str()).await.ok()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn assigned_role_grants_exactly_its_permission_set(
        permissions in proptest::collection::vec("[A-Z_]{1,10}", 0..6),
        probe in "[A-Z_]{1,10}",
    ) {
        let expected = permissions.contains(&probe);
        prop_assert_eq!(check_after_grant(permissions, probe), Some(expected));
    }
}
