//! Console workflows end to end against the in-memory registry.

#![allow(clippy::unwrap_used)]

use assert_matches::assert_matches;
use flowreg_app::workflows::{auth, buckets, explorer, users};
use flowreg_app::{
    error_notice, ConsoleCore, GateDecision, GateVariant, LocalExpiringStore, Location, Notice,
    Route, Tenant,
};
use flowreg_core::{resources, ApiError, ConsoleError, Droplet, Permissions};
use flowreg_testkit::{fixtures, MockRegistryApi, TestEffects};

const NOW_MS: i64 = 1_700_000_000_000;

fn console(api: MockRegistryApi) -> (ConsoleCore, TestEffects) {
    let effects = TestEffects::at(NOW_MS).with_api(api);
    let store = LocalExpiringStore::new(effects.storage_handle(), effects.time_handle());
    (ConsoleCore::new(effects.api_handle(), store), effects)
}

fn modified(mut droplet: Droplet, at: i64) -> Droplet {
    droplet.modified_timestamp = Some(at);
    droplet
}

// ============================================================================
// Login / logout
// ============================================================================

#[tokio::test]
async fn test_login_stores_token_and_returns_redirect() {
    let token = fixtures::session_token("alice", NOW_MS / 1000 + 3600);
    let api = MockRegistryApi::new()
        .with_login("alice", "secret", token.clone())
        .with_current_user(fixtures::current_user("alice", fixtures::admin_permissions()));
    let (core, _) = console(api);
    core.session().begin_navigation(Some("/administration/users"));

    let target = auth::login(&core, "alice", "secret").await.unwrap();

    assert_eq!(target, Location::new(Route::AdministrationUsers));
    assert_eq!(core.store().session_token().await, Some(token));
    let session = core.session().snapshot();
    assert!(session.is_authenticated());
    assert!(session.can_logout);
}

#[tokio::test]
async fn test_login_supersedes_pending_login_gate() {
    let api = MockRegistryApi::new()
        .with_login("alice", "secret", fixtures::session_token("alice", NOW_MS / 1000 + 60));
    let (core, effects) = console(api);
    let pending = core.gate().can_activate(GateVariant::Login, "/login");

    effects
        .api
        .set_current_user(fixtures::current_user("alice", fixtures::admin_permissions()));
    auth::login(&core, "alice", "secret").await.unwrap();

    // The gate's identity load answers late, with the anonymous identity.
    effects.api.set_current_user(fixtures::anonymous());
    let decision = core.gate().resolve(pending.attempt().cloned().unwrap()).await;

    assert_eq!(decision, GateDecision::Superseded);
    let session = core.session().snapshot();
    assert_eq!(session.display_name(), Some("alice"));
    assert!(session.is_authenticated());
    assert!(session.can_logout);
}

#[tokio::test]
async fn test_login_defaults_to_explorer() {
    let api = MockRegistryApi::new()
        .with_login("alice", "secret", fixtures::session_token("alice", NOW_MS / 1000 + 60))
        .with_current_user(fixtures::current_user("alice", fixtures::admin_permissions()));
    let (core, _) = console(api);

    let target = auth::login(&core, "alice", "secret").await.unwrap();

    assert_eq!(target.route, Route::Explorer);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let (core, _) = console(MockRegistryApi::new());

    let err = auth::login(&core, "alice", "wrong").await.unwrap_err();

    assert_matches!(err, ConsoleError::Unauthenticated { .. });
    assert!(!core.store().has_session_token().await);
    assert_eq!(
        error_notice(&err),
        Notice::error("The supplied username and password are not valid.")
    );
}

#[tokio::test]
async fn test_login_requires_username() {
    let (core, effects) = console(MockRegistryApi::new());

    let err = auth::login(&core, "  ", "pw").await.unwrap_err();

    assert_matches!(err, ConsoleError::Invalid { .. });
    assert_eq!(effects.api.total_calls(), 0);
}

#[tokio::test]
async fn test_logout_clears_token_and_session() {
    let api = MockRegistryApi::new()
        .with_login("alice", "secret", fixtures::session_token("alice", NOW_MS / 1000 + 60))
        .with_current_user(fixtures::current_user("alice", fixtures::admin_permissions()));
    let (core, _) = console(api);
    auth::login(&core, "alice", "secret").await.unwrap();
    let generation = core.session().generation();

    auth::logout(&core).await;

    assert!(!core.store().has_session_token().await);
    let session = core.session().snapshot();
    assert!(session.identity.is_none());
    assert!(session.navigation_generation > generation);
}

#[tokio::test]
async fn test_refresh_identity_clears_token_on_401() {
    let api = MockRegistryApi::new().with_failure("load_current_user", ApiError::http(401, "expired"));
    let (core, _) = console(api);
    core.store()
        .store_session_token(&fixtures::session_token("alice", NOW_MS / 1000 + 60))
        .await;

    let err = auth::refresh_identity(&core).await.unwrap_err();

    assert_eq!(err, ConsoleError::unauthenticated("expired"));
    assert!(!core.store().has_session_token().await);
}

// ============================================================================
// Explorer
// ============================================================================

#[tokio::test]
async fn test_explorer_lists_droplets_newest_first() {
    let api = MockRegistryApi::new()
        .with_buckets(vec![fixtures::bucket("b-1", "Prod"), fixtures::bucket("b-2", "Dev")])
        .with_droplets(vec![
            modified(fixtures::droplet("d-1", "ingest", "b-1"), 100),
            modified(fixtures::droplet("d-2", "enrich", "b-2"), 300),
            modified(fixtures::droplet("d-3", "publish", "b-1"), 200),
        ]);
    let (core, effects) = console(api);

    let view = explorer::load_explorer(&core, None).await.unwrap();

    let ids: Vec<&str> = view.droplets.rows().iter().map(|d| d.identifier.as_str()).collect();
    assert_eq!(ids, ["d-2", "d-3", "d-1"]);
    let bucket_names: Vec<&str> = view.buckets.rows().iter().map(|b| b.name.as_str()).collect();
    assert_eq!(bucket_names, ["Dev", "Prod"]);
    assert_eq!(effects.api.calls(), ["get_buckets", "get_droplets"]);
}

#[tokio::test]
async fn test_explorer_bucket_drill_down() {
    let api = MockRegistryApi::new()
        .with_buckets(vec![fixtures::bucket("b-1", "Prod"), fixtures::bucket("b-2", "Dev")])
        .with_droplets(vec![
            fixtures::droplet("d-1", "ingest", "b-1"),
            fixtures::droplet("d-2", "enrich", "b-2"),
        ]);
    let (core, _) = console(api);

    let view = explorer::load_explorer(&core, Some("b-2")).await.unwrap();

    assert_eq!(view.bucket.unwrap().name, "Dev");
    assert_eq!(view.droplets.records().len(), 1);
    assert_eq!(view.droplets.records()[0].identifier, "d-2");
}

#[tokio::test]
async fn test_explorer_search_narrows_rows() {
    let api = MockRegistryApi::new().with_droplets(vec![
        fixtures::droplet("d-1", "ingest-orders", "b-1"),
        fixtures::droplet("d-2", "enrich-orders", "b-1"),
        fixtures::droplet("d-3", "ingest-users", "b-1"),
    ]);
    let (core, _) = console(api);
    let mut view = explorer::load_explorer(&core, None).await.unwrap();

    view.droplets.add_search_term("ORDERS");
    view.droplets.add_search_term("ingest");

    let rows = view.droplets.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].identifier, "d-1");
}

#[tokio::test]
async fn test_delete_droplet_uses_self_link() {
    let api = MockRegistryApi::new().with_droplets(vec![fixtures::droplet("d-1", "ingest", "b-1")]);
    let (core, effects) = console(api);
    let droplet = explorer::load_droplet(&core, "b-1", "flows", "d-1").await.unwrap();

    explorer::delete_droplet(&core, &droplet).await.unwrap();

    assert!(effects.api.droplets().is_empty());

    let unlinked = Droplet {
        link: None,
        ..droplet
    };
    assert_matches!(
        explorer::delete_droplet(&core, &unlinked).await,
        Err(ConsoleError::Invalid { .. })
    );
}

// ============================================================================
// Workflow administration
// ============================================================================

#[tokio::test]
async fn test_create_and_delete_buckets() {
    let (core, effects) = console(MockRegistryApi::new().with_buckets(vec![fixtures::bucket("b-1", "Prod")]));

    let created = buckets::create_bucket(&core, "  Staging ").await.unwrap();
    assert_eq!(created.name, "Staging");

    let duplicate = buckets::create_bucket(&core, "Staging").await.unwrap_err();
    assert_matches!(duplicate, ConsoleError::Network { .. });
    assert_matches!(
        buckets::create_bucket(&core, "").await,
        Err(ConsoleError::Invalid { .. })
    );

    let mut table = buckets::load_buckets(&core).await.unwrap();
    table.toggle_all_displayed();
    assert_eq!(table.selection_count(), 2);

    let outcome = buckets::delete_selected_buckets(&core, &mut table).await;

    assert!(outcome.is_complete());
    assert_eq!(outcome.deleted.len(), 2);
    assert!(table.records().is_empty());
    assert_eq!(table.selection_count(), 0);
    assert!(effects.api.buckets().is_empty());
}

#[tokio::test]
async fn test_partial_bucket_deletion_keeps_failures() {
    let api = MockRegistryApi::new().with_buckets(vec![
        fixtures::bucket("b-1", "Prod"),
        fixtures::bucket("b-2", "Dev"),
    ]);
    let (core, _) = console(api);

    let outcome = buckets::delete_buckets(&core, &["b-1".to_string(), "b-404".to_string()]).await;

    assert!(!outcome.is_complete());
    assert_eq!(outcome.deleted[0].identifier, "b-1");
    assert_matches!(&outcome.failed[..], [(id, ConsoleError::NotFound { .. })] if id == "b-404");
}

// ============================================================================
// Users administration
// ============================================================================

fn tenants_api() -> MockRegistryApi {
    let alice = fixtures::user("u-1", "alice");
    let bob = fixtures::user("u-2", "bob");
    MockRegistryApi::new()
        .with_groups(vec![fixtures::group("g-1", "admins", &[&alice])])
        .with_users(vec![alice, bob])
        .with_current_user(fixtures::current_user(
            "alice",
            fixtures::permissions(&[(resources::TENANTS, Permissions::full())]),
        ))
}

#[tokio::test]
async fn test_tenant_table_combines_users_and_groups() {
    let (core, _) = console(tenants_api());

    let mut table = users::load_tenants(&core).await.unwrap();

    let names: Vec<&str> = table.rows().iter().map(|t| t.identity()).collect();
    assert_eq!(names, ["admins", "alice", "bob"]);

    table.add_search_term("ADM");
    let rows = table.rows();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].is_group());
}

#[tokio::test]
async fn test_add_users_to_group_skips_members() {
    let (core, effects) = console(tenants_api());
    let members = [
        fixtures::user("u-1", "alice").as_tenant_ref(),
        fixtures::user("u-2", "bob").as_tenant_ref(),
    ];

    let group = users::add_users_to_group(&core, "g-1", &members).await.unwrap();

    let ids: Vec<&str> = group.users.iter().map(|u| u.identifier.as_str()).collect();
    assert_eq!(ids, ["u-1", "u-2"]);
    assert_eq!(effects.api.call_count("update_user_group"), 1);

    // Everyone is already a member: no write.
    users::add_users_to_group(&core, "g-1", &members).await.unwrap();
    assert_eq!(effects.api.call_count("update_user_group"), 1);
}

#[tokio::test]
async fn test_remove_user_from_group() {
    let (core, effects) = console(tenants_api());

    let group = users::remove_user_from_group(&core, "g-1", "u-1").await.unwrap();
    assert!(group.users.is_empty());

    users::remove_user_from_group(&core, "g-1", "u-1").await.unwrap();
    assert_eq!(effects.api.call_count("update_user_group"), 1);
}

#[tokio::test]
async fn test_add_user_then_join_groups() {
    let (core, effects) = console(tenants_api());

    let carol = users::add_user(&core, "carol").await.unwrap();
    let other = users::create_group(&core, "operators", &[]).await.unwrap();
    users::add_user_to_groups(
        &core,
        &carol.as_tenant_ref(),
        &["g-1".to_string(), other.identifier.clone()],
    )
    .await
    .unwrap();

    assert!(effects
        .api
        .groups()
        .iter()
        .all(|g| g.has_member(&carol.identifier)));
    assert_matches!(
        users::add_user(&core, "carol").await,
        Err(ConsoleError::Network { .. })
    );
}

#[tokio::test]
async fn test_delete_tenants_removes_user_memberships() {
    let (core, effects) = console(tenants_api());
    let table = users::load_tenants(&core).await.unwrap();
    let alice: Vec<Tenant> = table
        .records()
        .iter()
        .filter(|t| t.identifier() == "u-1")
        .cloned()
        .collect();

    let outcome = users::delete_tenants(&core, &alice).await;

    assert!(outcome.is_complete());
    assert_eq!(effects.api.users().len(), 1);
    assert!(effects.api.groups()[0].users.is_empty());
}

#[tokio::test]
async fn test_rename_group_keeps_members() {
    let (core, _) = console(tenants_api());

    let group = users::rename_group(&core, "g-1", "operators").await.unwrap();

    assert_eq!(group.identity, "operators");
    assert!(group.has_member("u-1"));
}
