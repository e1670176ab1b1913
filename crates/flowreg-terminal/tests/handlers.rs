//! Command handlers against the in-memory registry.

#![allow(clippy::unwrap_used)]

use clap::Parser;
use flowreg_app::{ConsoleCore, LocalExpiringStore, Notice};
use flowreg_core::{resources, ConsoleConfig, ConsoleError, Permissions};
use flowreg_terminal::{execute, Cli, HandlerContext};
use flowreg_testkit::{fixtures, MockRegistryApi, TestEffects};

const NOW_MS: i64 = 1_700_000_000_000;

fn context(api: MockRegistryApi) -> (HandlerContext, TestEffects) {
    let effects = TestEffects::at(NOW_MS).with_api(api);
    let store = LocalExpiringStore::new(effects.storage_handle(), effects.time_handle());
    let core = ConsoleCore::new(effects.api_handle(), store);
    (HandlerContext::new(core, ConsoleConfig::default()), effects)
}

async fn run(ctx: &HandlerContext, args: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(std::iter::once("flowreg").chain(args.iter().copied()))?;
    execute(ctx, cli.command).await
}

fn admin() -> MockRegistryApi {
    let alice = fixtures::user("u-1", "alice");
    MockRegistryApi::new()
        .with_current_user(fixtures::current_user("alice", fixtures::admin_permissions()))
        .with_buckets(vec![
            fixtures::bucket("b-1", "Prod"),
            fixtures::bucket("b-2", "Dev"),
            fixtures::bucket("b-3", "Production"),
        ])
        .with_groups(vec![fixtures::group("g-1", "admins", &[])])
        .with_users(vec![alice, fixtures::user("u-2", "bob")])
}

#[tokio::test]
async fn test_buckets_list_search_and_sort() {
    let (ctx, _) = context(admin());

    let out = run(&ctx, &["buckets", "list", "--search", "prod", "--desc"])
        .await
        .unwrap();

    let lines: Vec<&str> = out.lines().collect();
    assert!(lines[0].starts_with("Bucket Name v"));
    assert!(lines[1].starts_with("Production"));
    assert!(lines[2].starts_with("Prod "));
    assert_eq!(lines[3], "2 of 3 shown");
}

#[tokio::test]
async fn test_buckets_list_exact_match() {
    let (ctx, _) = context(admin());

    let out = run(&ctx, &["buckets", "list", "-s", "PROD", "--exact"]).await.unwrap();

    assert!(out.ends_with("1 of 3 shown"));
}

#[tokio::test]
async fn test_unknown_sort_column_is_an_error() {
    let (ctx, _) = context(admin());

    let err = run(&ctx, &["buckets", "list", "--sort", "owner"]).await.unwrap_err();

    assert!(err.to_string().contains("cannot sort by 'owner'"));
}

#[tokio::test]
async fn test_bucket_delete_reports_unknown_ids() {
    let (ctx, effects) = context(admin());

    let out = run(&ctx, &["buckets", "delete", "b-1", "b-9"]).await.unwrap();

    assert!(out.contains("skipped b-9: no such bucket"));
    assert!(out.contains("deleted bucket Prod (b-1)"));
    assert_eq!(effects.api.buckets().len(), 2);
}

#[tokio::test]
async fn test_bucket_delete_repeated_id_deletes_once() {
    let (ctx, effects) = context(admin());

    let out = run(&ctx, &["buckets", "delete", "b-1", "b-1"]).await.unwrap();

    assert_eq!(out.matches("deleted bucket Prod (b-1)").count(), 1);
    assert_eq!(effects.api.buckets().len(), 2);
    assert!(effects.api.buckets().iter().all(|b| b.identifier != "b-1"));
}

#[tokio::test]
async fn test_admin_commands_pass_the_gate_first() {
    let api = MockRegistryApi::new().with_current_user(fixtures::current_user(
        "carol",
        fixtures::permissions(&[
            (resources::ANY_TOP_LEVEL_RESOURCE, Permissions::read_only()),
            (resources::BUCKETS, Permissions::read_only()),
        ]),
    ));
    let (ctx, effects) = context(api);

    let err = run(&ctx, &["users", "add", "mallory"]).await.unwrap_err();

    assert!(err.to_string().contains("redirected to /administration/workflow"));
    assert!(err.to_string().contains(Notice::AccessDenied.title()));
    assert_eq!(effects.api.call_count("add_user"), 0);
}

#[tokio::test]
async fn test_anonymous_users_admin_is_not_configured() {
    let (ctx, _) = context(MockRegistryApi::new());

    let err = run(&ctx, &["users", "list"]).await.unwrap_err();

    assert!(err.to_string().contains(Notice::NotConfigured.title()));
}

#[tokio::test]
async fn test_gate_network_failure_surfaces_console_error() {
    let api = MockRegistryApi::new().with_failure(
        "load_current_user",
        flowreg_core::ApiError::transport("connection refused"),
    );
    let (ctx, _) = context(api);

    let err = run(&ctx, &["buckets", "create", "Staging"]).await.unwrap_err();

    assert_eq!(
        err.downcast_ref::<ConsoleError>(),
        Some(&ConsoleError::network("connection refused"))
    );
}

#[tokio::test]
async fn test_group_membership_commands() {
    let (ctx, effects) = context(admin());

    let out = run(&ctx, &["groups", "add-members", "g-1", "alice", "u-2"])
        .await
        .unwrap();
    assert!(out.starts_with("admins (g-1)\nmembers: 2"));

    run(&ctx, &["groups", "remove-members", "g-1", "u-1"]).await.unwrap();
    let groups = effects.api.groups();
    let group = &groups[0];
    assert!(!group.has_member("u-1"));
    assert!(group.has_member("u-2"));

    let err = run(&ctx, &["groups", "add-members", "g-1", "nobody"]).await.unwrap_err();
    assert!(err.to_string().contains("no such user: nobody"));
}

#[tokio::test]
async fn test_users_list_shows_users_and_groups() {
    let (ctx, _) = context(admin());

    let out = run(&ctx, &["users", "list"]).await.unwrap();

    assert!(out.lines().nth(1).unwrap().starts_with("admins"));
    assert!(out.ends_with("3 of 3 shown"));
}

#[tokio::test]
async fn test_navigate_reports_decision() {
    let (ctx, _) = context(admin());

    let out = run(&ctx, &["navigate", "/administration/users"]).await.unwrap();
    assert_eq!(out, "allowed: /administration/users");

    let out = run(&ctx, &["navigate", "/explorer/grid-list"]).await.unwrap();
    assert_eq!(out, "allowed: /explorer/grid-list");
}

#[tokio::test]
async fn test_login_then_whoami_then_logout() {
    let token = fixtures::session_token("alice", NOW_MS / 1000 + 3600);
    let (ctx, _) = context(admin().with_login("alice", "secret", token));

    let out = run(&ctx, &["login", "alice", "--password", "secret"]).await.unwrap();
    assert_eq!(out, "logged in as alice\nnext: /explorer/grid-list");

    let out = run(&ctx, &["whoami"]).await.unwrap();
    assert!(out.contains("identity:   alice"));
    assert!(out.contains("can logout: true"));
    assert!(out.contains(&format!("token expires (ms): {}", (NOW_MS / 1000 + 3600) * 1000)));

    assert_eq!(run(&ctx, &["logout"]).await.unwrap(), "logged out");
    assert!(!ctx.core().store().has_session_token().await);
}

#[tokio::test]
async fn test_droplet_show_and_delete() {
    let api = admin().with_droplets(vec![fixtures::droplet("d-1", "ingest", "b-1")]);
    let (ctx, effects) = context(api);

    let out = run(&ctx, &["droplets", "show", "b-1", "flows", "d-1"]).await.unwrap();
    assert!(out.starts_with("name:     ingest"));
    assert!(out.contains("bucket:   b-1"));

    let out = run(&ctx, &["droplets", "delete", "b-1", "flows", "d-1"]).await.unwrap();
    assert_eq!(out, "deleted ingest (d-1)");
    assert!(effects.api.droplets().is_empty());
}
