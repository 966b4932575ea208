use std::sync::Arc;

use super::*;
use crate::net::api::test_support::{FakeService, test_user};
use crate::net::types::Role;
use crate::router::route_requirements;
use crate::storage::{MemoryStore, SnapshotStore, TOKEN_KEY, USER_KEY};

fn anonymous_controller() -> AuthController {
    AuthController::new(Arc::new(FakeService::new()), Arc::new(MemoryStore::new()))
}

async fn authenticated_controller(role: Role) -> AuthController {
    let user = test_user("guard_user", role);
    let ctrl = AuthController::new(
        Arc::new(FakeService::authenticating(user, "tok", "ok")),
        Arc::new(MemoryStore::new()),
    );
    ctrl.login("guard_user@example.com", "pw").await;
    ctrl
}

// =============================================================================
// Route table
// =============================================================================

#[test]
fn dashboard_requires_auth_and_admin() {
    let req = route_requirements(DASHBOARD_PATH);
    assert!(req.requires_auth);
    assert!(req.requires_admin);
}

#[test]
fn public_routes_have_no_requirements() {
    for path in [HOME_PATH, LOGIN_PATH, REGISTER_PATH, "/events/42"] {
        assert_eq!(route_requirements(path), RouteRequirements::default(), "path {path}");
    }
}

// =============================================================================
// Rule ordering
// =============================================================================

#[test]
fn unauthenticated_admin_route_redirects_to_login_not_home() {
    let ctrl = anonymous_controller();
    let outcome = check_navigation(&ctrl, DASHBOARD_PATH, route_requirements(DASHBOARD_PATH));
    assert_eq!(outcome, GuardOutcome::Redirect(LOGIN_PATH));
}

#[tokio::test]
async fn authenticated_non_admin_on_admin_route_redirects_home() {
    let ctrl = authenticated_controller(Role::User).await;
    let outcome = check_navigation(&ctrl, DASHBOARD_PATH, route_requirements(DASHBOARD_PATH));
    assert_eq!(outcome, GuardOutcome::Redirect(HOME_PATH));
}

#[tokio::test]
async fn admin_reaches_dashboard() {
    let ctrl = authenticated_controller(Role::Admin).await;
    let outcome = check_navigation(&ctrl, DASHBOARD_PATH, route_requirements(DASHBOARD_PATH));
    assert_eq!(outcome, GuardOutcome::Allow);
}

// =============================================================================
// Login/register bounce for live sessions
// =============================================================================

#[tokio::test]
async fn admin_visiting_login_goes_to_dashboard() {
    let ctrl = authenticated_controller(Role::Admin).await;
    let outcome = check_navigation(&ctrl, LOGIN_PATH, route_requirements(LOGIN_PATH));
    assert_eq!(outcome, GuardOutcome::Redirect(DASHBOARD_PATH));
}

#[tokio::test]
async fn non_admin_visiting_login_goes_home() {
    let ctrl = authenticated_controller(Role::User).await;
    let outcome = check_navigation(&ctrl, LOGIN_PATH, route_requirements(LOGIN_PATH));
    assert_eq!(outcome, GuardOutcome::Redirect(HOME_PATH));
}

#[tokio::test]
async fn non_admin_visiting_register_goes_home() {
    let ctrl = authenticated_controller(Role::User).await;
    let outcome = check_navigation(&ctrl, REGISTER_PATH, route_requirements(REGISTER_PATH));
    assert_eq!(outcome, GuardOutcome::Redirect(HOME_PATH));
}

#[test]
fn anonymous_visitor_may_open_login() {
    let ctrl = anonymous_controller();
    let outcome = check_navigation(&ctrl, LOGIN_PATH, route_requirements(LOGIN_PATH));
    assert_eq!(outcome, GuardOutcome::Allow);
}

#[test]
fn anonymous_visitor_may_open_home() {
    let ctrl = anonymous_controller();
    let outcome = check_navigation(&ctrl, HOME_PATH, route_requirements(HOME_PATH));
    assert_eq!(outcome, GuardOutcome::Allow);
}

// =============================================================================
// Lazy hydration
// =============================================================================

#[test]
fn first_navigation_hydrates_from_snapshot() {
    let user = test_user("returning", Role::Admin);
    let store = Arc::new(MemoryStore::new());
    store.set(TOKEN_KEY, "persisted-token");
    store.set(USER_KEY, &serde_json::to_string(&user).unwrap());
    let ctrl = AuthController::new(Arc::new(FakeService::new()), store);
    assert!(!ctrl.has_cached_session());

    // Returning admin hits /login; the guard hydrates first, then bounces.
    let outcome = check_navigation(&ctrl, LOGIN_PATH, route_requirements(LOGIN_PATH));
    assert_eq!(outcome, GuardOutcome::Redirect(DASHBOARD_PATH));
    assert!(ctrl.is_authenticated());
}

#[test]
fn corrupt_snapshot_resolves_to_anonymous_navigation() {
    let store = Arc::new(MemoryStore::new());
    store.set(TOKEN_KEY, "persisted-token");
    store.set(USER_KEY, "garbage }{");
    let ctrl = AuthController::new(Arc::new(FakeService::new()), store.clone());

    let outcome = check_navigation(&ctrl, DASHBOARD_PATH, route_requirements(DASHBOARD_PATH));

    assert_eq!(outcome, GuardOutcome::Redirect(LOGIN_PATH));
    assert_eq!(store.get(TOKEN_KEY), None);
    assert_eq!(store.get(USER_KEY), None);
}

#[tokio::test]
async fn hydration_skipped_once_session_is_cached() {
    let ctrl = authenticated_controller(Role::User).await;
    // A later navigation must not re-read the snapshot over live state.
    check_navigation(&ctrl, HOME_PATH, route_requirements(HOME_PATH));
    assert_eq!(ctrl.snapshot().token.as_deref(), Some("tok"));
}
