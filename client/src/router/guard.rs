//! Navigation guard enforcing auth and role requirements per route.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use super::{DASHBOARD_PATH, HOME_PATH, LOGIN_PATH, REGISTER_PATH, RouteRequirements};
use crate::state::auth::AuthController;

/// Guard verdict for a navigation attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Proceed to the requested route.
    Allow,
    /// Navigate to this path instead.
    Redirect(&'static str),
}

/// Decide whether a navigation to `target_path` may proceed.
///
/// Hydrates the session from the persisted snapshot on the first call that
/// finds nothing cached, then applies the rules in order:
/// auth-required routes bounce unauthenticated sessions to the login page
/// (this wins over the admin check), admin routes bounce non-admins home,
/// and the login/register pages bounce authenticated sessions to the
/// dashboard (admins) or home (everyone else).
#[must_use]
pub fn check_navigation(
    auth: &AuthController,
    target_path: &str,
    requirements: RouteRequirements,
) -> GuardOutcome {
    if !auth.has_cached_session() {
        auth.initialize_auth();
    }

    let state = auth.snapshot();
    let authenticated = state.is_authenticated();
    let admin = state.is_admin();

    if requirements.requires_auth && !authenticated {
        return GuardOutcome::Redirect(LOGIN_PATH);
    }
    if requirements.requires_admin && !admin {
        return GuardOutcome::Redirect(HOME_PATH);
    }
    if (target_path == LOGIN_PATH || target_path == REGISTER_PATH) && authenticated {
        return GuardOutcome::Redirect(if admin { DASHBOARD_PATH } else { HOME_PATH });
    }
    GuardOutcome::Allow
}
