//! Client-side route table and navigation guard.
//!
//! DESIGN
//! ======
//! Routes declare their requirements as plain metadata; the guard inspects
//! the auth controller before every transition and answers with allow or a
//! redirect target. The shell performs the actual navigation.

pub mod guard;

/// Public landing page.
pub const HOME_PATH: &str = "/";
/// Login form.
pub const LOGIN_PATH: &str = "/login";
/// Registration form.
pub const REGISTER_PATH: &str = "/register";
/// Admin dashboard.
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Per-route access requirements. Both default to false.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteRequirements {
    pub requires_auth: bool,
    pub requires_admin: bool,
}

/// Requirements for a known route path; unknown paths have none.
#[must_use]
pub fn route_requirements(path: &str) -> RouteRequirements {
    match path {
        DASHBOARD_PATH => RouteRequirements { requires_auth: true, requires_admin: true },
        _ => RouteRequirements::default(),
    }
}
