//! Domain services shared by the route handlers.

pub mod password;
pub mod session;
