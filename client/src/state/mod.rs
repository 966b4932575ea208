//! Client-side session state.
//!
//! DESIGN
//! ======
//! State lives in explicitly constructed controller objects rather than
//! globals; the shell builds one [`auth::AuthController`] at startup, hands
//! it to the route guard and views, and subscribes for change notification.

pub mod auth;
