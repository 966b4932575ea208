//! # client
//!
//! Frontend core for the ticketbridge booking application: session state,
//! credential-service access, persisted session snapshots, and route
//! guarding. UI-framework-free — a shell (the `cli` crate today, a web UI
//! later) constructs an [`state::auth::AuthController`] and subscribes to
//! state changes explicitly.

pub mod net;
pub mod router;
pub mod state;
pub mod storage;
