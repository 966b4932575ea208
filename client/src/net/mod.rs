//! Network layer: wire DTOs and the credential-service client.

pub mod api;
pub mod types;
