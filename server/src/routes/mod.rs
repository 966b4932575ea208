//! Router assembly and the API response envelope.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every endpoint answers with the `{success, message, data}` envelope the
//! frontend expects, including error statuses, so the client can always
//! surface the server's message verbatim.

pub mod auth;
pub mod events;
pub mod tickets;
pub mod users;

use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post, put};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The `{success, message, data}` envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self { success: true, message: message.into(), data: Some(data) })
    }
}

impl ApiResponse<serde_json::Value> {
    /// Success without a `data` payload.
    pub fn ok_empty(message: impl Into<String>) -> Json<Self> {
        Json(Self { success: true, message: message.into(), data: None })
    }
}

/// Error half of a handler result: a status code plus the envelope message.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    message: String,
}

impl ApiFailure {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }
}

impl From<sqlx::Error> for ApiFailure {
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_error) = &error {
            // Class 22 is invalid input data (bad casts and the like).
            if db_error.code().is_some_and(|code| code.starts_with("22")) {
                return Self::bad_request("Invalid request data");
            }
        }
        tracing::error!(%error, "database error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = ApiResponse::<serde_json::Value> {
            success: false,
            message: self.message,
            data: None,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Assemble the application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/profile", put(auth::update_profile))
        .route("/api/users", get(users::list_users))
        .route("/api/users/{id}", axum::routing::patch(users::set_active))
        .route("/api/events", get(events::list_events).post(events::create_event))
        .route(
            "/api/events/{id}",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route("/api/tickets", get(tickets::list_tickets).post(tickets::book_ticket))
        .route("/api/tickets/{id}", axum::routing::delete(tickets::cancel_ticket))
        .route("/api/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `GET /api/health` — liveness probe with a server timestamp.
async fn health() -> Json<serde_json::Value> {
    let timestamp = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default();
    Json(serde_json::json!({
        "success": true,
        "message": "Server is running",
        "timestamp": timestamp,
    }))
}
