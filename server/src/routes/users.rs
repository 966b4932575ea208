//! User administration routes.

use axum::extract::{Path, State};
use axum::response::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::auth::{AuthUser, UserPayload};
use super::{ApiFailure, ApiResponse};
use crate::services::session::{USER_COLUMNS, UserRecord, user_from_row};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetActiveBody {
    is_active: bool,
}

/// `GET /api/users` — all users, newest first (admin only).
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<UserRecord>>>, ApiFailure> {
    auth.require_admin()?;

    let query = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC");
    let rows = sqlx::query(&query).fetch_all(&state.pool).await?;
    let users = rows.iter().map(user_from_row).collect();
    Ok(ApiResponse::ok("OK", users))
}

/// `PATCH /api/users/{id}` — activate or deactivate an account (admin
/// only). Deactivation takes effect on the next session validation.
pub async fn set_active(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<SetActiveBody>,
) -> Result<Json<ApiResponse<UserPayload>>, ApiFailure> {
    auth.require_admin()?;

    let query = format!(
        r"UPDATE users SET is_active = $2, updated_at = now()
          WHERE id = $1
          RETURNING {USER_COLUMNS}"
    );
    let row = sqlx::query(&query)
        .bind(id)
        .bind(body.is_active)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| ApiFailure::not_found("User not found"))?;

    let message = if body.is_active { "User activated" } else { "User deactivated" };
    Ok(ApiResponse::ok(message, UserPayload { user: user_from_row(&row) }))
}
