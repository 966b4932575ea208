//! Event routes — public browsing, admin-only management.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use super::auth::AuthUser;
use super::{ApiFailure, ApiResponse};
use crate::state::AppState;

/// An event as the API serializes it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub venue: String,
    pub date: String,
    pub price_cents: i64,
    pub capacity: i32,
    pub created_at: String,
    pub updated_at: String,
}

const EVENT_COLUMNS: &str = r#"id, name, description, venue,
    to_char(date AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS date,
    price_cents, capacity,
    to_char(created_at AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at,
    to_char(updated_at AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS updated_at"#;

fn event_from_row(row: &PgRow) -> EventRecord {
    EventRecord {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        venue: row.get("venue"),
        date: row.get("date"),
        price_cents: row.get("price_cents"),
        capacity: row.get("capacity"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventBody {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    venue: String,
    /// RFC 3339 timestamp.
    date: String,
    #[serde(default)]
    price_cents: i64,
    #[serde(default)]
    capacity: i32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventBody {
    name: Option<String>,
    description: Option<String>,
    venue: Option<String>,
    date: Option<String>,
    price_cents: Option<i64>,
    capacity: Option<i32>,
}

/// `GET /api/events` — all events, soonest first.
pub async fn list_events(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<EventRecord>>>, ApiFailure> {
    let query = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY date ASC");
    let rows = sqlx::query(&query).fetch_all(&state.pool).await?;
    let events = rows.iter().map(event_from_row).collect();
    Ok(ApiResponse::ok("OK", events))
}

/// `GET /api/events/{id}` — one event.
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<EventRecord>>, ApiFailure> {
    let query = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
    let row = sqlx::query(&query)
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| ApiFailure::not_found("Event not found"))?;
    Ok(ApiResponse::ok("OK", event_from_row(&row)))
}

/// `POST /api/events` — create an event (admin only).
pub async fn create_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateEventBody>,
) -> Result<(StatusCode, Json<ApiResponse<EventRecord>>), ApiFailure> {
    auth.require_admin()?;
    if body.name.trim().is_empty() {
        return Err(ApiFailure::bad_request("Event name is required"));
    }

    let query = format!(
        r"INSERT INTO events (name, description, venue, date, price_cents, capacity)
          VALUES ($1, $2, $3, $4::timestamptz, $5, $6)
          RETURNING {EVENT_COLUMNS}"
    );
    let row = sqlx::query(&query)
        .bind(body.name.trim())
        .bind(&body.description)
        .bind(&body.venue)
        .bind(&body.date)
        .bind(body.price_cents)
        .bind(body.capacity)
        .fetch_one(&state.pool)
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::ok("Event created", event_from_row(&row))))
}

/// `PUT /api/events/{id}` — update an event (admin only); absent fields are
/// left unchanged.
pub async fn update_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateEventBody>,
) -> Result<Json<ApiResponse<EventRecord>>, ApiFailure> {
    auth.require_admin()?;

    let query = format!(
        r"UPDATE events SET
              name        = COALESCE($2, name),
              description = COALESCE($3, description),
              venue       = COALESCE($4, venue),
              date        = COALESCE($5::timestamptz, date),
              price_cents = COALESCE($6, price_cents),
              capacity    = COALESCE($7, capacity),
              updated_at  = now()
          WHERE id = $1
          RETURNING {EVENT_COLUMNS}"
    );
    let row = sqlx::query(&query)
        .bind(id)
        .bind(&body.name)
        .bind(&body.description)
        .bind(&body.venue)
        .bind(&body.date)
        .bind(body.price_cents)
        .bind(body.capacity)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| ApiFailure::not_found("Event not found"))?;

    Ok(ApiResponse::ok("Event updated", event_from_row(&row)))
}

/// `DELETE /api/events/{id}` — delete an event (admin only).
pub async fn delete_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiFailure> {
    auth.require_admin()?;

    let result = sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiFailure::not_found("Event not found"));
    }
    Ok(ApiResponse::ok_empty("Event deleted"))
}
