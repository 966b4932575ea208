//! Ticket routes — booking, listing, cancellation for the current user.
//!
//! Capacity is informational only; overbooking control is deliberately out
//! of scope.

#[cfg(test)]
#[path = "tickets_test.rs"]
mod tests;

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

/// A ticket as the API serializes it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketRecord {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub quantity: i32,
    pub status: String,
    pub created_at: String,
}

const TICKET_COLUMNS: &str = r#"id, event_id, user_id, quantity, status,
    to_char(created_at AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at"#;

fn ticket_from_row(row: &PgRow) -> TicketRecord {
    TicketRecord {
        id: row.get("id"),
        event_id: row.get("event_id"),
        user_id: row.get("user_id"),
        quantity: row.get("quantity"),
        status: row.get("status"),
        created_at: row.get("created_at"),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookTicketBody {
    event_id: Uuid,
    #[serde(default = "default_quantity")]
    quantity: i32,
}

const fn default_quantity() -> i32 {
    1
}

pub(crate) fn validate_quantity(quantity: i32) -> Result<(), ApiFailure> {
    if quantity > 0 {
        Ok(())
    } else {
        Err(ApiFailure::bad_request("Quantity must be positive"))
    }
}

/// `POST /api/tickets` — book seats for an event.
pub async fn book_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<BookTicketBody>,
) -> Result<(StatusCode, Json<ApiResponse<TicketRecord>>), ApiFailure> {
    validate_quantity(body.quantity)?;

    let event_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM events WHERE id = $1)")
        .bind(body.event_id)
        .fetch_one(&state.pool)
        .await?;
    if !event_exists {
        return Err(ApiFailure::not_found("Event not found"));
    }

    let query = format!(
        r"INSERT INTO tickets (event_id, user_id, quantity)
          VALUES ($1, $2, $3)
          RETURNING {TICKET_COLUMNS}"
    );
    let row = sqlx::query(&query)
        .bind(body.event_id)
        .bind(auth.user.id)
        .bind(body.quantity)
        .fetch_one(&state.pool)
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::ok("Ticket booked", ticket_from_row(&row))))
}

/// `GET /api/tickets` — the current user's tickets, newest first.
pub async fn list_tickets(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<TicketRecord>>>, ApiFailure> {
    let query = format!(
        "SELECT {TICKET_COLUMNS} FROM tickets WHERE user_id = $1 ORDER BY created_at DESC"
    );
    let rows = sqlx::query(&query)
        .bind(auth.user.id)
        .fetch_all(&state.pool)
        .await?;
    let tickets = rows.iter().map(ticket_from_row).collect();
    Ok(ApiResponse::ok("OK", tickets))
}

/// `DELETE /api/tickets/{id}` — cancel one of the current user's booked
/// tickets.
pub async fn cancel_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiFailure> {
    let result = sqlx::query(
        r"UPDATE tickets SET status = 'cancelled'
          WHERE id = $1 AND user_id = $2 AND status = 'booked'",
    )
    .bind(id)
    .bind(auth.user.id)
    .execute(&state.pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiFailure::not_found("Ticket not found"));
    }
    Ok(ApiResponse::ok_empty("Ticket cancelled"))
}
