//! Session management and the user wire record.
//!
//! ARCHITECTURE
//! ============
//! HTTP auth uses long-lived opaque session tokens stored server-side, sent
//! by clients as a bearer header. Validation joins the user row so handlers
//! get the full record in one query. Expired rows are simply never matched;
//! logout deletes the row, making tokens single-lifecycle.

use std::fmt::Write;

use rand::Rng;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex session token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// Optional profile fields nested in the user wire record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// User record as the API serializes it (camelCase, RFC 3339 timestamps).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    pub profile: ProfileRecord,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl UserRecord {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Column list producing the fields [`user_from_row`] expects. Interpolated
/// into `SELECT`/`RETURNING` clauses so every query yields the same shape.
pub(crate) const USER_COLUMNS: &str =
    r#"id, username, email, role, first_name, last_name, phone, is_active,
    to_char(created_at AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at,
    to_char(updated_at AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS updated_at"#;

/// Map a row selected through [`USER_COLUMNS`] to the wire record.
pub(crate) fn user_from_row(row: &PgRow) -> UserRecord {
    UserRecord {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        role: row.get("role"),
        profile: ProfileRecord {
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            phone: row.get("phone"),
        },
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Create a session for the given user, returning the token.
pub async fn create_session(pool: &PgPool, user_id: Uuid) -> Result<String, sqlx::Error> {
    let token = generate_token();
    sqlx::query("INSERT INTO sessions (token, user_id) VALUES ($1, $2)")
        .bind(&token)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(token)
}

/// Validate a session token and return the associated user, if the session
/// is live and the account active.
pub async fn validate_session(
    pool: &PgPool,
    token: &str,
) -> Result<Option<UserRecord>, sqlx::Error> {
    let query = format!(
        r"SELECT {USER_COLUMNS}
          FROM users
          WHERE is_active AND id = (
              SELECT user_id FROM sessions
              WHERE token = $1 AND expires_at > now()
          )"
    );
    let row = sqlx::query(&query).bind(token).fetch_optional(pool).await?;
    Ok(row.as_ref().map(user_from_row))
}

/// Delete a session by token. Idempotent.
pub async fn delete_session(pool: &PgPool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
