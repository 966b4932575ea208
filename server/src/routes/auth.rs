//! Auth routes — registration, login, session teardown, profile.

use axum::extract::{FromRef, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::Json;
use serde::{Deserialize, Serialize};
use sqlx::Row;

use super::{ApiFailure, ApiResponse};
use crate::services::password;
use crate::services::session::{self, USER_COLUMNS, UserRecord, user_from_row};
use crate::state::AppState;

const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 6;
const BAD_CREDENTIALS: &str = "Invalid email or password";

/// Extract the token from an `Authorization: Bearer <token>` header.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}

/// Lowercase and shape-check an email address.
pub(crate) fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    if normalized.is_empty() || !normalized.contains('@') {
        return None;
    }
    let parts = normalized.split('@').collect::<Vec<_>>();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return None;
    }
    Some(normalized)
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated user resolved from the bearer token.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: UserRecord,
    pub token: String,
}

impl AuthUser {
    pub(crate) fn require_admin(&self) -> Result<(), ApiFailure> {
        if self.user.is_admin() {
            Ok(())
        } else {
            Err(ApiFailure::forbidden("Admin access required"))
        }
    }
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiFailure;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            return Err(ApiFailure::unauthorized("Authentication required"));
        };

        let app_state = AppState::from_ref(state);
        let user = session::validate_session(&app_state.pool, token)
            .await?
            .ok_or_else(|| ApiFailure::unauthorized("Invalid or expired session"))?;

        Ok(Self { user, token: token.to_owned() })
    }
}

// =============================================================================
// PAYLOADS
// =============================================================================

#[derive(Serialize)]
pub struct AuthPayload {
    pub user: UserRecord,
    pub token: String,
}

#[derive(Serialize)]
pub struct UserPayload {
    pub user: UserRecord,
}

#[derive(Deserialize)]
pub struct RegisterBody {
    username: String,
    email: String,
    password: String,
}

#[derive(Deserialize)]
pub struct LoginBody {
    email: String,
    password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileBody {
    first_name: Option<String>,
    last_name: Option<String>,
    phone: Option<String>,
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/auth/register` — create an account and open a session.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<ApiResponse<AuthPayload>>), ApiFailure> {
    let username = body.username.trim().to_owned();
    if username.len() < MIN_USERNAME_LEN {
        return Err(ApiFailure::bad_request("Username must be at least 3 characters"));
    }
    let Some(email) = normalize_email(&body.email) else {
        return Err(ApiFailure::bad_request("Invalid email address"));
    };
    if body.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiFailure::bad_request("Password must be at least 6 characters"));
    }

    let password_hash = password::hash_password(&body.password);
    let query = format!(
        r"INSERT INTO users (username, email, password_hash)
          VALUES ($1, $2, $3)
          RETURNING {USER_COLUMNS}"
    );
    let row = match sqlx::query(&query)
        .bind(&username)
        .bind(&email)
        .bind(&password_hash)
        .fetch_one(&state.pool)
        .await
    {
        Ok(row) => row,
        Err(sqlx::Error::Database(db_error))
            if db_error.constraint() == Some("users_email_key") =>
        {
            return Err(ApiFailure::conflict("Email already registered"));
        }
        Err(sqlx::Error::Database(db_error))
            if db_error.constraint() == Some("users_username_key") =>
        {
            return Err(ApiFailure::conflict("Username already taken"));
        }
        Err(error) => return Err(error.into()),
    };

    let user = user_from_row(&row);
    let token = session::create_session(&state.pool, user.id).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok("Registration successful", AuthPayload { user, token }),
    ))
}

/// `POST /api/auth/login` — validate credentials and open a session.
///
/// Unknown email and wrong password collapse into one message so the
/// endpoint does not leak which addresses exist.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<ApiResponse<AuthPayload>>, ApiFailure> {
    let Some(email) = normalize_email(&body.email) else {
        return Err(ApiFailure::unauthorized(BAD_CREDENTIALS));
    };

    let query = format!("SELECT password_hash, {USER_COLUMNS} FROM users WHERE email = $1");
    let Some(row) = sqlx::query(&query)
        .bind(&email)
        .fetch_optional(&state.pool)
        .await?
    else {
        return Err(ApiFailure::unauthorized(BAD_CREDENTIALS));
    };

    let stored: String = row.get("password_hash");
    if !password::verify_password(&body.password, &stored) {
        return Err(ApiFailure::unauthorized(BAD_CREDENTIALS));
    }

    let user = user_from_row(&row);
    if !user.is_active {
        return Err(ApiFailure::forbidden("Account is deactivated"));
    }

    let token = session::create_session(&state.pool, user.id).await?;
    Ok(ApiResponse::ok("Login successful", AuthPayload { user, token }))
}

/// `POST /api/auth/logout` — delete the session. Idempotent.
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiFailure> {
    session::delete_session(&state.pool, &auth.token).await?;
    Ok(ApiResponse::ok_empty("Logged out"))
}

/// `GET /api/auth/me` — return the current user.
pub async fn me(auth: AuthUser) -> Json<ApiResponse<UserPayload>> {
    ApiResponse::ok("OK", UserPayload { user: auth.user })
}

/// `PUT /api/auth/profile` — update profile fields; absent fields are left
/// unchanged.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ProfileBody>,
) -> Result<Json<ApiResponse<UserPayload>>, ApiFailure> {
    let query = format!(
        r"UPDATE users SET
              first_name = COALESCE($2, first_name),
              last_name  = COALESCE($3, last_name),
              phone      = COALESCE($4, phone),
              updated_at = now()
          WHERE id = $1
          RETURNING {USER_COLUMNS}"
    );
    let row = sqlx::query(&query)
        .bind(auth.user.id)
        .bind(&body.first_name)
        .bind(&body.last_name)
        .bind(&body.phone)
        .fetch_one(&state.pool)
        .await?;

    Ok(ApiResponse::ok("Profile updated", UserPayload { user: user_from_row(&row) }))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
