//! Credential-service client.
//!
//! ERROR HANDLING
//! ==============
//! Every remote failure collapses into [`ApiError`]: `Server` carries a
//! message the server chose to show the user, `Network` covers transport
//! faults, timeouts, and unparseable bodies. The auth controller turns
//! `Network` into a per-operation generic message, so callers never see raw
//! transport errors.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::types::{
    AuthData, Envelope, EventRecord, ProfileData, ProfileUpdate, TicketRecord, User,
};

/// Request timeout applied to every credential-service call. A timeout is
/// reported as a network failure.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Failure of a remote call, already split the way the UI needs it.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a user-facing message (`success: false` or
    /// an error status carrying the response envelope).
    #[error("{0}")]
    Server(String),
    /// Transport-level failure: connection error, timeout, or a body that
    /// does not parse as the expected envelope.
    #[error("network error: {0}")]
    Network(String),
}

/// Successful login/registration: the envelope message plus session payload.
#[derive(Clone, Debug)]
pub struct Authenticated {
    pub message: String,
    pub user: User,
    pub token: String,
}

/// Successful profile update: the envelope message plus the updated record.
#[derive(Clone, Debug)]
pub struct ProfileUpdated {
    pub message: String,
    pub user: User,
}

/// The external authority that validates credentials and issues tokens.
///
/// The auth controller only ever talks to this trait; tests substitute an
/// in-memory fake.
#[async_trait]
pub trait CredentialService: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<Authenticated, ApiError>;

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Authenticated, ApiError>;

    /// Invalidate the session server-side. Callers treat failure as
    /// non-fatal; the local session is torn down regardless.
    async fn logout(&self, token: &str) -> Result<(), ApiError>;

    async fn update_profile(
        &self,
        token: &str,
        fields: &ProfileUpdate,
    ) -> Result<ProfileUpdated, ApiError>;
}

/// HTTP implementation of [`CredentialService`] plus the event/ticket calls
/// used by the CLI shell.
pub struct HttpApi {
    base_url: String,
    http: reqwest::Client,
}

impl HttpApi {
    /// Build a client for the given server base URL (e.g.
    /// `http://127.0.0.1:3000`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the underlying HTTP client cannot be
    /// constructed (TLS backend initialization failure).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self { base_url: normalize_base_url(base_url.into()), http })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send a request and unwrap the `{success, message, data}` envelope.
    async fn envelope<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<(String, T), ApiError> {
        let (message, data) = self.envelope_opt::<T>(request).await?;
        let data = data
            .ok_or_else(|| ApiError::Network("response envelope has no data".to_owned()))?;
        Ok((message, data))
    }

    /// Like [`Self::envelope`] but tolerates an absent `data` payload.
    async fn envelope_opt<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<(String, Option<T>), ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        // Error statuses still carry the envelope; prefer its message over
        // a synthetic one so the UI shows what the server intended.
        let Ok(envelope) = serde_json::from_str::<Envelope<T>>(&body) else {
            return Err(ApiError::Network(format!("unexpected response ({status})")));
        };
        if !envelope.success {
            return Err(ApiError::Server(envelope.message));
        }
        Ok((envelope.message, envelope.data))
    }

    fn bearer(request: reqwest::RequestBuilder, token: &str) -> reqwest::RequestBuilder {
        request.header(reqwest::header::AUTHORIZATION, format!("Bearer {token}"))
    }

    // -------------------------------------------------------------------------
    // Events and tickets (CLI browsing/booking; not part of the auth flow)
    // -------------------------------------------------------------------------

    /// Fetch all events, soonest first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a server-side rejection.
    pub async fn list_events(&self) -> Result<Vec<EventRecord>, ApiError> {
        let (_, events) = self
            .envelope::<Vec<EventRecord>>(self.http.get(self.endpoint("/api/events")))
            .await?;
        Ok(events)
    }

    /// Fetch a single event by ID.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or if the event is unknown.
    pub async fn get_event(&self, id: uuid::Uuid) -> Result<EventRecord, ApiError> {
        let (_, event) = self
            .envelope::<EventRecord>(self.http.get(self.endpoint(&format!("/api/events/{id}"))))
            .await?;
        Ok(event)
    }

    /// Book `quantity` seats for an event.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a server-side rejection.
    pub async fn book_ticket(
        &self,
        token: &str,
        event_id: uuid::Uuid,
        quantity: i32,
    ) -> Result<(String, TicketRecord), ApiError> {
        let request = Self::bearer(self.http.post(self.endpoint("/api/tickets")), token)
            .json(&serde_json::json!({ "eventId": event_id, "quantity": quantity }));
        self.envelope::<TicketRecord>(request).await
    }

    /// List the current user's tickets.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a server-side rejection.
    pub async fn my_tickets(&self, token: &str) -> Result<Vec<TicketRecord>, ApiError> {
        let request = Self::bearer(self.http.get(self.endpoint("/api/tickets")), token);
        let (_, tickets) = self.envelope::<Vec<TicketRecord>>(request).await?;
        Ok(tickets)
    }

    /// Cancel one of the current user's tickets.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a server-side rejection.
    pub async fn cancel_ticket(&self, token: &str, id: uuid::Uuid) -> Result<String, ApiError> {
        let request =
            Self::bearer(self.http.delete(self.endpoint(&format!("/api/tickets/{id}"))), token);
        let (message, _) = self.envelope_opt::<serde_json::Value>(request).await?;
        Ok(message)
    }
}

#[async_trait]
impl CredentialService for HttpApi {
    async fn login(&self, email: &str, password: &str) -> Result<Authenticated, ApiError> {
        let request = self
            .http
            .post(self.endpoint("/api/auth/login"))
            .json(&LoginBody { email, password });
        let (message, data) = self.envelope::<AuthData>(request).await?;
        Ok(Authenticated { message, user: data.user, token: data.token })
    }

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Authenticated, ApiError> {
        let request = self
            .http
            .post(self.endpoint("/api/auth/register"))
            .json(&RegisterBody { username, email, password });
        let (message, data) = self.envelope::<AuthData>(request).await?;
        Ok(Authenticated { message, user: data.user, token: data.token })
    }

    async fn logout(&self, token: &str) -> Result<(), ApiError> {
        let request = Self::bearer(self.http.post(self.endpoint("/api/auth/logout")), token);
        self.envelope_opt::<serde_json::Value>(request).await?;
        Ok(())
    }

    async fn update_profile(
        &self,
        token: &str,
        fields: &ProfileUpdate,
    ) -> Result<ProfileUpdated, ApiError> {
        let request =
            Self::bearer(self.http.put(self.endpoint("/api/auth/profile")), token).json(fields);
        let (message, data) = self.envelope::<ProfileData>(request).await?;
        Ok(ProfileUpdated { message, user: data.user })
    }
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

fn normalize_base_url(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

// =============================================================================
// TEST SUPPORT
// =============================================================================
