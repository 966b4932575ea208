//! Auth state controller — the single source of truth for the session.
//!
//! ARCHITECTURE
//! ============
//! The controller wraps the persisted snapshot store and the credential
//! service. All credential operations go through it; it keeps the snapshot
//! consistent with in-memory state and notifies subscribers after every
//! mutation (explicit observer list in place of UI-framework reactivity).
//!
//! CONCURRENCY
//! ===========
//! Mutating operations (`login`, `register`, `logout`, `update_profile`)
//! hold an internal async mutex for their full duration, so overlapping
//! calls queue FIFO and the session can never end up with an interleaved
//! `user`/`token` pair. `loading` is the only concurrency signal exposed.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::{Arc, PoisonError, RwLock};

use crate::net::api::{ApiError, CredentialService};
use crate::net::types::{ProfileUpdate, Role, User};
use crate::storage::{SnapshotStore, TOKEN_KEY, USER_KEY};

const LOGIN_FALLBACK: &str = "Login failed";
const REGISTER_FALLBACK: &str = "Registration failed";
const PROFILE_FALLBACK: &str = "Profile update failed";

/// Snapshot of the controller's observable state.
///
/// Derived values (`is_authenticated`, `is_admin`, `full_name`) are computed
/// on demand from the fields, never cached.
#[derive(Clone, Debug, Default)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

impl AuthState {
    /// Authenticated means both halves of the session are present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.role == Role::Admin)
    }

    /// Trimmed `"firstName lastName"`, falling back to the username when the
    /// profile carries no name parts. Empty when no user is present.
    #[must_use]
    pub fn full_name(&self) -> String {
        let Some(user) = &self.user else {
            return String::new();
        };
        let first = user.profile.first_name.as_deref().unwrap_or("");
        let last = user.profile.last_name.as_deref().unwrap_or("");
        let full = format!("{first} {last}").trim().to_owned();
        if full.is_empty() { user.username.clone() } else { full }
    }
}

/// Result of a credential operation, surfaced to the caller alongside the
/// state change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthOutcome {
    pub success: bool,
    pub message: String,
}

type Subscriber = Box<dyn Fn(&AuthState) + Send + Sync>;

/// Mediates all credential operations and owns the persisted snapshot.
///
/// Constructed once at startup with its collaborators injected; lives for
/// the process lifetime. Tests build fresh instances per case.
pub struct AuthController {
    state: RwLock<AuthState>,
    // Serializes mutating operations; see module docs.
    mutation_lock: tokio::sync::Mutex<()>,
    service: Arc<dyn CredentialService>,
    store: Arc<dyn SnapshotStore>,
    subscribers: RwLock<Vec<Subscriber>>,
}

impl AuthController {
    #[must_use]
    pub fn new(service: Arc<dyn CredentialService>, store: Arc<dyn SnapshotStore>) -> Self {
        Self {
            state: RwLock::new(AuthState::default()),
            mutation_lock: tokio::sync::Mutex::new(()),
            service,
            store,
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Current state, cloned.
    #[must_use]
    pub fn snapshot(&self) -> AuthState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Register a callback invoked with a state snapshot after every
    /// mutation.
    pub fn subscribe(&self, callback: impl Fn(&AuthState) + Send + Sync + 'static) {
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(callback));
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.snapshot().is_authenticated()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.snapshot().is_admin()
    }

    /// Whether anything is cached in memory; the route guard uses this to
    /// decide when to lazily hydrate from the snapshot.
    #[must_use]
    pub fn has_cached_session(&self) -> bool {
        let state = self.snapshot();
        state.user.is_some() || state.token.is_some()
    }

    /// Authenticate with email and password.
    ///
    /// On success the session is set and persisted; on failure the previous
    /// `user`/`token` are left untouched and `error` carries the server
    /// message (or `"Login failed"`). `loading` is cleared on every path.
    pub async fn login(&self, email: &str, password: &str) -> AuthOutcome {
        let _serialized = self.mutation_lock.lock().await;
        self.mutate(|s| {
            s.loading = true;
            s.error = None;
        });
        let outcome = match self.service.login(email, password).await {
            Ok(granted) => {
                self.store_session(granted.user, granted.token);
                AuthOutcome { success: true, message: granted.message }
            }
            Err(error) => self.fail(&error, LOGIN_FALLBACK),
        };
        self.mutate(|s| s.loading = false);
        outcome
    }

    /// Create a new account. Same contract as [`Self::login`].
    pub async fn register(&self, username: &str, email: &str, password: &str) -> AuthOutcome {
        let _serialized = self.mutation_lock.lock().await;
        self.mutate(|s| {
            s.loading = true;
            s.error = None;
        });
        let outcome = match self.service.register(username, email, password).await {
            Ok(granted) => {
                self.store_session(granted.user, granted.token);
                AuthOutcome { success: true, message: granted.message }
            }
            Err(error) => self.fail(&error, REGISTER_FALLBACK),
        };
        self.mutate(|s| s.loading = false);
        outcome
    }

    /// Tear down the session. The remote notification is best-effort: its
    /// failure is logged and ignored, and the local session is cleared
    /// unconditionally.
    pub async fn logout(&self) {
        let _serialized = self.mutation_lock.lock().await;
        if let Some(token) = self.snapshot().token {
            if let Err(error) = self.service.logout(&token).await {
                tracing::debug!(%error, "logout notification failed; clearing session anyway");
            }
        }
        self.clear_session();
    }

    /// Hydrate the session from the persisted snapshot.
    ///
    /// Runs once per controller in practice (the route guard calls it
    /// lazily). A token with an unparseable user record, or one key without
    /// the other, is corruption: the state and the snapshot are fully
    /// cleared, observably identical to [`Self::logout`]. No remote call is
    /// made — there is no trusted session to notify about.
    pub fn initialize_auth(&self) {
        let token = self.store.get(TOKEN_KEY);
        let raw_user = self.store.get(USER_KEY);
        match (token, raw_user) {
            (Some(token), Some(raw_user)) => match serde_json::from_str::<User>(&raw_user) {
                Ok(user) => self.mutate(|s| {
                    s.token = Some(token);
                    s.user = Some(user);
                }),
                Err(error) => {
                    tracing::warn!(%error, "stored user record is corrupt; resetting session");
                    self.clear_session();
                }
            },
            (None, None) => {}
            _ => {
                tracing::warn!("persisted snapshot holds half a session; resetting");
                self.clear_session();
            }
        }
    }

    /// Update profile fields on the server and refresh the cached user.
    ///
    /// Requires an active session. On success only the snapshot's `user`
    /// key is rewritten; the token is untouched. On failure only `error`
    /// changes.
    pub async fn update_profile(&self, fields: &ProfileUpdate) -> AuthOutcome {
        let _serialized = self.mutation_lock.lock().await;
        let Some(token) = self.snapshot().token else {
            return self.fail(&ApiError::Server("Not authenticated".to_owned()), PROFILE_FALLBACK);
        };
        self.mutate(|s| {
            s.loading = true;
            s.error = None;
        });
        let outcome = match self.service.update_profile(&token, fields).await {
            Ok(updated) => {
                self.persist_user(&updated.user);
                self.mutate(|s| s.user = Some(updated.user));
                AuthOutcome { success: true, message: updated.message }
            }
            Err(error) => self.fail(&error, PROFILE_FALLBACK),
        };
        self.mutate(|s| s.loading = false);
        outcome
    }

    fn store_session(&self, user: User, token: String) {
        self.store.set(TOKEN_KEY, &token);
        self.persist_user(&user);
        self.mutate(|s| {
            s.user = Some(user);
            s.token = Some(token);
        });
    }

    fn persist_user(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(rendered) => self.store.set(USER_KEY, &rendered),
            Err(error) => {
                tracing::warn!(%error, "user record serialization failed; snapshot not updated");
            }
        }
    }

    fn clear_session(&self) {
        self.store.remove(TOKEN_KEY);
        self.store.remove(USER_KEY);
        self.mutate(|s| {
            s.user = None;
            s.token = None;
            s.error = None;
        });
    }

    fn fail(&self, error: &ApiError, fallback: &str) -> AuthOutcome {
        let message = match error {
            ApiError::Server(message) if !message.is_empty() => message.clone(),
            _ => fallback.to_owned(),
        };
        self.mutate(|s| s.error = Some(message.clone()));
        AuthOutcome { success: false, message }
    }

    fn mutate(&self, apply: impl FnOnce(&mut AuthState)) {
        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            apply(&mut state);
        }
        self.notify();
    }

    fn notify(&self) {
        let snapshot = self.snapshot();
        let subscribers = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        for subscriber in subscribers.iter() {
            subscriber(&snapshot);
        }
    }
}
