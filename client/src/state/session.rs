//! Session manager: the single authority over authentication state.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route guards and user-aware components read derived state (authenticated?,
//! role flags) from snapshots; the authenticated REST client consults it for
//! the current access token and asks it to refresh after a 401. All mutation
//! of session state happens here.
//!
//! CONCURRENCY
//! ===========
//! The client is single-threaded and cooperative: operations suspend only at
//! HTTP await points. The single-flight guarantee for `refresh()` therefore
//! needs no lock — the in-flight handle is installed in the same turn as the
//! decision to start, before the first await, so a second caller can only
//! ever observe and join it.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::RefCell;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};

use crate::net::error::{ApiError, classify_response, decode_data};
use crate::net::transport::{ApiRequest, AuthTransport};
use crate::net::types::{AuthPayload, Credentials, RegisterData, Role, TokenPair, User};
use crate::util::token_store::TokenStore;

/// Where the session is in its process lifecycle. Transitions are monotonic:
/// `Unstarted → Initializing → Ready`. Logout does not leave `Ready`;
/// subsequent sign-ins go through `login()`, not `initialize()`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LifecyclePhase {
    #[default]
    Unstarted,
    Initializing,
    Ready,
}

#[derive(Debug, Default)]
struct SessionState {
    access_token: Option<String>,
    user: Option<User>,
    phase: LifecyclePhase,
    /// Bumped by every sign-in/sign-out so a refresh that was in flight
    /// across the change cannot commit a stale token pair afterwards.
    generation: u64,
}

/// Read-only copy of the session for reactive consumers.
///
/// `authenticated` means "an access token is held". Right after a refresh
/// and before the profile fetch completes, `user` may still be `None`;
/// readers must tolerate that window.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionSnapshot {
    pub user: Option<User>,
    pub authenticated: bool,
    pub phase: LifecyclePhase,
}

type RefreshHandle = Shared<LocalBoxFuture<'static, Result<(), ApiError>>>;

/// Cheaply cloneable handle to the session service. Constructed once at app
/// startup and handed to consumers explicitly — no ambient global.
pub struct SessionManager<T, S> {
    transport: Rc<T>,
    store: Rc<S>,
    state: Rc<RefCell<SessionState>>,
    refresh_in_flight: Rc<RefCell<Option<RefreshHandle>>>,
}

impl<T, S> Clone for SessionManager<T, S> {
    fn clone(&self) -> Self {
        Self {
            transport: Rc::clone(&self.transport),
            store: Rc::clone(&self.store),
            state: Rc::clone(&self.state),
            refresh_in_flight: Rc::clone(&self.refresh_in_flight),
        }
    }
}

impl<T, S> SessionManager<T, S>
where
    T: AuthTransport + 'static,
    S: TokenStore + 'static,
{
    #[must_use]
    pub fn new(transport: T, store: S) -> Self {
        Self {
            transport: Rc::new(transport),
            store: Rc::new(store),
            state: Rc::new(RefCell::new(SessionState::default())),
            refresh_in_flight: Rc::new(RefCell::new(None)),
        }
    }

    pub(crate) fn transport(&self) -> Rc<T> {
        Rc::clone(&self.transport)
    }

    // =========================================================================
    // READS
    // =========================================================================

    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.state.borrow().access_token.clone()
    }

    /// Defined as "an access token is held", not "a profile is loaded".
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().access_token.is_some()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    #[must_use]
    pub fn phase(&self) -> LifecyclePhase {
        self.state.borrow().phase
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.state.borrow().user.as_ref().is_some_and(|u| u.role.is_admin())
    }

    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.state.borrow().user.as_ref().is_some_and(|u| u.role == Role::SuperAdmin)
    }

    #[must_use]
    pub fn has_refresh_token(&self) -> bool {
        self.store.load().is_some()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.borrow();
        SessionSnapshot {
            user: state.user.clone(),
            authenticated: state.access_token.is_some(),
            phase: state.phase,
        }
    }

    /// Profile-edit side channel: replace the user snapshot wholesale.
    pub fn set_user(&self, user: User) {
        self.state.borrow_mut().user = Some(user);
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Restore a session from the persisted refresh token, once per process.
    ///
    /// Idempotent: the phase flips to `Initializing` before the first await,
    /// so concurrent callers and callers after `Ready` return immediately
    /// without a second network sequence. Every path ends in `Ready` — a
    /// failed restore clears the session rather than blocking startup. In a
    /// server-rendering context the store is empty and this is a no-op.
    pub async fn initialize(&self) {
        {
            let mut state = self.state.borrow_mut();
            if state.phase != LifecyclePhase::Unstarted {
                return;
            }
            state.phase = LifecyclePhase::Initializing;
        }

        if self.store.load().is_none() {
            self.finish_initialize(None);
            return;
        }

        match self.refresh().await {
            Ok(()) => match self.fetch_profile().await {
                Ok(user) => self.finish_initialize(Some(user)),
                Err(err) => {
                    log_warn(&format!("session restore: profile fetch failed: {err}"));
                    self.abort_initialize();
                }
            },
            Err(err) => {
                log_warn(&format!("session restore: refresh failed: {err}"));
                self.abort_initialize();
            }
        }
    }

    /// Commit the restore outcome unless a login finished meanwhile — a user
    /// actively authenticating supersedes passive session restoration.
    fn finish_initialize(&self, user: Option<User>) {
        let mut state = self.state.borrow_mut();
        if state.phase != LifecyclePhase::Initializing {
            return;
        }
        if let Some(user) = user {
            state.user = Some(user);
        }
        state.phase = LifecyclePhase::Ready;
    }

    /// Failed restore: clear everything as if logged out, but never leave the
    /// phase stuck in `Initializing`.
    fn abort_initialize(&self) {
        {
            let mut state = self.state.borrow_mut();
            if state.phase != LifecyclePhase::Initializing {
                return;
            }
            state.access_token = None;
            state.user = None;
            state.generation += 1;
            state.phase = LifecyclePhase::Ready;
        }
        self.store.clear();
    }

    // =========================================================================
    // AUTH OPERATIONS
    // =========================================================================

    /// Sign in with email + password. Success commits the full auth payload
    /// atomically; failure leaves prior session state untouched.
    ///
    /// # Errors
    ///
    /// The classified backend failure, unmodified.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let body = serde_json::json!({
            "email": credentials.email,
            "password": credentials.password,
        });
        let resp = self
            .transport
            .send(ApiRequest::new("POST", "/api/auth/login").with_json(body))
            .await?;
        if !resp.ok() {
            return Err(classify_response(resp.status, &resp.body));
        }
        let payload: AuthPayload = decode_data(&resp.body)?;
        self.commit_auth(payload);
        Ok(())
    }

    /// Create an account; the backend returns a full auth payload, so a
    /// successful registration signs the user in.
    ///
    /// # Errors
    ///
    /// The classified backend failure, unmodified.
    pub async fn register(&self, data: &RegisterData) -> Result<(), ApiError> {
        let body = serde_json::json!({
            "username": data.username,
            "email": data.email,
            "password": data.password,
            "full_name": data.full_name,
        });
        let resp = self
            .transport
            .send(ApiRequest::new("POST", "/api/auth/register").with_json(body))
            .await?;
        if !resp.ok() {
            return Err(classify_response(resp.status, &resp.body));
        }
        let payload: AuthPayload = decode_data(&resp.body)?;
        self.commit_auth(payload);
        Ok(())
    }

    fn commit_auth(&self, payload: AuthPayload) {
        {
            let mut state = self.state.borrow_mut();
            state.access_token = Some(payload.tokens.access_token.clone());
            state.user = Some(payload.user);
            state.generation += 1;
            // An active sign-in always wins over a concurrent restore.
            state.phase = LifecyclePhase::Ready;
        }
        self.store.save(&payload.tokens.refresh_token);
    }

    /// Mint a new access token from the persisted refresh token.
    ///
    /// Single-flight: while one refresh is in flight, every further caller
    /// joins it and observes the same outcome instead of issuing a second
    /// HTTP call. The in-flight handle is cleared when the attempt settles,
    /// success or failure, so the next caller starts fresh.
    ///
    /// # Errors
    ///
    /// [`ApiError::NoRefreshToken`] when nothing is persisted; otherwise the
    /// classified backend failure. Failure does not mutate session state —
    /// whether it kills the session is the caller's decision.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let handle = {
            let mut in_flight = self.refresh_in_flight.borrow_mut();
            if let Some(handle) = in_flight.as_ref() {
                handle.clone()
            } else {
                let Some(refresh_token) = self.store.load() else {
                    return Err(ApiError::NoRefreshToken);
                };
                let transport = Rc::clone(&self.transport);
                let store = Rc::clone(&self.store);
                let state = Rc::clone(&self.state);
                let slot = Rc::clone(&self.refresh_in_flight);
                let fut: LocalBoxFuture<'static, Result<(), ApiError>> = async move {
                    let result = run_refresh(&*transport, &*store, &state, refresh_token).await;
                    // Cleared on every outcome, even a transport-level error,
                    // so a later caller can start a fresh attempt.
                    slot.borrow_mut().take();
                    result
                }
                .boxed_local();
                let shared = fut.shared();
                *in_flight = Some(shared.clone());
                shared
            }
        };
        handle.await
    }

    /// Sign out: best-effort server-side revocation, then unconditional local
    /// cleanup. The local session is gone when this returns, no matter how
    /// the revocation call settled.
    pub async fn logout(&self) {
        if let Some(refresh_token) = self.store.load() {
            let body = serde_json::json!({ "refresh_token": refresh_token });
            match self
                .transport
                .send(ApiRequest::new("POST", "/api/auth/logout").with_json(body))
                .await
            {
                Ok(resp) if !resp.ok() => {
                    log_warn(&format!("logout revocation returned {}", resp.status));
                }
                Err(err) => log_warn(&format!("logout revocation failed: {err}")),
                Ok(_) => {}
            }
        }
        self.clear_local();
    }

    /// Drop all local session state without notifying the backend. Used when
    /// the backend has already rejected the session's credentials, so there
    /// is nothing left to revoke.
    pub fn force_logout(&self) {
        self.clear_local();
    }

    fn clear_local(&self) {
        {
            let mut state = self.state.borrow_mut();
            state.access_token = None;
            state.user = None;
            state.generation += 1;
            // The phase stays as-is: logout never re-enters initialization.
        }
        self.store.clear();
    }

    async fn fetch_profile(&self) -> Result<User, ApiError> {
        let token = self.access_token();
        let resp = self
            .transport
            .send(ApiRequest::new("GET", "/api/profile").with_bearer(token))
            .await?;
        if !resp.ok() {
            return Err(classify_response(resp.status, &resp.body));
        }
        decode_data(&resp.body)
    }
}

/// The actual refresh attempt, detached from `&self` so the shared future is
/// `'static`. Success replaces both the in-memory access token and the
/// persisted refresh token together: the backend rotates the refresh token on
/// every use, so keeping the old one would replay a dead credential and lock
/// the account out.
async fn run_refresh<T: AuthTransport, S: TokenStore>(
    transport: &T,
    store: &S,
    state: &RefCell<SessionState>,
    refresh_token: String,
) -> Result<(), ApiError> {
    let generation = state.borrow().generation;
    let body = serde_json::json!({ "refresh_token": refresh_token });
    let resp = transport
        .send(ApiRequest::new("POST", "/api/auth/refresh").with_json(body))
        .await?;
    if !resp.ok() {
        return Err(classify_response(resp.status, &resp.body));
    }
    let pair: TokenPair = decode_data(&resp.body)?;
    {
        let mut current = state.borrow_mut();
        if current.generation != generation {
            // A sign-in or sign-out landed while this call was in flight;
            // its state supersedes this result.
            return Ok(());
        }
        current.access_token = Some(pair.access_token);
    }
    store.save(&pair.refresh_token);
    Ok(())
}

fn log_warn(message: &str) {
    #[cfg(feature = "hydrate")]
    log::warn!("{message}");
    #[cfg(not(feature = "hydrate"))]
    let _ = message;
}
