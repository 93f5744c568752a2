// ── Session manager ──
//
// Owns the bearer credential and the current user. Restores a session
// from the persisted credential, signs in and out, and vends the
// `RequestContext` every other component sends requests with.
//
// State machine:
//   Unknown -> Restoring -> Authenticated(user) | Anonymous
//   Authenticated -> Anonymous only through `sign_out()`

mod store;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwapOption;
use shopdash_api::{Credential, RequestContext, ResourceClient, User};
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::stream::StateStream;

pub use store::{CredentialStore, MemoryCredentialStore};

/// Session state observable by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing has been checked yet.
    Unknown,
    /// A restore or sign-in is in flight.
    Restoring,
    Authenticated(Arc<User>),
    Anonymous,
}

impl SessionState {
    pub fn user(&self) -> Option<&Arc<User>> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Session manager. Cheaply cloneable via `Arc<SessionInner>`.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    client: ResourceClient,
    store: Arc<dyn CredentialStore>,
    /// Credential attached to outgoing requests. Written only here.
    credential: ArcSwapOption<Credential>,
    state: watch::Sender<SessionState>,
    /// Serializes restore / sign-in / sign-out so at most one runs.
    flight: Mutex<()>,
    /// Bumped each time a guarded operation completes. Waiters compare
    /// it to detect that someone else already did the work.
    epoch: AtomicU64,
    last_error: ArcSwapOption<CoreError>,
}

impl Session {
    pub fn new(client: ResourceClient, store: Arc<dyn CredentialStore>) -> Self {
        let (state, _) = watch::channel(SessionState::Unknown);
        Self {
            inner: Arc::new(SessionInner {
                client,
                store,
                credential: ArcSwapOption::empty(),
                state,
                flight: Mutex::new(()),
                epoch: AtomicU64::new(0),
                last_error: ArcSwapOption::empty(),
            }),
        }
    }

    // ── Observation ──────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn user(&self) -> Option<Arc<User>> {
        self.state().user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(*self.inner.state.borrow(), SessionState::Authenticated(_))
    }

    pub fn subscribe(&self) -> StateStream<SessionState> {
        StateStream::new(self.inner.state.subscribe())
    }

    /// Why the last restore or sign-in failed, if it did.
    pub fn last_error(&self) -> Option<Arc<CoreError>> {
        self.inner.last_error.load_full()
    }

    /// Request context carrying the current credential, if any.
    pub fn context(&self) -> RequestContext {
        self.inner
            .credential
            .load_full()
            .map_or_else(RequestContext::anonymous, |c| {
                RequestContext::with_credential((*c).clone())
            })
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Re-establish the session from the persisted credential.
    ///
    /// Never fails: every outcome ends in `Authenticated` or `Anonymous`,
    /// with the cause of a failure available from [`last_error`](Self::last_error).
    pub async fn restore(&self) -> SessionState {
        let _flight = self.inner.flight.lock().await;
        self.restore_locked().await
    }

    /// Make sure a session exists, restoring it if needed.
    ///
    /// Returns immediately when already authenticated. Concurrent callers
    /// share one restore: whoever waits on the in-flight restore gets its
    /// result instead of issuing another profile request.
    pub async fn ensure(&self) -> SessionState {
        let current = self.state();
        if matches!(current, SessionState::Authenticated(_)) {
            return current;
        }

        let seen = self.inner.epoch.load(Ordering::Acquire);
        let _flight = self.inner.flight.lock().await;
        if self.inner.epoch.load(Ordering::Acquire) != seen {
            debug!("session settled by a concurrent restore");
            return self.state();
        }
        self.restore_locked().await
    }

    /// Sign in with email and password, persist the token, and load the profile.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Arc<User>, CoreError> {
        let _flight = self.inner.flight.lock().await;
        self.publish(SessionState::Restoring);

        let outcome = self.sign_in_locked(email, password).await;
        match &outcome {
            Ok(user) => {
                info!(user = %user.name, "signed in");
                self.inner.last_error.store(None);
                self.publish(SessionState::Authenticated(Arc::clone(user)));
            }
            Err(e) => {
                warn!(error = %e, "sign-in failed");
                self.inner.credential.store(None);
                self.inner.last_error.store(Some(Arc::new(e.clone())));
                self.publish(SessionState::Anonymous);
            }
        }
        self.finish();
        outcome
    }

    /// Forget the credential, both in memory and in the store.
    pub async fn sign_out(&self) -> Result<(), CoreError> {
        let _flight = self.inner.flight.lock().await;
        self.inner.credential.store(None);
        let cleared = self.inner.store.clear();
        self.publish(SessionState::Anonymous);
        self.finish();
        info!("signed out");
        cleared
    }

    // ── Internals ────────────────────────────────────────────────────

    async fn sign_in_locked(&self, email: &str, password: &str) -> Result<Arc<User>, CoreError> {
        let tokens = self.inner.client.login(email, password).await?;
        let credential = Credential::new(tokens.access_token);

        // Persist only a token the profile endpoint has accepted.
        let user = self
            .inner
            .client
            .profile(&RequestContext::with_credential(credential.clone()))
            .await?;
        self.inner.store.save(&credential)?;
        self.inner.credential.store(Some(Arc::new(credential)));
        Ok(Arc::new(user))
    }

    async fn restore_locked(&self) -> SessionState {
        self.publish(SessionState::Restoring);

        let stored = match self.inner.store.load() {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "could not read persisted credential");
                self.inner.last_error.store(Some(Arc::new(e)));
                None
            }
        };

        let next = match stored {
            None => {
                debug!("no persisted credential, staying anonymous");
                self.inner.credential.store(None);
                SessionState::Anonymous
            }
            Some(credential) => self.resume(credential).await,
        };

        self.publish(next.clone());
        self.finish();
        next
    }

    async fn resume(&self, credential: Credential) -> SessionState {
        self.inner.credential.store(Some(Arc::new(credential.clone())));
        let ctx = RequestContext::with_credential(credential);

        match self.inner.client.profile(&ctx).await {
            Ok(user) => {
                info!(user = %user.name, "session restored");
                self.inner.last_error.store(None);
                SessionState::Authenticated(Arc::new(user))
            }
            Err(e) => {
                let expired = e.is_auth_expired();
                let err = CoreError::from(e);
                self.inner.credential.store(None);
                if expired {
                    // Rejected token: drop it so the next start is a clean sign-in.
                    warn!(error = %err, "persisted credential rejected, clearing it");
                    if let Err(clear_err) = self.inner.store.clear() {
                        warn!(error = %clear_err, "failed to clear rejected credential");
                    }
                } else {
                    warn!(error = %err, "profile fetch failed, keeping persisted credential");
                }
                self.inner.last_error.store(Some(Arc::new(err)));
                SessionState::Anonymous
            }
        }
    }

    fn publish(&self, state: SessionState) {
        self.inner.state.send_replace(state);
    }

    fn finish(&self) {
        self.inner.epoch.fetch_add(1, Ordering::AcqRel);
    }
}
