// ── Fetch state primitive ──
//
// `Query<T>` fetches one endpoint into observable state. Every fetch
// cycle takes a generation number; only the newest cycle may publish,
// so a slow response for an old endpoint can never overwrite a newer one.

use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use shopdash_api::{Endpoint, Method, RequestContext, ResourceClient};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::stream::StateStream;

/// Where a query is in its fetch cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchStatus {
    /// No fetch has been issued yet.
    #[default]
    Idle,
    Loading,
    Success,
    /// The last cycle failed. Data from earlier cycles is kept.
    Failed(CoreError),
}

/// Observable `{ data, isLoading, error }` triple for one query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchState<T> {
    pub data: T,
    pub status: FetchStatus,
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        self.status == FetchStatus::Loading
    }

    pub fn error(&self) -> Option<&CoreError> {
        match &self.status {
            FetchStatus::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// `true` once a cycle has completed, successfully or not.
    pub fn is_settled(&self) -> bool {
        matches!(self.status, FetchStatus::Success | FetchStatus::Failed(_))
    }
}

/// What happened to the result of one fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response was published to the state.
    Applied,
    /// A newer cycle started before this one finished; the response was dropped.
    Superseded,
    /// The endpoint did not change, so nothing was fetched.
    Unchanged,
}

/// Current endpoint plus the generation of the newest cycle.
/// Both are guarded together so check-and-publish is atomic.
#[derive(Debug, Default)]
struct Cursor {
    endpoint: Option<Endpoint>,
    generation: u64,
}

/// Fetches an endpoint into a [`FetchState<T>`].
///
/// Cheaply cloneable; clones share state. Re-fetches when
/// [`set_endpoint`](Self::set_endpoint) is given a different endpoint, or
/// on explicit [`refresh`](Self::refresh) (invalidation).
pub struct Query<T> {
    inner: Arc<QueryInner<T>>,
}

struct QueryInner<T> {
    label: &'static str,
    client: ResourceClient,
    cursor: Mutex<Cursor>,
    state: watch::Sender<FetchState<T>>,
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Query<T>
where
    T: DeserializeOwned + Clone + Default + Send + Sync + 'static,
{
    /// `label` names the query in log output.
    pub fn new(client: ResourceClient, label: &'static str) -> Self {
        let (state, _) = watch::channel(FetchState::default());
        Self {
            inner: Arc::new(QueryInner {
                label,
                client,
                cursor: Mutex::new(Cursor::default()),
                state,
            }),
        }
    }

    /// The endpoint of the most recently issued cycle.
    pub fn endpoint(&self) -> Option<Endpoint> {
        self.lock_cursor().endpoint.clone()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> FetchState<T> {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> StateStream<FetchState<T>> {
        StateStream::new(self.inner.state.subscribe())
    }

    /// Point the query at `endpoint`, fetching only if it differs from the
    /// current one.
    pub async fn set_endpoint(
        &self,
        ctx: &RequestContext,
        endpoint: Endpoint,
    ) -> Result<FetchOutcome, CoreError> {
        if self.lock_cursor().endpoint.as_ref() == Some(&endpoint) {
            return Ok(FetchOutcome::Unchanged);
        }
        self.run(ctx, endpoint).await
    }

    /// Re-run the current endpoint. A no-op before the first `set_endpoint`.
    pub async fn refresh(&self, ctx: &RequestContext) -> Result<FetchOutcome, CoreError> {
        match self.endpoint() {
            Some(endpoint) => self.run(ctx, endpoint).await,
            None => Ok(FetchOutcome::Unchanged),
        }
    }

    async fn run(
        &self,
        ctx: &RequestContext,
        endpoint: Endpoint,
    ) -> Result<FetchOutcome, CoreError> {
        let generation = {
            let mut cursor = self.lock_cursor();
            cursor.generation += 1;
            cursor.endpoint = Some(endpoint.clone());
            self.inner
                .state
                .send_modify(|s| s.status = FetchStatus::Loading);
            cursor.generation
        };
        debug!(query = self.inner.label, %endpoint, generation, "fetch started");

        let result: Result<T, _> = self
            .inner
            .client
            .request(ctx, Method::GET, &endpoint, None)
            .await;

        let cursor = self.lock_cursor();
        if cursor.generation != generation {
            debug!(
                query = self.inner.label,
                %endpoint,
                generation,
                latest = cursor.generation,
                "discarding superseded response"
            );
            return Ok(FetchOutcome::Superseded);
        }

        match result {
            Ok(data) => {
                self.inner.state.send_modify(|s| {
                    s.data = data;
                    s.status = FetchStatus::Success;
                });
                Ok(FetchOutcome::Applied)
            }
            Err(e) => {
                let err = CoreError::from(e);
                warn!(query = self.inner.label, %endpoint, error = %err, "fetch failed");
                self.inner
                    .state
                    .send_modify(|s| s.status = FetchStatus::Failed(err.clone()));
                Err(err)
            }
        }
    }

    // The cursor is never left half-updated, so a poisoned lock is still usable.
    fn lock_cursor(&self) -> std::sync::MutexGuard<'_, Cursor> {
        self.inner
            .cursor
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
