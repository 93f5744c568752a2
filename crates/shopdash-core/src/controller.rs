// ── Products controller ──
//
// Drives the products page: one query for the visible page, one for
// the full listing (its length is the total count), pagination state,
// and the alert sink that reports mutation outcomes. Every successful
// mutation invalidates both queries.

use std::sync::Arc;

use shopdash_api::{Endpoint, Product, ProductForm, ProductId, RequestContext, ResourceClient};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::alert::{Alert, AlertSink};
use crate::config::DashboardConfig;
use crate::error::CoreError;
use crate::fetch::{FetchOutcome, FetchState, Query};
use crate::pagination::Pagination;
use crate::session::{CredentialStore, Session};
use crate::stream::StateStream;

/// Products list/mutate controller.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Does not fetch anything
/// until [`load()`](Self::load) is called.
#[derive(Clone)]
pub struct ProductsController {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    client: ResourceClient,
    session: Session,
    page: Query<Vec<Product>>,
    count: Query<Vec<Product>>,
    pagination: watch::Sender<Pagination>,
    alerts: AlertSink,
    pager_neighbours: u32,
}

impl ProductsController {
    /// Build the client and session described by `config`.
    pub fn from_config(
        config: &DashboardConfig,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self, CoreError> {
        let client = config.build_client()?;
        let session = Session::new(client.clone(), store);
        Ok(Self::with_session(config, client, session))
    }

    /// Wire the controller to an existing client and session.
    pub fn with_session(config: &DashboardConfig, client: ResourceClient, session: Session) -> Self {
        let (pagination, _) = watch::channel(Pagination::new(config.page_size));
        Self {
            inner: Arc::new(ControllerInner {
                page: Query::new(client.clone(), "products.page"),
                count: Query::new(client.clone(), "products.count"),
                client,
                session,
                pagination,
                alerts: AlertSink::new(config.alert_auto_close),
                pager_neighbours: config.pager_neighbours,
            }),
        }
    }

    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    pub fn alerts(&self) -> &AlertSink {
        &self.inner.alerts
    }

    pub fn client(&self) -> &ResourceClient {
        &self.inner.client
    }

    // ── Loading ──────────────────────────────────────────────────────

    /// Make sure a session exists, then fetch the current page and the
    /// total count.
    ///
    /// The listing is public, so an anonymous session still loads.
    pub async fn load(&self) -> Result<(), CoreError> {
        let state = self.inner.session.ensure().await;
        debug!(?state, "loading products");

        let ctx = self.inner.session.context();
        let page_endpoint = self.page_endpoint(self.pagination().offset);
        let count_endpoint = self.inner.client.endpoints().all_products();

        let (page, count) = tokio::join!(
            load_query(&self.inner.page, &ctx, page_endpoint),
            load_query(&self.inner.count, &ctx, count_endpoint),
        );
        self.sync_total();
        page?;
        count?;
        Ok(())
    }

    /// Re-fetch the page and the count together.
    pub async fn invalidate(&self) -> Result<(), CoreError> {
        let ctx = self.inner.session.context();
        let (page, count) = tokio::join!(self.inner.page.refresh(&ctx), self.inner.count.refresh(&ctx));
        self.sync_total();
        page?;
        count?;
        Ok(())
    }

    // ── Navigation ───────────────────────────────────────────────────

    /// Move to `offset` and re-run the page query. The count is untouched.
    pub async fn set_offset(&self, offset: u32) -> Result<FetchOutcome, CoreError> {
        self.inner.pagination.send_if_modified(|p| {
            let changed = p.offset != offset;
            p.offset = offset;
            changed
        });
        let ctx = self.inner.session.context();
        self.inner
            .page
            .set_endpoint(&ctx, self.page_endpoint(offset))
            .await
    }

    pub async fn next_page(&self) -> Result<FetchOutcome, CoreError> {
        let p = self.pagination();
        if !p.has_next() {
            return Ok(FetchOutcome::Unchanged);
        }
        self.set_offset(p.offset_for_page(p.current_page().saturating_add(1))).await
    }

    pub async fn prev_page(&self) -> Result<FetchOutcome, CoreError> {
        let p = self.pagination();
        if !p.has_prev() {
            return Ok(FetchOutcome::Unchanged);
        }
        self.set_offset(p.offset_for_page(p.current_page() - 1)).await
    }

    /// Jump to a zero-based page, clamped to the last known page.
    pub async fn go_to_page(&self, page: u32) -> Result<FetchOutcome, CoreError> {
        let p = self.pagination();
        let page = match p.page_count() {
            0 => page,
            count => page.min(count - 1),
        };
        self.set_offset(p.offset_for_page(page)).await
    }

    // ── Mutations ────────────────────────────────────────────────────

    pub async fn create(&self, form: &ProductForm) -> Result<Product, CoreError> {
        let ctx = self.inner.session.context();
        let result = self.inner.client.create_product(&ctx, form).await;
        let product = self.settle(result.map_err(CoreError::from), "Product added").await?;
        info!(id = product.id, title = %product.title, "product created");
        Ok(product)
    }

    pub async fn update(&self, id: ProductId, form: &ProductForm) -> Result<Product, CoreError> {
        let ctx = self.inner.session.context();
        let result = self.inner.client.update_product(&ctx, id, form).await;
        let product = self.settle(result.map_err(CoreError::from), "Product updated").await?;
        info!(id, "product updated");
        Ok(product)
    }

    pub async fn delete(&self, id: ProductId) -> Result<(), CoreError> {
        let ctx = self.inner.session.context();
        let result = self.inner.client.delete_product(&ctx, id).await;
        self.settle(result.map_err(CoreError::from), "Product deleted").await?;
        info!(id, "product deleted");
        Ok(())
    }

    /// Fetch a single product for the edit flow.
    pub async fn fetch_product(&self, id: ProductId) -> Result<Product, CoreError> {
        let ctx = self.inner.session.context();
        Ok(self.inner.client.get_product(&ctx, id).await?)
    }

    // ── Observation ──────────────────────────────────────────────────

    /// Products on the current page.
    pub fn products(&self) -> Vec<Product> {
        self.inner.page.state().data
    }

    pub fn page_state(&self) -> FetchState<Vec<Product>> {
        self.inner.page.state()
    }

    pub fn count_state(&self) -> FetchState<Vec<Product>> {
        self.inner.count.state()
    }

    pub fn pagination(&self) -> Pagination {
        *self.inner.pagination.borrow()
    }

    /// Page numbers for the pager, using the configured neighbour count.
    pub fn page_window(&self) -> Vec<u32> {
        self.pagination().page_window(self.inner.pager_neighbours)
    }

    pub fn subscribe_page(&self) -> StateStream<FetchState<Vec<Product>>> {
        self.inner.page.subscribe()
    }

    pub fn subscribe_pagination(&self) -> StateStream<Pagination> {
        StateStream::new(self.inner.pagination.subscribe())
    }

    // ── Internals ────────────────────────────────────────────────────

    fn page_endpoint(&self, offset: u32) -> Endpoint {
        let limit = self.inner.pagination.borrow().limit;
        self.inner.client.endpoints().products(limit, offset)
    }

    /// Report a mutation outcome and refresh the list on success.
    async fn settle<T>(&self, result: Result<T, CoreError>, success: &str) -> Result<T, CoreError> {
        match result {
            Ok(value) => {
                self.inner.alerts.show(Alert::success(success));
                // Refresh failures already live in the query state.
                if let Err(e) = self.invalidate().await {
                    warn!(error = %e, "refresh after mutation failed");
                }
                Ok(value)
            }
            Err(e) => {
                warn!(error = %e, "product mutation failed");
                self.inner.alerts.show(Alert::error(e.alert_message()));
                Err(e)
            }
        }
    }

    fn sync_total(&self) {
        let state = self.inner.count.state();
        if !state.is_settled() || state.error().is_some() {
            return;
        }
        let total = u32::try_from(state.data.len()).unwrap_or(u32::MAX);
        self.inner.pagination.send_if_modified(|p| {
            let changed = p.total_count != total;
            p.total_count = total;
            changed
        });
    }
}

/// Point `query` at `endpoint`, re-running it if it is already there.
async fn load_query(
    query: &Query<Vec<Product>>,
    ctx: &RequestContext,
    endpoint: Endpoint,
) -> Result<FetchOutcome, CoreError> {
    match query.set_endpoint(ctx, endpoint).await? {
        FetchOutcome::Unchanged => query.refresh(ctx).await,
        outcome => Ok(outcome),
    }
}
