// ── Edit-by-id flow ──
//
// Resolves the product named by the route's `id` parameter and exposes
// it as a pre-filled form. Nothing is fetched until the router reports
// the route as ready; any failure to load sends the user to the
// not-found route.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use shopdash_api::{Product, ProductForm, ProductId};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::controller::ProductsController;
use crate::error::CoreError;
use crate::stream::StateStream;

/// Where the edit flow sends the user when the product cannot be loaded.
pub const NOT_FOUND_ROUTE: &str = "/notFound";

const ID_PARAM: &str = "id";

/// Navigation route as seen by the edit flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    /// `false` until the router has resolved the URL parameters.
    pub ready: bool,
    pub params: HashMap<String, String>,
}

impl Route {
    /// A route whose parameters are not known yet.
    pub fn pending() -> Self {
        Self::default()
    }

    pub fn ready<K, V>(params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            ready: true,
            params: params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditState {
    AwaitingRoute,
    Loading,
    Loaded(Arc<Product>),
    NotFound,
}

/// Edit-by-id flow for one product page.
///
/// Each ready route starts a new generation; a fetch that finishes after
/// a newer route arrived is dropped, so the latest route always wins.
#[derive(Clone)]
pub struct EditFlow {
    controller: ProductsController,
    state: Arc<watch::Sender<EditState>>,
    generation: Arc<AtomicU64>,
}

impl EditFlow {
    pub fn new(controller: ProductsController) -> Self {
        let (state, _) = watch::channel(EditState::AwaitingRoute);
        Self {
            controller,
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn state(&self) -> EditState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> StateStream<EditState> {
        StateStream::new(self.state.subscribe())
    }

    /// React to a route change. Fetches only once the route is ready.
    pub async fn on_route(&self, route: &Route) -> EditState {
        if !route.ready {
            debug!("route not ready, waiting");
            return self.state();
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let Some(id) = route.param(ID_PARAM).and_then(|raw| raw.parse::<ProductId>().ok()) else {
            warn!(id = ?route.param(ID_PARAM), "route has no usable product id");
            return self.publish(EditState::NotFound);
        };

        self.publish(EditState::Loading);
        let next = match self.controller.fetch_product(id).await {
            Ok(product) => EditState::Loaded(Arc::new(product)),
            Err(e) => {
                warn!(id, error = %e, "product could not be loaded for editing");
                EditState::NotFound
            }
        };

        let latest = self.generation.load(Ordering::SeqCst);
        if latest != generation {
            debug!(id, generation, latest, "discarding superseded product load");
            return self.state();
        }
        self.publish(next)
    }

    /// Form pre-populated from the loaded product.
    pub fn form(&self) -> Option<ProductForm> {
        match &*self.state.borrow() {
            EditState::Loaded(product) => Some(ProductForm::from(product.as_ref())),
            _ => None,
        }
    }

    /// The route to navigate to, if the flow gave up on the product.
    pub fn redirect(&self) -> Option<&'static str> {
        matches!(*self.state.borrow(), EditState::NotFound).then_some(NOT_FOUND_ROUTE)
    }

    /// Save the edited form for the loaded product.
    pub async fn submit(&self, form: &ProductForm) -> Result<Product, CoreError> {
        let EditState::Loaded(product) = self.state() else {
            return Err(CoreError::ValidationFailed {
                message: "no product loaded".into(),
            });
        };
        let updated = self.controller.update(product.id, form).await?;
        self.publish(EditState::Loaded(Arc::new(updated.clone())));
        Ok(updated)
    }

    fn publish(&self, state: EditState) -> EditState {
        self.state.send_replace(state.clone());
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_route_has_no_params() {
        let route = Route::pending();
        assert!(!route.ready);
        assert_eq!(route.param("id"), None);
    }

    #[test]
    fn ready_route_exposes_params() {
        let route = Route::ready([("id", "42")]);
        assert!(route.ready);
        assert_eq!(route.param("id"), Some("42"));
    }
}
