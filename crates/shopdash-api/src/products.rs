// Product endpoints
//
// CRUD over `<products>`. Listing is offset-paginated; the "all" listing
// is only used to derive the total count.

use reqwest::Method;
use tracing::debug;

use crate::auth::RequestContext;
use crate::client::ResourceClient;
use crate::error::Error;
use crate::models::{Product, ProductForm, ProductId};

impl ResourceClient {
    /// One page of products.
    ///
    /// `GET <products>?limit=<limit>&offset=<offset>`. An offset past the
    /// end yields an empty page.
    pub async fn list_products(
        &self,
        ctx: &RequestContext,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Product>, Error> {
        let endpoint = self.endpoints().products(limit, offset);
        self.get(ctx, &endpoint).await
    }

    /// Every product. `GET <products>`
    pub async fn all_products(&self, ctx: &RequestContext) -> Result<Vec<Product>, Error> {
        let endpoint = self.endpoints().all_products();
        self.get(ctx, &endpoint).await
    }

    /// `GET <products>/<id>`
    pub async fn get_product(&self, ctx: &RequestContext, id: ProductId) -> Result<Product, Error> {
        let endpoint = self.endpoints().product(id);
        self.get(ctx, &endpoint).await
    }

    /// `POST <products>` with a [`ProductForm`] body.
    pub async fn create_product(
        &self,
        ctx: &RequestContext,
        form: &ProductForm,
    ) -> Result<Product, Error> {
        debug!(title = %form.title, "creating product");
        let endpoint = self.endpoints().create_product();
        self.send_json(ctx, Method::POST, &endpoint, form).await
    }

    /// `PUT <products>/<id>` with a [`ProductForm`] body.
    pub async fn update_product(
        &self,
        ctx: &RequestContext,
        id: ProductId,
        form: &ProductForm,
    ) -> Result<Product, Error> {
        debug!(id, "updating product");
        let endpoint = self.endpoints().product(id);
        self.send_json(ctx, Method::PUT, &endpoint, form).await
    }

    /// `DELETE <products>/<id>`
    pub async fn delete_product(&self, ctx: &RequestContext, id: ProductId) -> Result<(), Error> {
        debug!(id, "deleting product");
        let endpoint = self.endpoints().product(id);
        self.send_empty(ctx, Method::DELETE, &endpoint).await
    }
}
