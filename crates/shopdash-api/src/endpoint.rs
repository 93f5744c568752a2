// Endpoint descriptors and the routing table that builds them.
//
// An `Endpoint` is a pure value: a path relative to the API base plus
// ordered query parameters. Only `Endpoints` constructs them, so every
// request target in the workspace comes from one table.

use std::fmt;

use crate::models::ProductId;

/// Structured request target: relative path plus query parameters.
///
/// Compared by value, so fetch state can tell whether the endpoint
/// actually changed between two renders.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    path: String,
    query: Vec<(String, String)>,
}

impl Endpoint {
    fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_owned(), value.to_string()));
        self
    }

    /// Path relative to the API base URL (no leading slash).
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        for (i, (k, v)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{k}={v}")?;
        }
        Ok(())
    }
}

/// Routing table for the catalogue API.
///
/// `products_base` and `auth_base` are paths relative to the API base
/// URL, e.g. `products` and `auth`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    products_base: String,
    auth_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new("products", "auth")
    }
}

impl Endpoints {
    pub fn new(products_base: &str, auth_base: &str) -> Self {
        Self {
            products_base: products_base.trim_matches('/').to_owned(),
            auth_base: auth_base.trim_matches('/').to_owned(),
        }
    }

    /// `GET <products>?limit=<n>&offset=<m>` -- one page.
    pub fn products(&self, limit: u32, offset: u32) -> Endpoint {
        Endpoint::new(self.products_base.clone())
            .with_query("limit", limit)
            .with_query("offset", offset)
    }

    /// `GET <products>` -- every record, used to derive the total count.
    pub fn all_products(&self) -> Endpoint {
        Endpoint::new(self.products_base.clone())
    }

    /// `GET|PUT|DELETE <products>/<id>`
    pub fn product(&self, id: ProductId) -> Endpoint {
        Endpoint::new(format!("{}/{id}", self.products_base))
    }

    /// `POST <products>` -- create. Same path as [`all_products`](Self::all_products).
    pub fn create_product(&self) -> Endpoint {
        Endpoint::new(self.products_base.clone())
    }

    /// `POST <auth>/login`
    pub fn login(&self) -> Endpoint {
        Endpoint::new(format!("{}/login", self.auth_base))
    }

    /// `GET <auth>/profile` -- requires a bearer credential.
    pub fn profile(&self) -> Endpoint {
        Endpoint::new(format!("{}/profile", self.auth_base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_endpoint_carries_limit_then_offset() {
        let ep = Endpoints::default().products(5, 10);
        assert_eq!(ep.path(), "products");
        assert_eq!(
            ep.query(),
            &[("limit".into(), "5".into()), ("offset".into(), "10".into())]
        );
        assert_eq!(ep.to_string(), "products?limit=5&offset=10");
    }

    #[test]
    fn endpoints_compare_by_value() {
        let table = Endpoints::default();
        assert_eq!(table.products(5, 0), table.products(5, 0));
        assert_ne!(table.products(5, 0), table.products(5, 5));
        assert_ne!(table.products(5, 0), table.all_products());
    }

    #[test]
    fn bases_are_trimmed() {
        let table = Endpoints::new("/api/products/", "/auth/");
        assert_eq!(table.product(42).path(), "api/products/42");
        assert_eq!(table.profile().path(), "auth/profile");
        assert_eq!(table.login().to_string(), "auth/login");
    }
}
