// shopdash-api: Async Rust client for the product catalogue REST API

pub mod account;
pub mod auth;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod models;
pub mod products;
pub mod transport;

pub use auth::{Credential, RequestContext};
pub use client::ResourceClient;
pub use endpoint::{Endpoint, Endpoints};
pub use error::Error;
pub use models::{Category, Product, ProductForm, ProductId, Tokens, User};
pub use reqwest::Method;
pub use transport::{TlsMode, TransportConfig};
