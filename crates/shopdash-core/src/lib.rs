// shopdash-core: Session, fetch state, and products controller between shopdash-api and consumers.

pub mod alert;
pub mod config;
pub mod controller;
pub mod edit;
pub mod error;
pub mod fetch;
pub mod pagination;
pub mod session;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use alert::{Alert, AlertKind, AlertSink};
pub use config::{DashboardConfig, TlsVerification};
pub use controller::ProductsController;
pub use edit::{EditFlow, EditState, NOT_FOUND_ROUTE, Route};
pub use error::CoreError;
pub use fetch::{FetchOutcome, FetchState, FetchStatus, Query};
pub use pagination::Pagination;
pub use session::{CredentialStore, MemoryCredentialStore, Session, SessionState};
pub use stream::{StateStream, StateWatchStream};

// Wire types consumers handle directly.
pub use shopdash_api::{Credential, Product, ProductForm, ProductId, User};
