// ── Runtime dashboard configuration ──
//
// These types describe *how* to reach the catalogue API and how the
// products page behaves. They never touch disk: the config crate or an
// embedding UI builds a `DashboardConfig` and hands it in.

use std::time::Duration;

use shopdash_api::{Endpoints, ResourceClient, TlsMode, TransportConfig};
use url::Url;

use crate::error::CoreError;

pub const DEFAULT_API_URL: &str = "https://api.escuelajs.co/api/v1/";
pub const DEFAULT_PAGE_SIZE: u32 = 5;
pub const DEFAULT_PAGER_NEIGHBOURS: u32 = 3;
pub const DEFAULT_ALERT_AUTO_CLOSE: Duration = Duration::from_secs(9);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (local development servers).
    DangerAcceptInvalid,
}

/// Configuration for one dashboard instance.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// API base URL (e.g., `https://api.example.com/api/v1/`).
    pub api_url: Url,
    /// Products resource path, relative to `api_url`.
    pub products_path: String,
    /// Auth resource path, relative to `api_url`.
    pub auth_path: String,
    /// Items per page on the products list.
    pub page_size: u32,
    /// Page links shown on each side of the current page.
    pub pager_neighbours: u32,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Delay before an auto-closing alert is dismissed.
    pub alert_auto_close: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            products_path: "products".into(),
            auth_path: "auth".into(),
            page_size: DEFAULT_PAGE_SIZE,
            pager_neighbours: DEFAULT_PAGER_NEIGHBOURS,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            alert_auto_close: DEFAULT_ALERT_AUTO_CLOSE,
        }
    }
}

impl DashboardConfig {
    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(&self.products_path, &self.auth_path)
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        }
    }

    /// Build the resource client described by this config.
    pub fn build_client(&self) -> Result<ResourceClient, CoreError> {
        if self.page_size == 0 {
            return Err(CoreError::Config {
                message: "page_size must be at least 1".into(),
            });
        }
        Ok(ResourceClient::new(
            self.api_url.as_str(),
            self.endpoints(),
            &self.transport(),
        )?)
    }
}
