//! CLI configuration: a thin layer over `shopdash_config` that applies
//! `GlobalOpts` overrides (--profile, --api-url, --timeout).

use std::sync::Arc;
use std::time::Duration;

use shopdash_core::{CredentialStore, DashboardConfig, ProductsController};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use shopdash_config::{
    Config, CredentialBackend, Defaults, Profile, config_path, credential_store_for,
    load_config, load_config_or_default, profile_to_dashboard_config, save_config,
};

/// Everything a command needs to talk to the API.
pub struct Resolved {
    pub dashboard: DashboardConfig,
    pub store: Arc<dyn CredentialStore>,
}

/// Resolve the active profile and apply CLI flag overrides.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = load_config()?;
    let (profile_name, mut profile) = cfg.resolve_profile(global.profile.as_deref())?;

    // Flag > env > profile
    if let Some(ref url) = global.api_url {
        profile.api_url.clone_from(url);
    }

    let mut dashboard = profile_to_dashboard_config(&profile, &cfg.defaults)?;
    if let Some(secs) = global.timeout {
        dashboard.timeout = Duration::from_secs(secs);
    }

    tracing::debug!(profile = %profile_name, api_url = %dashboard.api_url, "resolved profile");
    Ok(Resolved {
        store: credential_store_for(&profile_name, &profile),
        dashboard,
    })
}

/// Build the products controller for the active profile.
pub fn build_controller(global: &GlobalOpts) -> Result<ProductsController, CliError> {
    let resolved = resolve(global)?;
    Ok(ProductsController::from_config(
        &resolved.dashboard,
        resolved.store,
    )?)
}
