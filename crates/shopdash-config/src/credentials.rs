// Credential backends for the session token.
//
// The keyring is the default; the file backend exists for headless
// machines without a secret service.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use shopdash_core::{CoreError, Credential, CredentialStore};

use crate::{Profile, data_dir};

const KEYRING_SERVICE: &str = "shopdash";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialBackend {
    #[default]
    Keyring,
    File,
}

fn store_error(err: impl std::fmt::Display) -> CoreError {
    CoreError::CredentialStore {
        message: err.to_string(),
    }
}

// ── Keyring ─────────────────────────────────────────────────────────

/// Token kept in the OS keyring under `shopdash` / `<profile>/token`.
pub struct KeyringCredentialStore {
    account: String,
}

impl KeyringCredentialStore {
    pub fn new(profile_name: &str) -> Self {
        Self {
            account: format!("{profile_name}/token"),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, CoreError> {
        keyring::Entry::new(KEYRING_SERVICE, &self.account).map_err(store_error)
    }
}

impl CredentialStore for KeyringCredentialStore {
    fn load(&self) -> Result<Option<Credential>, CoreError> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(Credential::new(token))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(store_error(e)),
        }
    }

    fn save(&self, credential: &Credential) -> Result<(), CoreError> {
        debug!(account = %self.account, "storing token in keyring");
        self.entry()?
            .set_password(credential.expose())
            .map_err(store_error)
    }

    fn clear(&self) -> Result<(), CoreError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(store_error(e)),
        }
    }
}

// ── File ────────────────────────────────────────────────────────────

/// Token kept in a plain file, readable only by the owner on Unix.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/<profile>.token`
    pub fn for_profile(profile_name: &str) -> Self {
        Self::new(data_dir().join(format!("{profile_name}.token")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<Credential>, CoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| Credential::new(token)))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(store_error(e)),
        }
    }

    fn save(&self, credential: &Credential) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(store_error)?;
        }
        std::fs::write(&self.path, credential.expose()).map_err(store_error)?;
        restrict_permissions(&self.path)?;
        debug!(path = %self.path.display(), "stored token in file");
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(store_error(e)),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), CoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).map_err(store_error)
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), CoreError> {
    Ok(())
}

/// The credential store a profile is configured to use.
pub fn credential_store_for(profile_name: &str, profile: &Profile) -> Arc<dyn CredentialStore> {
    match profile.credential_backend {
        CredentialBackend::Keyring => Arc::new(KeyringCredentialStore::new(profile_name)),
        CredentialBackend::File => Arc::new(FileCredentialStore::for_profile(profile_name)),
    }
}
