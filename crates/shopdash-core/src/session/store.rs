// ── Credential persistence ──
//
// Where the bearer token lives between runs. The session manager is the
// only caller; backends for the OS keyring and plain files live in
// `shopdash-config`.

use arc_swap::ArcSwapOption;
use shopdash_api::Credential;

use crate::error::CoreError;

/// Persisted storage for the single session credential.
pub trait CredentialStore: Send + Sync {
    /// The stored credential, or `None` if nobody is signed in.
    fn load(&self) -> Result<Option<Credential>, CoreError>;

    fn save(&self, credential: &Credential) -> Result<(), CoreError>;

    /// Remove the stored credential. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), CoreError>;
}

/// In-process store. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryCredentialStore {
    slot: ArcSwapOption<Credential>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded store, as if a previous run had signed in.
    pub fn with_credential(credential: Credential) -> Self {
        let store = Self::new();
        store.slot.store(Some(credential.into()));
        store
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<Credential>, CoreError> {
        Ok(self.slot.load_full().map(|c| (*c).clone()))
    }

    fn save(&self, credential: &Credential) -> Result<(), CoreError> {
        self.slot.store(Some(credential.clone().into()));
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        self.slot.store(None);
        Ok(())
    }
}
