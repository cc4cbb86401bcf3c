//! In-memory credential store.

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{CredentialStore, StoredCredential};
use crate::Result;

/// Keeps the credential in process memory only.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    record: Mutex<Option<StoredCredential>>,
}

impl MemoryCredentialStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store already holding `credential`.
    pub fn with_credential(credential: StoredCredential) -> Self {
        Self {
            record: Mutex::new(Some(credential)),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Result<Option<StoredCredential>> {
        Ok(self.record.lock().await.clone())
    }

    async fn save(&self, credential: &StoredCredential) -> Result<()> {
        *self.record.lock().await = Some(credential.clone());
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        self.record.lock().await.take();
        Ok(())
    }
}
