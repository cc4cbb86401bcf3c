//! Persistence of the session credential.
//!
//! A [`CredentialStore`] holds at most one [`StoredCredential`]. Absence is a
//! normal state: `load` returns `Ok(None)` and deleting a missing record
//! succeeds.
//!
//! ```no_run
//! use fennel_invest::store::{CredentialStore, FileCredentialStore};
//!
//! # async fn example() -> fennel_invest::Result<()> {
//! let store = FileCredentialStore::new("creds/fennel_credentials.json");
//! if let Some(record) = store.load().await? {
//!     println!("client id: {:?}", record.client_id);
//! }
//! # Ok(())
//! # }
//! ```

mod file;
mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

pub use file::FileCredentialStore;
pub use memory::MemoryCredentialStore;

/// The persisted form of a credential.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredential {
    /// Bearer token
    pub access_token: String,
    /// Refresh token
    pub refresh_token: String,
    /// OpenID id token
    pub id_token: String,
    /// OAuth client id; the configured default applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

impl std::fmt::Debug for StoredCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredCredential")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("id_token", &"[REDACTED]")
            .field("client_id", &self.client_id)
            .finish()
    }
}

/// Load, save and delete the single persisted credential record.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read the record, `None` if there is none.
    async fn load(&self) -> Result<Option<StoredCredential>>;

    /// Replace the record.
    async fn save(&self, credential: &StoredCredential) -> Result<()>;

    /// Remove the record, succeeding if there is none.
    async fn delete(&self) -> Result<()>;
}
