//! Accounts service.

use std::sync::Arc;

use crate::client::ClientInner;
use crate::models::Account;
use crate::Result;

/// Service for account listing.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: fennel_invest::FennelClient) -> fennel_invest::Result<()> {
/// for account in client.accounts().list().await? {
///     println!("{} ({})", account.name, account.id);
/// }
/// # Ok(())
/// # }
/// ```
pub struct AccountsService {
    inner: Arc<ClientInner>,
}

impl AccountsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// List the user's approved accounts, oldest first.
    ///
    /// Accounts still being onboarded are left out. The single-account
    /// GraphQL revision has no listing and fails with
    /// [`Error::Unsupported`](crate::Error::Unsupported).
    pub async fn list(&self) -> Result<Vec<Account>> {
        self.inner.ensure_session_valid().await?;
        self.inner.backend.accounts(&self.inner).await
    }
}
