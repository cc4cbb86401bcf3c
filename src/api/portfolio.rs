//! Portfolio service for balances and positions.

use std::sync::Arc;

use crate::client::ClientInner;
use crate::models::{AccountId, Holding, PortfolioSummary};
use crate::Result;

/// Service for portfolio reads.
///
/// On the single-account GraphQL revision the account id is ignored.
pub struct PortfolioService {
    inner: Arc<ClientInner>,
}

impl PortfolioService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Cash balances and total equity of an account.
    pub async fn summary(&self, account_id: &AccountId) -> Result<PortfolioSummary> {
        self.inner.ensure_session_valid().await?;
        self.inner
            .backend
            .portfolio_summary(&self.inner, account_id)
            .await
    }

    /// Equity positions held in an account.
    pub async fn holdings(&self, account_id: &AccountId) -> Result<Vec<Holding>> {
        self.inner.ensure_session_valid().await?;
        self.inner.backend.holdings(&self.inner, account_id).await
    }
}
