//! Market data service for prices, market hours and security lookup.

use std::sync::Arc;

use crate::client::ClientInner;
use crate::models::{Nbbo, Quote, SecurityMatch, Symbol};
use crate::{Error, Result};

/// Service for market data.
///
/// # Example
///
/// ```no_run
/// use fennel_invest::Symbol;
///
/// # async fn example(client: fennel_invest::FennelClient) -> fennel_invest::Result<()> {
/// let quote = client.market_data().quote(&Symbol::new("AAPL")).await?;
/// println!("AAPL: {}", quote.price);
/// # Ok(())
/// # }
/// ```
pub struct MarketDataService {
    inner: Arc<ClientInner>,
}

impl MarketDataService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Latest price for a symbol.
    pub async fn quote(&self, symbol: &Symbol) -> Result<Quote> {
        self.inner.ensure_session_valid().await?;
        self.inner.backend.quote(&self.inner, symbol).await
    }

    /// Latest prices for several symbols in one call.
    pub async fn latest_prices(&self, symbols: &[Symbol]) -> Result<Vec<Quote>> {
        self.inner.ensure_session_valid().await?;
        self.inner.backend.latest_prices(&self.inner, symbols).await
    }

    /// National best bid and offer for a symbol.
    pub async fn nbbo(&self, symbol: &Symbol) -> Result<Nbbo> {
        self.inner.ensure_session_valid().await?;
        self.inner.backend.nbbo(&self.inner, symbol).await
    }

    /// Whether the market is open.
    pub async fn is_market_open(&self) -> Result<bool> {
        self.inner.ensure_session_valid().await?;
        self.inner.backend.is_market_open(&self.inner).await
    }

    /// Search securities by ticker or name.
    ///
    /// `count` caps the number of results and must be at least 1.
    pub async fn search(&self, query: &str, count: u32) -> Result<Vec<SecurityMatch>> {
        if query.trim().is_empty() {
            return Err(Error::InvalidParameter("search query is empty".to_string()));
        }
        if count == 0 {
            return Err(Error::InvalidParameter("count must be at least 1".to_string()));
        }
        self.inner.ensure_session_valid().await?;
        self.inner.backend.search(&self.inner, query, count).await
    }
}
