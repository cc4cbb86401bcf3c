//! Per-revision request building and response parsing.
//!
//! Each backend revision implements [`Backend`]: it knows how to build the
//! request for every operation it supports and how to turn the response into
//! the crate's models. Operations a revision lacks fall through to the
//! default methods and fail with [`Error::Unsupported`].
//!
//! The session guard is not applied here; the service layer calls
//! `ensure_session_valid` first.

mod graphql;
mod proto;
pub mod wire;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::client::{ApiRequest, ClientConfig, ClientInner};
use crate::models::{
    Account, AccountId, Holding, Nbbo, Order, OrderId, OrderRequest, OrderResponse,
    PlaceOrderOutcome, PortfolioSummary, Quote, SecurityMatch, Symbol,
};
use crate::{Error, Result, Revision};

pub(crate) use graphql::{check_envelope, GraphQlBackend};
pub(crate) use proto::ProtoBackend;

/// The capability set shared by all backend revisions.
#[async_trait]
pub(crate) trait Backend: Send + Sync {
    /// Which revision this is.
    fn revision(&self) -> Revision;

    /// Cheap authenticated read used to probe token validity.
    fn probe_request(&self) -> ApiRequest;

    /// Approved accounts, oldest first.
    async fn accounts(&self, api: &ClientInner) -> Result<Vec<Account>>;

    /// Cash and equity totals for an account.
    async fn portfolio_summary(
        &self,
        api: &ClientInner,
        account_id: &AccountId,
    ) -> Result<PortfolioSummary>;

    /// Equity positions of an account.
    async fn holdings(&self, api: &ClientInner, account_id: &AccountId) -> Result<Vec<Holding>>;

    /// Latest price of one symbol.
    async fn quote(&self, api: &ClientInner, symbol: &Symbol) -> Result<Quote>;

    /// Validate, resolve and submit (or dry-run) an order.
    async fn place_order(&self, api: &ClientInner, order: &OrderRequest)
        -> Result<PlaceOrderOutcome>;

    /// Latest prices of several symbols.
    async fn latest_prices(&self, _api: &ClientInner, _symbols: &[Symbol]) -> Result<Vec<Quote>> {
        unsupported("getLatestPrices", self.revision())
    }

    /// National best bid and offer.
    async fn nbbo(&self, _api: &ClientInner, _symbol: &Symbol) -> Result<Nbbo> {
        unsupported("getNbboPrice", self.revision())
    }

    /// Whether the market is open right now.
    async fn is_market_open(&self, _api: &ClientInner) -> Result<bool> {
        unsupported("isMarketOpen", self.revision())
    }

    /// Securities matching a free-text query.
    async fn search(
        &self,
        _api: &ClientInner,
        _query: &str,
        _count: u32,
    ) -> Result<Vec<SecurityMatch>> {
        unsupported("searchSecurities", self.revision())
    }

    /// Orders submitted since a point in time.
    async fn list_orders(
        &self,
        _api: &ClientInner,
        _account_id: &AccountId,
        _since: DateTime<Utc>,
    ) -> Result<Vec<Order>> {
        unsupported("listOrders", self.revision())
    }

    /// One order by id.
    async fn get_order(&self, _api: &ClientInner, _order_id: &OrderId) -> Result<Order> {
        unsupported("getOrder", self.revision())
    }

    /// Cancel a working order.
    async fn cancel_order(&self, _api: &ClientInner, _order_id: &OrderId) -> Result<OrderResponse> {
        unsupported("cancelOrder", self.revision())
    }
}

/// Pick the backend for the configured revision.
pub(crate) fn for_config(config: &ClientConfig) -> Box<dyn Backend> {
    match config.revision {
        Revision::GraphQl => Box::new(GraphQlBackend::multi_account(&config.graphql_url)),
        Revision::GraphQlSingleAccount => {
            Box::new(GraphQlBackend::single_account(&config.graphql_url))
        }
        Revision::Protobuf => Box::new(ProtoBackend::new(config)),
    }
}

fn unsupported<T>(operation: &'static str, revision: Revision) -> Result<T> {
    Err(Error::Unsupported {
        operation,
        revision,
    })
}

pub(crate) fn decimal_from_f64(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

pub(crate) fn decimal_to_f64(value: Decimal, what: &str) -> Result<f64> {
    value
        .to_f64()
        .ok_or_else(|| Error::InvalidParameter(format!("{what} is out of range")))
}
