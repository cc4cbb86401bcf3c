//! Orders service for order placement and management.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::client::ClientInner;
use crate::models::{AccountId, Order, OrderId, OrderRequest, OrderResponse, PlaceOrderOutcome};
use crate::Result;

/// Service for order operations.
///
/// # Example
///
/// ```no_run
/// use fennel_invest::models::{OrderRequestBuilder, OrderSide, PlaceOrderOutcome};
/// use rust_decimal_macros::dec;
///
/// # async fn example(client: fennel_invest::FennelClient) -> fennel_invest::Result<()> {
/// let order = OrderRequestBuilder::new()
///     .account_id("acc-1")
///     .symbol("AAPL")
///     .side(OrderSide::Buy)
///     .shares(dec!(1))
///     .dry_run(true)
///     .build()?;
///
/// match client.orders().place(&order).await? {
///     PlaceOrderOutcome::DryRun(request) => println!("would send {:?}", request.body),
///     PlaceOrderOutcome::Submitted(response) => println!("placed {:?}", response.order_id),
/// }
/// # Ok(())
/// # }
/// ```
pub struct OrdersService {
    inner: Arc<ClientInner>,
}

impl OrdersService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Place an order, or build it without sending when `dry_run` is set.
    ///
    /// Parameters are validated before any network traffic, so an invalid
    /// order fails with [`Error::InvalidParameter`](crate::Error::InvalidParameter)
    /// even without a session.
    pub async fn place(&self, order: &OrderRequest) -> Result<PlaceOrderOutcome> {
        order.validate()?;
        self.inner.ensure_session_valid().await?;

        let outcome = self.inner.backend.place_order(&self.inner, order).await?;
        if let PlaceOrderOutcome::Submitted(response) = &outcome {
            info!(
                symbol = %order.symbol,
                side = %order.side,
                status = ?response.status,
                "order submitted"
            );
        }
        Ok(outcome)
    }

    /// Cancel a working order.
    pub async fn cancel(&self, order_id: &OrderId) -> Result<OrderResponse> {
        self.inner.ensure_session_valid().await?;
        self.inner.backend.cancel_order(&self.inner, order_id).await
    }

    /// Orders placed on an account since the given time.
    pub async fn list(&self, account_id: &AccountId, since: DateTime<Utc>) -> Result<Vec<Order>> {
        self.inner.ensure_session_valid().await?;
        self.inner
            .backend
            .list_orders(&self.inner, account_id, since)
            .await
    }

    /// A single order by id.
    pub async fn get(&self, order_id: &OrderId) -> Result<Order> {
        self.inner.ensure_session_valid().await?;
        self.inner.backend.get_order(&self.inner, order_id).await
    }
}
