//! Order models for placing and managing trades.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::*;
use super::primitives::{AccountId, OrderId, Symbol};
use crate::client::ApiRequest;

/// An order to be submitted.
///
/// Use [`OrderRequestBuilder`] for a convenient way to construct orders.
///
/// # Example
///
/// ```
/// use fennel_invest::models::{OrderRequestBuilder, OrderSide, OrderType};
/// use rust_decimal_macros::dec;
///
/// let order = OrderRequestBuilder::new()
///     .account_id("acc-1")
///     .symbol("AAPL")
///     .side(OrderSide::Buy)
///     .shares(dec!(10))
///     .order_type(OrderType::Limit)
///     .limit_price(dec!(150.00))
///     .build()
///     .unwrap();
/// assert_eq!(order.symbol.as_str(), "AAPL");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Account to trade in
    pub account_id: AccountId,
    /// Ticker to trade
    pub symbol: Symbol,
    /// Number of shares; must be positive
    pub shares: Decimal,
    /// Buy or sell
    pub side: OrderSide,
    /// Market or limit
    pub order_type: OrderType,
    /// Limit price; required for limit orders, positive when present
    pub limit_price: Option<Decimal>,
    /// Time in force
    pub time_in_force: TimeInForce,
    /// Routing option
    pub route: Route,
    /// Validate and build the request without submitting it
    pub dry_run: bool,
}

impl OrderRequest {
    /// Check the order parameters without touching the network.
    pub fn validate(&self) -> crate::Result<()> {
        if self.shares <= Decimal::ZERO {
            return Err(crate::Error::InvalidParameter(
                "shares must be greater than 0".to_string(),
            ));
        }
        if let Some(price) = self.limit_price {
            if price <= Decimal::ZERO {
                return Err(crate::Error::InvalidParameter(
                    "limit price must be greater than 0".to_string(),
                ));
            }
        }
        if self.order_type == OrderType::Limit && self.limit_price.is_none() {
            return Err(crate::Error::InvalidParameter(
                "limit price must be provided for limit orders".to_string(),
            ));
        }
        if self.symbol.as_str().is_empty() {
            return Err(crate::Error::InvalidParameter(
                "symbol must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for creating [`OrderRequest`]s.
#[derive(Debug, Clone, Default)]
pub struct OrderRequestBuilder {
    account_id: Option<AccountId>,
    symbol: Option<Symbol>,
    shares: Option<Decimal>,
    side: Option<OrderSide>,
    order_type: OrderType,
    limit_price: Option<Decimal>,
    time_in_force: TimeInForce,
    route: Route,
    dry_run: bool,
}

impl OrderRequestBuilder {
    /// Create a new order builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the account.
    pub fn account_id(mut self, account_id: impl Into<AccountId>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    /// Set the ticker.
    pub fn symbol(mut self, symbol: impl Into<Symbol>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Set the share quantity.
    pub fn shares(mut self, shares: Decimal) -> Self {
        self.shares = Some(shares);
        self
    }

    /// Set the side.
    pub fn side(mut self, side: OrderSide) -> Self {
        self.side = Some(side);
        self
    }

    /// Set the order type. Defaults to market.
    pub fn order_type(mut self, order_type: OrderType) -> Self {
        self.order_type = order_type;
        self
    }

    /// Set the limit price.
    pub fn limit_price(mut self, price: Decimal) -> Self {
        self.limit_price = Some(price);
        self
    }

    /// Set the time in force.
    pub fn time_in_force(mut self, tif: TimeInForce) -> Self {
        self.time_in_force = tif;
        self
    }

    /// Set the routing option.
    pub fn route(mut self, route: Route) -> Self {
        self.route = route;
        self
    }

    /// Build the request payload but do not submit it.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Build the order, validating all fields.
    pub fn build(self) -> crate::Result<OrderRequest> {
        let account_id = self.account_id.ok_or_else(|| {
            crate::Error::InvalidParameter("account_id is required".to_string())
        })?;
        let symbol = self
            .symbol
            .ok_or_else(|| crate::Error::InvalidParameter("symbol is required".to_string()))?;
        let shares = self
            .shares
            .ok_or_else(|| crate::Error::InvalidParameter("shares is required".to_string()))?;
        let side = self
            .side
            .ok_or_else(|| crate::Error::InvalidParameter("side is required".to_string()))?;

        let order = OrderRequest {
            account_id,
            symbol,
            shares,
            side,
            order_type: self.order_type,
            limit_price: self.limit_price,
            time_in_force: self.time_in_force,
            route: self.route,
            dry_run: self.dry_run,
        };
        order.validate()?;
        Ok(order)
    }
}

/// An order as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Order identifier
    pub id: OrderId,
    /// Account the order belongs to
    pub account_id: AccountId,
    /// Ticker
    pub symbol: Symbol,
    /// Buy or sell
    pub side: Option<OrderSide>,
    /// Market or limit
    pub order_type: Option<OrderType>,
    /// Shares requested
    pub shares: Decimal,
    /// Shares filled so far
    pub filled_shares: Decimal,
    /// Limit price, if any
    pub limit_price: Option<Decimal>,
    /// Average fill price, if any shares filled
    pub average_fill_price: Option<Decimal>,
    /// Current status
    pub status: OrderStatus,
    /// Submission time
    pub created_at: Option<DateTime<Utc>>,
}

/// Backend acknowledgement of an order placement or cancellation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResponse {
    /// Identifier of the affected order, when returned
    pub order_id: Option<OrderId>,
    /// Status after the request
    pub status: OrderStatus,
    /// Free-form message from the backend
    pub message: Option<String>,
}

/// Result of [`OrdersService::place`](crate::api::OrdersService::place).
#[derive(Debug, Clone)]
pub enum PlaceOrderOutcome {
    /// The order was sent
    Submitted(OrderResponse),
    /// Dry run: the request that would have been sent
    DryRun(ApiRequest),
}

impl PlaceOrderOutcome {
    /// Returns `true` for a dry run.
    pub fn is_dry_run(&self) -> bool {
        matches!(self, PlaceOrderOutcome::DryRun(_))
    }
}
