//! HTTP+protobuf revision of the backend: one URL per operation, protobuf
//! bodies both ways.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use prost::Message;
use prost_types::Timestamp;
use tracing::debug;

use super::wire;
use super::{decimal_from_f64, decimal_to_f64, Backend};
use crate::client::{ApiRequest, ClientConfig, ClientInner};
use crate::models::account::tradable_accounts;
use crate::models::{
    Account, AccountId, AccountStatus, CashBalance, Holding, Nbbo, Order, OrderId, OrderRequest,
    OrderResponse, OrderSide, OrderStatus, OrderType, PlaceOrderOutcome, PortfolioSummary, Quote,
    Route, Symbol, TimeInForce,
};
use crate::{Error, Result, Revision};

mod paths {
    pub const ACCOUNTS: &str = "/accounts/info";
    pub const POSITIONS: &str = "/portfolio/positions";
    pub const SUMMARY: &str = "/portfolio/summary";
    pub const LIST_ORDERS: &str = "/orders/list";
    pub const GET_ORDER: &str = "/order/get";
    pub const CANCEL_ORDER: &str = "/order/cancel";
    pub const CREATE_ORDER: &str = "/order/create";
    pub const NBBO: &str = "/markets/price/nbbo";
    pub const LATEST_PRICES: &str = "/markets/prices/latest";
}

/// Backend speaking the HTTP+protobuf API.
#[derive(Debug, Clone)]
pub(crate) struct ProtoBackend {
    accounts_url: String,
    positions_url: String,
    summary_url: String,
    list_orders_url: String,
    get_order_url: String,
    cancel_order_url: String,
    create_order_url: String,
    nbbo_url: String,
    latest_prices_url: String,
}

impl ProtoBackend {
    pub(crate) fn new(config: &ClientConfig) -> Self {
        Self {
            accounts_url: config.api_endpoint(paths::ACCOUNTS),
            positions_url: config.api_endpoint(paths::POSITIONS),
            summary_url: config.api_endpoint(paths::SUMMARY),
            list_orders_url: config.api_endpoint(paths::LIST_ORDERS),
            get_order_url: config.api_endpoint(paths::GET_ORDER),
            cancel_order_url: config.api_endpoint(paths::CANCEL_ORDER),
            create_order_url: config.api_endpoint(paths::CREATE_ORDER),
            nbbo_url: config.api_endpoint(paths::NBBO),
            latest_prices_url: config.api_endpoint(paths::LATEST_PRICES),
        }
    }

    fn account_request(&self, operation: &'static str, url: &str, account_id: &AccountId) -> ApiRequest {
        let message = wire::AccountIdRequest {
            account_id: account_id.to_string(),
        };
        ApiRequest::protobuf(operation, url, message.encode_to_vec())
    }

    fn create_order_request(&self, order: &OrderRequest) -> Result<ApiRequest> {
        let message = wire::CreateOrderRequest {
            account_id: order.account_id.to_string(),
            symbol: order.symbol.to_string(),
            shares: decimal_to_f64(order.shares, "shares")?,
            limit_price: order
                .limit_price
                .map(|p| decimal_to_f64(p, "limit price"))
                .transpose()?,
            side: side_to_wire(order.side) as i32,
            order_type: order_type_to_wire(order.order_type) as i32,
            time_in_force: match order.time_in_force {
                TimeInForce::Day => wire::TimeInForce::Day as i32,
            },
            route: route_to_wire(order.route) as i32,
        };
        Ok(ApiRequest::protobuf(
            "placeOrder",
            &self.create_order_url,
            message.encode_to_vec(),
        ))
    }
}

fn decode<M: Message + Default>(body: &[u8]) -> Result<M> {
    Ok(M::decode(body)?)
}

fn to_datetime(ts: &Timestamp) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts.seconds, u32::try_from(ts.nanos).ok()?)
}

fn to_timestamp(dt: DateTime<Utc>) -> Timestamp {
    Timestamp {
        seconds: dt.timestamp(),
        nanos: dt.timestamp_subsec_nanos() as i32,
    }
}

fn side_to_wire(side: OrderSide) -> wire::Side {
    match side {
        OrderSide::Buy => wire::Side::Buy,
        OrderSide::Sell => wire::Side::Sell,
    }
}

fn order_type_to_wire(order_type: OrderType) -> wire::OrderType {
    match order_type {
        OrderType::Market => wire::OrderType::Market,
        OrderType::Limit => wire::OrderType::Limit,
    }
}

fn route_to_wire(route: Route) -> wire::RoutingOption {
    match route {
        Route::Exchange => wire::RoutingOption::Exchange,
        Route::ExchangeAts => wire::RoutingOption::ExchangeAts,
        Route::ExchangeAtsSdp => wire::RoutingOption::ExchangeAtsSdp,
        Route::Quik => wire::RoutingOption::Quik,
    }
}

fn status_from_wire(status: wire::OrderStatus) -> OrderStatus {
    match status {
        wire::OrderStatus::Unspecified => OrderStatus::Unknown,
        wire::OrderStatus::Pending => OrderStatus::Pending,
        wire::OrderStatus::Open => OrderStatus::Open,
        wire::OrderStatus::PartiallyFilled => OrderStatus::PartiallyFilled,
        wire::OrderStatus::Filled => OrderStatus::Filled,
        wire::OrderStatus::Cancelled => OrderStatus::Cancelled,
        wire::OrderStatus::Rejected => OrderStatus::Rejected,
    }
}

fn account_from_wire(account: wire::Account) -> Account {
    let status = match account.status() {
        wire::AccountStatus::Approved => AccountStatus::Approved,
        wire::AccountStatus::Pending => AccountStatus::Pending,
        other => AccountStatus::Other(format!("{other:?}").to_uppercase()),
    };
    Account {
        created: account
            .created
            .as_ref()
            .and_then(to_datetime)
            .unwrap_or_default(),
        id: AccountId::new(account.id),
        name: account.name,
        status,
        is_primary: account.is_primary,
    }
}

fn order_from_wire(order: wire::Order) -> Order {
    let side = match order.side() {
        wire::Side::Buy => Some(OrderSide::Buy),
        wire::Side::Sell => Some(OrderSide::Sell),
        wire::Side::Unspecified => None,
    };
    let order_type = match order.order_type() {
        wire::OrderType::Market => Some(OrderType::Market),
        wire::OrderType::Limit => Some(OrderType::Limit),
        wire::OrderType::Unspecified => None,
    };
    Order {
        status: status_from_wire(order.status()),
        created_at: order.created_at.as_ref().and_then(to_datetime),
        id: OrderId::new(order.id),
        account_id: AccountId::new(order.account_id),
        symbol: Symbol::new(order.symbol),
        side,
        order_type,
        shares: decimal_from_f64(order.shares),
        filled_shares: decimal_from_f64(order.filled_shares),
        limit_price: order.limit_price.map(decimal_from_f64),
        average_fill_price: order.average_fill_price.map(decimal_from_f64),
    }
}

fn order_response_from_wire(response: wire::OrderResponse) -> OrderResponse {
    OrderResponse {
        status: status_from_wire(response.status()),
        order_id: (!response.id.is_empty()).then(|| OrderId::new(response.id)),
        message: response.message,
    }
}

fn quote_from_wire(price: wire::PriceResponse) -> Quote {
    Quote {
        symbol: Symbol::new(price.symbol),
        price: decimal_from_f64(price.price),
        isin: None,
        timestamp: price.timestamp.as_ref().and_then(to_datetime),
    }
}

#[async_trait]
impl Backend for ProtoBackend {
    fn revision(&self) -> Revision {
        Revision::Protobuf
    }

    fn probe_request(&self) -> ApiRequest {
        ApiRequest::get("getAccounts", &self.accounts_url)
    }

    async fn accounts(&self, api: &ClientInner) -> Result<Vec<Account>> {
        let body = api.call(&self.probe_request()).await?;
        let response: wire::AccountsResponse = decode(&body)?;
        Ok(tradable_accounts(
            response.accounts.into_iter().map(account_from_wire).collect(),
        ))
    }

    async fn portfolio_summary(
        &self,
        api: &ClientInner,
        account_id: &AccountId,
    ) -> Result<PortfolioSummary> {
        let request = self.account_request("getPortfolioSummary", &self.summary_url, account_id);
        let body = api.call(&request).await?;
        let summary: wire::PortfolioSummaryResponse = decode(&body)?;

        Ok(PortfolioSummary {
            total_equity_value: decimal_from_f64(summary.total_equity_value),
            cash: CashBalance {
                currency: summary.currency,
                can_trade: decimal_from_f64(summary.buying_power),
                can_withdraw: decimal_from_f64(summary.withdrawable),
                reserved_balance: decimal_from_f64(summary.reserved_cash),
                settled_balance: decimal_from_f64(summary.settled_cash),
                trade_balance: decimal_from_f64(summary.cash_available),
                ..CashBalance::default()
            },
        })
    }

    async fn holdings(&self, api: &ClientInner, account_id: &AccountId) -> Result<Vec<Holding>> {
        let request = self.account_request("getHoldings", &self.positions_url, account_id);
        let body = api.call(&request).await?;
        let response: wire::PositionsResponse = decode(&body)?;

        Ok(response
            .positions
            .into_iter()
            .map(|p| Holding {
                symbol: Symbol::new(p.symbol),
                isin: None,
                name: None,
                security_type: None,
                shares: decimal_from_f64(p.shares),
                market_value: decimal_from_f64(p.market_value),
                price: p.price.map(decimal_from_f64),
                cost_basis: p.cost_basis.map(decimal_from_f64),
            })
            .collect())
    }

    async fn quote(&self, api: &ClientInner, symbol: &Symbol) -> Result<Quote> {
        self.latest_prices(api, std::slice::from_ref(symbol))
            .await?
            .into_iter()
            .find(|q| &q.symbol == symbol)
            .ok_or_else(|| Error::SecurityNotFound(symbol.to_string()))
    }

    async fn latest_prices(&self, api: &ClientInner, symbols: &[Symbol]) -> Result<Vec<Quote>> {
        if symbols.is_empty() {
            return Ok(Vec::new());
        }
        let message = wire::MultiPriceRequest {
            symbols: symbols.iter().map(Symbol::to_string).collect(),
        };
        let request = ApiRequest::protobuf(
            "getLatestPrices",
            &self.latest_prices_url,
            message.encode_to_vec(),
        );
        let body = api.call(&request).await?;
        let response: wire::MultiPriceResponse = decode(&body)?;
        Ok(response.prices.into_iter().map(quote_from_wire).collect())
    }

    async fn nbbo(&self, api: &ClientInner, symbol: &Symbol) -> Result<Nbbo> {
        let message = wire::NbboRequest {
            symbol: symbol.to_string(),
        };
        let request = ApiRequest::protobuf("getNbboPrice", &self.nbbo_url, message.encode_to_vec());
        let body = api.call(&request).await?;
        let nbbo: wire::NbboResponse = decode(&body)?;

        Ok(Nbbo {
            symbol: if nbbo.symbol.is_empty() {
                symbol.clone()
            } else {
                Symbol::new(nbbo.symbol)
            },
            bid: decimal_from_f64(nbbo.bid),
            bid_size: decimal_from_f64(nbbo.bid_size),
            ask: decimal_from_f64(nbbo.ask),
            ask_size: decimal_from_f64(nbbo.ask_size),
            timestamp: nbbo.timestamp.as_ref().and_then(to_datetime),
        })
    }

    async fn place_order(
        &self,
        api: &ClientInner,
        order: &OrderRequest,
    ) -> Result<PlaceOrderOutcome> {
        order.validate()?;
        let request = self.create_order_request(order)?;

        if order.dry_run {
            debug!(symbol = %order.symbol, "dry run; order not sent");
            return Ok(PlaceOrderOutcome::DryRun(request));
        }

        let body = api.call(&request).await?;
        let response: wire::OrderResponse = decode(&body)?;
        Ok(PlaceOrderOutcome::Submitted(order_response_from_wire(
            response,
        )))
    }

    async fn list_orders(
        &self,
        api: &ClientInner,
        account_id: &AccountId,
        since: DateTime<Utc>,
    ) -> Result<Vec<Order>> {
        let message = wire::ListOrdersRequest {
            account_id: account_id.to_string(),
            since_date: Some(to_timestamp(since)),
        };
        let request =
            ApiRequest::protobuf("listOrders", &self.list_orders_url, message.encode_to_vec());
        let body = api.call(&request).await?;
        let response: wire::ListOrdersResponse = decode(&body)?;
        Ok(response.orders.into_iter().map(order_from_wire).collect())
    }

    async fn get_order(&self, api: &ClientInner, order_id: &OrderId) -> Result<Order> {
        let message = wire::GetOrderRequest {
            order_id: order_id.to_string(),
        };
        let request =
            ApiRequest::protobuf("getOrder", &self.get_order_url, message.encode_to_vec());
        let body = api.call(&request).await?;
        let order: wire::Order = decode(&body)?;
        Ok(order_from_wire(order))
    }

    async fn cancel_order(&self, api: &ClientInner, order_id: &OrderId) -> Result<OrderResponse> {
        let message = wire::CancelOrderRequest {
            order_id: order_id.to_string(),
        };
        let request = ApiRequest::protobuf(
            "cancelOrder",
            &self.cancel_order_url,
            message.encode_to_vec(),
        );
        let body = api.call(&request).await?;
        let response: wire::OrderResponse = decode(&body)?;
        Ok(order_response_from_wire(response))
    }
}
