//! Protobuf messages of the HTTP+protobuf API.
//!
//! Exposed so callers and tests can decode raw payloads or build fixtures.

#![allow(missing_docs)]

use prost_types::Timestamp;

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AccountIdRequest {
    #[prost(string, tag = "1")]
    pub account_id: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum AccountStatus {
    Unspecified = 0,
    Pending = 1,
    Approved = 2,
    Closed = 3,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Account {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(message, optional, tag = "3")]
    pub created: Option<Timestamp>,
    #[prost(enumeration = "AccountStatus", tag = "4")]
    pub status: i32,
    #[prost(bool, tag = "5")]
    pub is_primary: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AccountsResponse {
    #[prost(message, repeated, tag = "1")]
    pub accounts: Vec<Account>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Position {
    #[prost(string, tag = "1")]
    pub symbol: String,
    #[prost(double, tag = "2")]
    pub shares: f64,
    #[prost(double, tag = "3")]
    pub market_value: f64,
    #[prost(double, optional, tag = "4")]
    pub cost_basis: Option<f64>,
    #[prost(double, optional, tag = "5")]
    pub price: Option<f64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PositionsResponse {
    #[prost(message, repeated, tag = "1")]
    pub positions: Vec<Position>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PortfolioSummaryResponse {
    #[prost(double, tag = "1")]
    pub cash_available: f64,
    #[prost(double, tag = "2")]
    pub buying_power: f64,
    #[prost(double, tag = "3")]
    pub withdrawable: f64,
    #[prost(double, tag = "4")]
    pub settled_cash: f64,
    #[prost(double, tag = "5")]
    pub reserved_cash: f64,
    #[prost(double, tag = "6")]
    pub total_equity_value: f64,
    #[prost(string, tag = "7")]
    pub currency: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MultiPriceRequest {
    #[prost(string, repeated, tag = "1")]
    pub symbols: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PriceResponse {
    #[prost(string, tag = "1")]
    pub symbol: String,
    #[prost(double, tag = "2")]
    pub price: f64,
    #[prost(message, optional, tag = "3")]
    pub timestamp: Option<Timestamp>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MultiPriceResponse {
    #[prost(message, repeated, tag = "1")]
    pub prices: Vec<PriceResponse>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NbboRequest {
    #[prost(string, tag = "1")]
    pub symbol: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NbboResponse {
    #[prost(string, tag = "1")]
    pub symbol: String,
    #[prost(double, tag = "2")]
    pub bid: f64,
    #[prost(double, tag = "3")]
    pub bid_size: f64,
    #[prost(double, tag = "4")]
    pub ask: f64,
    #[prost(double, tag = "5")]
    pub ask_size: f64,
    #[prost(message, optional, tag = "6")]
    pub timestamp: Option<Timestamp>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum Side {
    Unspecified = 0,
    Buy = 1,
    Sell = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum OrderType {
    Unspecified = 0,
    Market = 1,
    Limit = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum TimeInForce {
    Unspecified = 0,
    Day = 1,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum RoutingOption {
    Unspecified = 0,
    Exchange = 1,
    ExchangeAts = 2,
    ExchangeAtsSdp = 3,
    Quik = 4,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum OrderStatus {
    Unspecified = 0,
    Pending = 1,
    Open = 2,
    PartiallyFilled = 3,
    Filled = 4,
    Cancelled = 5,
    Rejected = 6,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateOrderRequest {
    #[prost(string, tag = "1")]
    pub account_id: String,
    #[prost(string, tag = "2")]
    pub symbol: String,
    #[prost(double, tag = "3")]
    pub shares: f64,
    #[prost(double, optional, tag = "4")]
    pub limit_price: Option<f64>,
    #[prost(enumeration = "Side", tag = "5")]
    pub side: i32,
    #[prost(enumeration = "OrderType", tag = "6")]
    pub order_type: i32,
    #[prost(enumeration = "TimeInForce", tag = "7")]
    pub time_in_force: i32,
    #[prost(enumeration = "RoutingOption", tag = "8")]
    pub route: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OrderResponse {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(enumeration = "OrderStatus", tag = "2")]
    pub status: i32,
    #[prost(string, optional, tag = "3")]
    pub message: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListOrdersRequest {
    #[prost(string, tag = "1")]
    pub account_id: String,
    #[prost(message, optional, tag = "2")]
    pub since_date: Option<Timestamp>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Order {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub account_id: String,
    #[prost(string, tag = "3")]
    pub symbol: String,
    #[prost(enumeration = "Side", tag = "4")]
    pub side: i32,
    #[prost(enumeration = "OrderType", tag = "5")]
    pub order_type: i32,
    #[prost(double, tag = "6")]
    pub shares: f64,
    #[prost(double, tag = "7")]
    pub filled_shares: f64,
    #[prost(double, optional, tag = "8")]
    pub limit_price: Option<f64>,
    #[prost(double, optional, tag = "9")]
    pub average_fill_price: Option<f64>,
    #[prost(enumeration = "OrderStatus", tag = "10")]
    pub status: i32,
    #[prost(message, optional, tag = "11")]
    pub created_at: Option<Timestamp>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListOrdersResponse {
    #[prost(message, repeated, tag = "1")]
    pub orders: Vec<Order>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetOrderRequest {
    #[prost(string, tag = "1")]
    pub order_id: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CancelOrderRequest {
    #[prost(string, tag = "1")]
    pub order_id: String,
}
