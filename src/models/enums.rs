//! Enumeration types for the Fennel API.
//!
//! Order enums parse from their upper-case wire names (`"BUY"`, `"LIMIT"`,
//! `"EXCHANGE_ATS_SDP"`) case-insensitively; anything else is rejected with
//! [`Error::InvalidParameter`](crate::Error::InvalidParameter).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Onboarding status of an account.
///
/// Only [`AccountStatus::Approved`] accounts can trade.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccountStatus {
    /// Application submitted, not yet approved
    Pending,
    /// Approved for trading
    Approved,
    /// Any other status reported by the backend
    Other(String),
}

impl AccountStatus {
    /// Returns `true` if the account may be used for trading.
    pub fn is_approved(&self) -> bool {
        matches!(self, AccountStatus::Approved)
    }
}

impl From<String> for AccountStatus {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "pending" => AccountStatus::Pending,
            "approved" => AccountStatus::Approved,
            _ => AccountStatus::Other(s),
        }
    }
}

impl From<AccountStatus> for String {
    fn from(status: AccountStatus) -> Self {
        match status {
            AccountStatus::Pending => "pending".to_string(),
            AccountStatus::Approved => "approved".to_string(),
            AccountStatus::Other(s) => s,
        }
    }
}

/// Side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    /// Buy shares
    Buy,
    /// Sell shares
    Sell,
}

impl OrderSide {
    /// Upper-case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }
}

impl FromStr for OrderSide {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BUY" => Ok(OrderSide::Buy),
            "SELL" => Ok(OrderSide::Sell),
            _ => Err(Error::InvalidParameter(format!(
                "invalid side: {s}; must be BUY or SELL"
            ))),
        }
    }
}

/// How the order is priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Execute at the current market price
    #[default]
    Market,
    /// Execute at the limit price or better
    Limit,
}

impl OrderType {
    /// Upper-case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
        }
    }
}

impl FromStr for OrderType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MARKET" => Ok(OrderType::Market),
            "LIMIT" => Ok(OrderType::Limit),
            _ => Err(Error::InvalidParameter(format!(
                "invalid order type: {s}; must be MARKET or LIMIT"
            ))),
        }
    }
}

/// Time in force. The backend only accepts day orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    /// Expires at the end of the trading day
    #[default]
    Day,
}

impl TimeInForce {
    /// Upper-case wire name.
    pub fn as_str(&self) -> &'static str {
        "DAY"
    }
}

impl FromStr for TimeInForce {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DAY" => Ok(TimeInForce::Day),
            _ => Err(Error::InvalidParameter(format!(
                "invalid time in force: {s}; must be DAY"
            ))),
        }
    }
}

/// Order routing option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Exchanges only
    #[default]
    Exchange,
    /// Exchanges and alternative trading systems
    ExchangeAts,
    /// Exchanges, ATSs and single-dealer platforms
    ExchangeAtsSdp,
    /// Quik routing
    Quik,
}

impl Route {
    /// Upper-case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Exchange => "EXCHANGE",
            Route::ExchangeAts => "EXCHANGE_ATS",
            Route::ExchangeAtsSdp => "EXCHANGE_ATS_SDP",
            Route::Quik => "QUIK",
        }
    }
}

impl FromStr for Route {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "EXCHANGE" => Ok(Route::Exchange),
            "EXCHANGE_ATS" => Ok(Route::ExchangeAts),
            "EXCHANGE_ATS_SDP" => Ok(Route::ExchangeAtsSdp),
            "QUIK" => Ok(Route::Quik),
            _ => Err(Error::InvalidParameter(format!(
                "invalid route: {s}; must be EXCHANGE, EXCHANGE_ATS, EXCHANGE_ATS_SDP or QUIK"
            ))),
        }
    }
}

/// Lifecycle status of a submitted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Status not reported
    #[default]
    Unknown,
    /// Accepted, not yet working
    Pending,
    /// Working at the venue
    Open,
    /// Some shares filled
    PartiallyFilled,
    /// Completely filled
    Filled,
    /// Cancelled by the user or the system
    Cancelled,
    /// Rejected by the broker or venue
    Rejected,
}

impl OrderStatus {
    /// Returns `true` if the order can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Filled | OrderStatus::Cancelled | OrderStatus::Rejected
        )
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(OrderSide, OrderType, TimeInForce, Route);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_side() {
        assert_eq!("BUY".parse::<OrderSide>().unwrap(), OrderSide::Buy);
        assert_eq!("sell".parse::<OrderSide>().unwrap(), OrderSide::Sell);
        assert!(matches!(
            "HOLD".parse::<OrderSide>(),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_parse_order_type_and_route() {
        assert_eq!("limit".parse::<OrderType>().unwrap(), OrderType::Limit);
        assert!("STOP".parse::<OrderType>().is_err());
        assert_eq!(
            "exchange_ats_sdp".parse::<Route>().unwrap(),
            Route::ExchangeAtsSdp
        );
        assert!("DARK".parse::<Route>().is_err());
        assert!("GTC".parse::<TimeInForce>().is_err());
    }

    #[test]
    fn test_account_status_from_wire() {
        let status: AccountStatus = serde_json::from_str("\"APPROVED\"").unwrap();
        assert!(status.is_approved());
        let status: AccountStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(status, AccountStatus::Pending);
        let status: AccountStatus = serde_json::from_str("\"closed\"").unwrap();
        assert_eq!(status, AccountStatus::Other("closed".into()));
    }

    #[test]
    fn test_graphql_wire_names() {
        assert_eq!(serde_json::to_string(&OrderSide::Buy).unwrap(), "\"buy\"");
        assert_eq!(
            serde_json::to_string(&Route::ExchangeAtsSdp).unwrap(),
            "\"exchange_ats_sdp\""
        );
        assert_eq!(serde_json::to_string(&TimeInForce::Day).unwrap(), "\"day\"");
    }

    #[test]
    fn test_order_status_terminal() {
        assert!(OrderStatus::Filled.is_terminal());
        assert!(!OrderStatus::Open.is_terminal());
    }
}
