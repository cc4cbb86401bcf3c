//! Portfolio summary and holdings models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::primitives::{Isin, Symbol};

/// Cash position and total equity of an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Total value of all equity positions
    pub total_equity_value: Decimal,
    /// Cash balances
    pub cash: CashBalance,
}

/// Cash balance breakdown.
///
/// Not every backend revision reports every field; missing values are zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashBalance {
    /// ISO currency code
    pub currency: String,
    /// Cash available to trade (buying power)
    pub can_trade: Decimal,
    /// Cash available to withdraw
    pub can_withdraw: Decimal,
    /// Cash reserved for working orders
    pub reserved_balance: Decimal,
    /// Settled cash
    pub settled_balance: Decimal,
    /// Trade-date cash balance
    pub trade_balance: Decimal,
    /// Pending trade-date decrease
    pub trade_decrease: Decimal,
    /// Pending trade-date increase
    pub trade_increase: Decimal,
}

/// A single equity position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Ticker
    pub symbol: Symbol,
    /// ISIN, when the backend reports one
    pub isin: Option<Isin>,
    /// Security name
    pub name: Option<String>,
    /// Security type, e.g. "stock" or "etf"
    pub security_type: Option<String>,
    /// Shares owned (may be fractional)
    pub shares: Decimal,
    /// Current market value of the position
    pub market_value: Decimal,
    /// Latest price per share
    pub price: Option<Decimal>,
    /// Total cost basis
    pub cost_basis: Option<Decimal>,
}
