//! Market data models: quotes, NBBO and security search results.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::primitives::{Isin, Symbol};

/// Latest trade price for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Ticker
    pub symbol: Symbol,
    /// Last price
    pub price: Decimal,
    /// ISIN when known (GraphQL revisions)
    pub isin: Option<Isin>,
    /// Time of the price, when reported
    pub timestamp: Option<DateTime<Utc>>,
}

/// National best bid and offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nbbo {
    /// Ticker
    pub symbol: Symbol,
    /// Best bid
    pub bid: Decimal,
    /// Shares at the best bid
    pub bid_size: Decimal,
    /// Best ask
    pub ask: Decimal,
    /// Shares at the best ask
    pub ask_size: Decimal,
    /// Time of the quote, when reported
    pub timestamp: Option<DateTime<Utc>>,
}

impl Nbbo {
    /// Midpoint of bid and ask.
    pub fn mid(&self) -> Decimal {
        (self.bid + self.ask) / Decimal::TWO
    }

    /// Ask minus bid.
    pub fn spread(&self) -> Decimal {
        self.ask - self.bid
    }
}

/// A security returned by the GraphQL search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityMatch {
    /// ISIN used to place orders
    pub isin: Isin,
    /// Ticker
    pub ticker: Symbol,
    /// Current price
    pub price: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_nbbo_mid_and_spread() {
        let nbbo = Nbbo {
            symbol: Symbol::new("SPY"),
            bid: dec!(500.10),
            bid_size: dec!(100),
            ask: dec!(500.30),
            ask_size: dec!(200),
            timestamp: None,
        };
        assert_eq!(nbbo.mid(), dec!(500.20));
        assert_eq!(nbbo.spread(), dec!(0.20));
    }
}
