//! API service modules for Fennel operations.
//!
//! Each service is a thin handle on the shared client. Every method checks
//! the session first, then hands the call to the backend revision in use.

mod accounts;
mod market_data;
mod orders;
mod portfolio;

pub use accounts::AccountsService;
pub use market_data::MarketDataService;
pub use orders::OrdersService;
pub use portfolio::PortfolioService;
