//! # fennel-invest-rs
//!
//! An unofficial Rust client for the Fennel brokerage API.
//!
//! The crate handles passwordless email sign-in, keeps the resulting tokens
//! fresh, and wraps the brokerage calls: accounts, portfolio, quotes, market
//! hours and orders. Fennel has shipped several backend revisions; pick one
//! with [`Revision`] and the client builds the matching requests.
//!
//! ## Features
//!
//! - **Authentication**: email one-time code sign-in with token refresh, or a
//!   personal access token via [`FennelClient::with_token`]
//! - **Session persistence**: credentials stored in a JSON file, or any
//!   [`CredentialStore`](store::CredentialStore) you provide
//! - **Portfolio**: cash balances, total equity and holdings
//! - **Market Data**: quotes, NBBO, market hours and security search
//! - **Orders**: market and limit orders with dry-run support
//! - **Pluggable transport**: bring your own HTTP layer via [`client::Transport`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fennel_invest::{ClientConfig, FennelClient, Revision};
//! use fennel_invest::auth::OtpSource;
//!
//! #[tokio::main]
//! async fn main() -> fennel_invest::Result<()> {
//!     let config = ClientConfig::default().with_revision(Revision::GraphQl);
//!     let client = FennelClient::new(config)?;
//!
//!     // Reuse saved credentials, otherwise ask for a code on stdin
//!     if !client.load_session().await {
//!         client.login("me@example.com", OtpSource::console()).await?;
//!     }
//!
//!     let accounts = client.accounts().list().await?;
//!     println!("Found {} accounts", accounts.len());
//!
//!     if let Some(account) = accounts.first() {
//!         let summary = client.portfolio().summary(&account.id).await?;
//!         println!("Equity: {}", summary.total_equity_value);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Order Placement
//!
//! ```rust,no_run
//! use fennel_invest::{ClientConfig, FennelClient};
//! use fennel_invest::models::{OrderRequestBuilder, OrderSide, OrderType, PlaceOrderOutcome};
//! use rust_decimal_macros::dec;
//!
//! #[tokio::main]
//! async fn main() -> fennel_invest::Result<()> {
//!     let client = FennelClient::new(ClientConfig::default())?;
//!     client.load_session().await;
//!
//!     let order = OrderRequestBuilder::new()
//!         .account_id("acc-1")
//!         .symbol("AAPL")
//!         .side(OrderSide::Buy)
//!         .shares(dec!(2))
//!         .order_type(OrderType::Limit)
//!         .limit_price(dec!(150.00))
//!         .build()?;
//!
//!     if let PlaceOrderOutcome::Submitted(response) = client.orders().place(&order).await? {
//!         println!("Order placed: {:?}", response.order_id);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
mod backend;
pub mod client;
pub mod error;
pub mod models;
pub mod store;

pub use backend::wire;

// Re-export primary types at crate root for convenience
pub use auth::SessionManager;
pub use client::{ClientConfig, FennelClient};
pub use error::{Error, Result};
pub use models::{AccountId, Isin, OrderId, Revision, Symbol};

/// Prelude module for convenient imports.
///
/// ```rust
/// use fennel_invest::prelude::*;
/// ```
pub mod prelude {
    pub use crate::auth::{OtpProvider, OtpSource, SessionManager};
    pub use crate::client::{ClientConfig, FennelClient};
    pub use crate::error::{Error, Result};
    pub use crate::models::{
        // Primitives
        AccountId, Isin, OrderId, Revision, Symbol,
        // Enums
        AccountStatus, OrderSide, OrderStatus, OrderType, Route, TimeInForce,
        // Models
        Account, CashBalance, Holding, Nbbo, Order, OrderRequest, OrderRequestBuilder,
        OrderResponse, PlaceOrderOutcome, PortfolioSummary, Quote, SecurityMatch,
    };
    pub use crate::store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
}
