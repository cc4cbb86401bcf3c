//! HTTP client and service layer for the Fennel API.
//!
//! This module provides the main entry point [`FennelClient`], its
//! [`ClientConfig`], and the [`Transport`] seam every request goes through.
//!
//! # Example
//!
//! ```no_run
//! use fennel_invest::{ClientConfig, FennelClient, Revision};
//!
//! # async fn example() -> fennel_invest::Result<()> {
//! let client = FennelClient::new(ClientConfig::default().with_revision(Revision::GraphQl))?;
//! client.load_session().await;
//!
//! let accounts = client.accounts().list().await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod http;
pub(crate) mod request;
mod transport;

pub use config::{ClientConfig, DEFAULT_CLIENT_ID, DEFAULT_USER_AGENT};
pub use http::FennelClient;
pub use request::{ApiRequest, RequestBody};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub(crate) use http::ClientInner;
