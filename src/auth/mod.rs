//! Authentication and session management for the Fennel API.
//!
//! Fennel uses a passwordless email flow:
//!
//! 1. A start request asks the identity provider to email a one-time code.
//! 2. The code is exchanged for an access, refresh and id token.
//!
//! The resulting [`Credential`] is persisted through a
//! [`CredentialStore`](crate::store::CredentialStore) and re-used across runs.
//! Before every authenticated call the [`SessionManager`] checks the token by
//! issuing a cheap read; a rejected token is refreshed once, and if that does
//! not help the credential is destroyed.
//!
//! ```no_run
//! use fennel_invest::{ClientConfig, FennelClient};
//! use fennel_invest::auth::OtpSource;
//!
//! # async fn example() -> fennel_invest::Result<()> {
//! let client = FennelClient::new(ClientConfig::default())?;
//! if !client.load_session().await {
//!     client.login("me@example.com", OtpSource::console()).await?;
//! }
//! # Ok(())
//! # }
//! ```

mod credential;
mod otp;
mod session;

pub use credential::Credential;
pub use otp::{ConsolePrompt, OtpProvider, OtpSource};
pub use session::SessionManager;
