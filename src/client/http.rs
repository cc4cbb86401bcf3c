//! Client entry point.

use bytes::Bytes;
use std::sync::Arc;

use crate::api::{AccountsService, MarketDataService, OrdersService, PortfolioService};
use crate::auth::{OtpSource, SessionManager};
use crate::backend::{self, Backend};
use crate::store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
use crate::{Result, Revision};

use super::config::ClientConfig;
use super::request::{dispatch, ApiRequest};
use super::transport::{ReqwestTransport, Transport};

/// The main client for interacting with the Fennel API.
///
/// The client owns the [`SessionManager`] and hands out service structs for
/// each area of the API. Every service method checks the session with
/// [`SessionManager::ensure_valid`] before sending anything.
///
/// # Example
///
/// ```no_run
/// use fennel_invest::{ClientConfig, FennelClient};
/// use fennel_invest::auth::OtpSource;
///
/// # async fn example() -> fennel_invest::Result<()> {
/// let client = FennelClient::new(ClientConfig::default())?;
/// if !client.load_session().await {
///     client.login("me@example.com", OtpSource::console()).await?;
/// }
///
/// for account in client.accounts().list().await? {
///     let summary = client.portfolio().summary(&account.id).await?;
///     println!("{}: {}", account.name, summary.total_equity_value);
/// }
/// # Ok(())
/// # }
/// ```
pub struct FennelClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) config: Arc<ClientConfig>,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) session: SessionManager,
    pub(crate) backend: Box<dyn Backend>,
}

impl FennelClient {
    /// Create a client using `reqwest` and a credential file at
    /// [`ClientConfig::credentials_path`].
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new(config.timeout)?);
        let store = Arc::new(FileCredentialStore::new(config.credentials_path()));
        Self::with_parts(config, transport, store)
    }

    /// Create a client that authenticates with a personal access token.
    ///
    /// The token is checked once before this returns and is kept in memory
    /// only. Fails with [`Error::InvalidToken`](crate::Error::InvalidToken)
    /// if the backend rejects it.
    ///
    /// ```no_run
    /// use fennel_invest::{ClientConfig, FennelClient};
    ///
    /// # async fn example() -> fennel_invest::Result<()> {
    /// let client = FennelClient::with_token(ClientConfig::default(), "my-token").await?;
    /// let accounts = client.accounts().list().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn with_token(config: ClientConfig, token: impl Into<String>) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new(config.timeout)?);
        let client = Self::with_parts(config, transport, Arc::new(MemoryCredentialStore::new()))?;
        client.login_with_token(token).await?;
        Ok(client)
    }

    /// Create a client with a custom transport and credential store.
    pub fn with_parts(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self> {
        config.validate()?;
        let config = Arc::new(config);
        let backend = backend::for_config(&config);
        let session = SessionManager::new(
            config.clone(),
            transport.clone(),
            store,
            backend.probe_request(),
        );

        Ok(Self {
            inner: Arc::new(ClientInner {
                config,
                transport,
                session,
                backend,
            }),
        })
    }

    /// Restore a persisted session. Returns whether one was found.
    pub async fn load_session(&self) -> bool {
        self.inner.session.load().await
    }

    /// Log in with the passwordless email flow.
    ///
    /// See [`SessionManager::acquire_interactive`].
    pub async fn login(&self, email: &str, otp: OtpSource) -> Result<()> {
        self.inner.session.acquire_interactive(email, otp).await
    }

    /// Log in with a personal access token.
    ///
    /// See [`SessionManager::authenticate_with_token`].
    pub async fn login_with_token(&self, token: impl Into<String>) -> Result<()> {
        self.inner.session.authenticate_with_token(token).await
    }

    /// Log out: forget the credential and delete the persisted copy.
    pub async fn logout(&self) {
        self.inner.session.invalidate().await
    }

    /// Get the accounts service.
    pub fn accounts(&self) -> AccountsService {
        AccountsService::new(self.inner.clone())
    }

    /// Get the portfolio service.
    pub fn portfolio(&self) -> PortfolioService {
        PortfolioService::new(self.inner.clone())
    }

    /// Get the market data service.
    pub fn market_data(&self) -> MarketDataService {
        MarketDataService::new(self.inner.clone())
    }

    /// Get the orders service.
    pub fn orders(&self) -> OrdersService {
        OrdersService::new(self.inner.clone())
    }

    /// Get a reference to the session manager.
    pub fn session(&self) -> &SessionManager {
        &self.inner.session
    }

    /// Backend revision this client talks to.
    pub fn revision(&self) -> Revision {
        self.inner.config.revision
    }

    /// The configuration in use.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }
}

impl ClientInner {
    /// Ensure the session is valid before making a request.
    pub(crate) async fn ensure_session_valid(&self) -> Result<()> {
        self.session.ensure_valid().await
    }

    /// Send an authenticated request with the current bearer token.
    pub(crate) async fn call(&self, request: &ApiRequest) -> Result<Bytes> {
        let token = self.session.access_token().await?;
        dispatch(self.transport.as_ref(), &self.config, request, &token).await
    }
}

impl Clone for FennelClient {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for FennelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FennelClient")
            .field("config", &self.inner.config)
            .field("session", &self.inner.session)
            .finish()
    }
}
