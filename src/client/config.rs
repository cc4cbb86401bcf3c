//! Client configuration options.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::{Error, Result, Revision};

/// Public OAuth client id of the official mobile app.
pub const DEFAULT_CLIENT_ID: &str = "FXGlhcVdamwozAFp8BZ2MWl6coPl6agX";

/// User-Agent the official mobile app sends.
pub const DEFAULT_USER_AGENT: &str = "Dart/3.3 (dart:io)";

/// Configuration for the Fennel client.
///
/// Every default can be overridden, which is how tests point the client at a
/// mock server.
///
/// # Example
///
/// ```
/// use fennel_invest::{ClientConfig, Revision};
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_revision(Revision::GraphQl)
///     .with_timeout(Duration::from_secs(30))
///     .with_credentials_file("alice.json");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend revision to talk to
    pub revision: Revision,
    /// Base URL of the identity provider (passwordless start, OAuth token)
    pub identity_url: String,
    /// GraphQL endpoint (GraphQL revisions)
    pub graphql_url: String,
    /// Base URL of the HTTP+protobuf API
    pub api_url: String,
    /// OAuth client id used when no stored credential overrides it
    pub client_id: String,
    /// User-Agent header value
    pub user_agent: String,
    /// OAuth scope requested at token exchange
    pub scope: String,
    /// OAuth audience requested at token exchange
    pub audience: String,
    /// Timeout applied to every request
    pub timeout: Duration,
    /// Directory holding the persisted credential
    pub credentials_dir: PathBuf,
    /// File name of the persisted credential
    pub credentials_file: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            revision: Revision::default(),
            identity_url: "https://accounts.fennel.com".to_string(),
            graphql_url: "https://fennel-api.prod.fennel.com/graphql/".to_string(),
            api_url: "https://api.fennel.com".to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            scope: "openid profile offline_access email".to_string(),
            audience: "https://meta.api.fennel.com/graphql".to_string(),
            timeout: Duration::from_secs(10),
            credentials_dir: PathBuf::from("creds"),
            credentials_file: "fennel_credentials.json".to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the backend revision.
    pub fn with_revision(mut self, revision: Revision) -> Self {
        self.revision = revision;
        self
    }

    /// Set the identity provider base URL.
    pub fn with_identity_url(mut self, url: impl Into<String>) -> Self {
        self.identity_url = url.into();
        self
    }

    /// Set the GraphQL endpoint.
    pub fn with_graphql_url(mut self, url: impl Into<String>) -> Self {
        self.graphql_url = url.into();
        self
    }

    /// Set the protobuf API base URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set the default OAuth client id.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the directory holding the persisted credential.
    pub fn with_credentials_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.credentials_dir = dir.into();
        self
    }

    /// Set the file name of the persisted credential.
    pub fn with_credentials_file(mut self, file: impl Into<String>) -> Self {
        self.credentials_file = file.into();
        self
    }

    /// Full path of the persisted credential.
    pub fn credentials_path(&self) -> PathBuf {
        self.credentials_dir.join(&self.credentials_file)
    }

    /// `Host` header value sent to the identity provider.
    pub fn identity_host(&self) -> Result<String> {
        host_header(&self.identity_url)
    }

    /// `Host` header value sent to the API of the selected revision.
    pub fn api_host(&self) -> Result<String> {
        if self.revision.is_graphql() {
            host_header(&self.graphql_url)
        } else {
            host_header(&self.api_url)
        }
    }

    /// Check that the URLs parse and the required values are set.
    pub fn validate(&self) -> Result<()> {
        for url in [&self.identity_url, &self.graphql_url, &self.api_url] {
            host_header(url)?;
        }
        if self.client_id.trim().is_empty() {
            return Err(Error::Config("client_id must not be empty".to_string()));
        }
        if self.credentials_file.trim().is_empty() {
            return Err(Error::Config("credentials_file must not be empty".to_string()));
        }
        Ok(())
    }

    /// Join a path onto the identity URL.
    pub(crate) fn identity_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.identity_url.trim_end_matches('/'), path)
    }

    /// Join a path onto the protobuf API URL.
    pub(crate) fn api_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url.trim_end_matches('/'), path)
    }
}

fn host_header(url: &str) -> Result<String> {
    let parsed = Url::parse(url)?;
    let host = parsed
        .host_str()
        .ok_or_else(|| Error::Config(format!("URL has no host: {url}")))?;
    Ok(match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}
