//! Session lifecycle: load, acquire, verify, refresh, invalidate.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::credential::{Credential, TokenSet};
use super::otp::OtpSource;
use crate::backend::check_envelope;
use crate::client::request::{dispatch, identity_headers};
use crate::client::{ApiRequest, ClientConfig, HttpRequest, HttpResponse, Transport};
use crate::store::CredentialStore;
use crate::{Error, Result};

const PASSWORDLESS_START_PATH: &str = "/passwordless/start";
const OAUTH_TOKEN_PATH: &str = "/oauth/token";
const PASSWORDLESS_OTP_GRANT: &str = "http://auth0.com/oauth/grant-type/passwordless/otp";

/// What the session is currently holding.
enum Held {
    /// Tokens from the passwordless flow; refreshed and persisted.
    Credential(Credential),
    /// A personal access token; never refreshed or persisted.
    Token(SecretString),
}

/// Owns the credential and its lifecycle.
///
/// The manager starts empty. [`load`](Self::load) restores a persisted
/// credential and [`acquire_interactive`](Self::acquire_interactive) runs the
/// passwordless flow. [`authenticate_with_token`](Self::authenticate_with_token)
/// uses a personal access token instead. [`ensure_valid`](Self::ensure_valid)
/// runs before every authenticated call.
///
/// Operations are expected to be driven by one caller at a time; the lock
/// only protects the credential value, it does not serialise whole flows.
pub struct SessionManager {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    store: Arc<dyn CredentialStore>,
    probe: ApiRequest,
    held: RwLock<Option<Held>>,
}

impl SessionManager {
    /// Create an empty session manager.
    ///
    /// `probe` is the cheap authenticated read used by [`verify`](Self::verify).
    pub fn new(
        config: Arc<ClientConfig>,
        transport: Arc<dyn Transport>,
        store: Arc<dyn CredentialStore>,
        probe: ApiRequest,
    ) -> Self {
        Self {
            config,
            transport,
            store,
            probe,
            held: RwLock::new(None),
        }
    }

    /// Restore the persisted credential, if any.
    ///
    /// Never fails: a missing, partial or unreadable record leaves the session
    /// empty. Returns whether a credential was loaded.
    pub async fn load(&self) -> bool {
        let stored = match self.store.load().await {
            Ok(stored) => stored,
            Err(err) => {
                warn!(error = %err, "could not read stored credential; starting empty");
                None
            }
        };

        let credential = stored.and_then(|s| Credential::from_stored(s, &self.config.client_id));
        let loaded = credential.is_some();
        *self.held.write().await = credential.map(Held::Credential);
        debug!(loaded, "credential load finished");
        loaded
    }

    /// Run the passwordless email flow and persist the resulting credential.
    ///
    /// With [`OtpSource::Code`] the start request is skipped: the code belongs
    /// to a flow started earlier. With [`OtpSource::Unavailable`] the start
    /// request is sent, so the code gets emailed, and the call fails with
    /// [`Error::OtpRequired`] instead of waiting.
    pub async fn acquire_interactive(&self, email: &str, otp: OtpSource) -> Result<()> {
        let code = match otp {
            OtpSource::Code(code) => code,
            OtpSource::Provider(provider) => {
                self.start_passwordless(email).await?;
                // Providers may block (the console prompt reads stdin).
                let owned = email.to_string();
                tokio::task::spawn_blocking(move || provider.one_time_code(&owned))
                    .await
                    .unwrap_or_else(|err| {
                        warn!(error = %err, "one-time code provider did not finish");
                        None
                    })
                    .map(|code| code.trim().to_string())
                    .filter(|code| !code.is_empty())
                    .ok_or(Error::OtpRequired)?
            }
            OtpSource::Unavailable => {
                self.start_passwordless(email).await?;
                return Err(Error::OtpRequired);
            }
        };

        let client_id = self.client_id().await;
        let body = json!({
            "grant_type": PASSWORDLESS_OTP_GRANT,
            "client_id": client_id,
            "otp": code,
            "username": email,
            "realm": "email",
            "scope": self.config.scope,
            "audience": self.config.audience,
        });
        let response = self.post_identity(OAUTH_TOKEN_PATH, &body).await?;
        if !response.is_success() {
            return Err(Error::AuthExchangeFailed {
                status: response.status.as_u16(),
                body: response.text(),
            });
        }

        let tokens: TokenSet = serde_json::from_slice(&response.body)?;
        *self.held.write().await = Some(Held::Credential(Credential::new(
            tokens.access_token,
            tokens.refresh_token,
            tokens.id_token,
            client_id,
        )));
        info!("one-time code accepted");

        // The first refresh token is single-use on some backend revisions;
        // refreshing right away mints one that survives the next run.
        let finished = match self.refresh().await {
            Ok(()) => self.persist().await,
            Err(err) => Err(err),
        };
        if let Err(err) = finished {
            warn!(error = %err, "login did not complete; discarding tokens");
            self.held.write().await.take();
            return Err(err);
        }
        Ok(())
    }

    /// Use a personal access token instead of the passwordless flow.
    ///
    /// The token is checked once with the same read as [`verify`](Self::verify)
    /// and rejected with [`Error::InvalidToken`] if that fails. A token session
    /// is never refreshed and never written to the store.
    pub async fn authenticate_with_token(&self, token: impl Into<String>) -> Result<()> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(Error::InvalidParameter("access token is empty".to_string()));
        }

        *self.held.write().await = Some(Held::Token(SecretString::from(token)));
        if !self.verify().await {
            self.held.write().await.take();
            return Err(Error::InvalidToken);
        }
        info!("access token accepted");
        Ok(())
    }

    /// Exchange the refresh token for a new set of tokens.
    ///
    /// On failure the credential is left untouched. Nothing is persisted.
    pub async fn refresh(&self) -> Result<()> {
        let (refresh_token, client_id) = match self.held.read().await.as_ref() {
            Some(Held::Credential(credential)) => (
                credential.refresh_token().clone(),
                credential.client_id().to_string(),
            ),
            Some(Held::Token(_)) => {
                return Err(Error::Unsupported {
                    operation: "refresh",
                    revision: self.config.revision,
                })
            }
            None => return Err(Error::NotAuthenticated),
        };

        let body = json!({
            "grant_type": "refresh_token",
            "client_id": client_id,
            "refresh_token": refresh_token.expose_secret(),
            "scope": self.config.scope,
        });
        let response = self.post_identity(OAUTH_TOKEN_PATH, &body).await?;
        if !response.is_success() {
            warn!(status = response.status.as_u16(), "token refresh rejected");
            return Err(Error::RefreshFailed {
                status: response.status.as_u16(),
                body: response.text(),
            });
        }

        let tokens: TokenSet = serde_json::from_slice(&response.body)?;
        match self.held.write().await.as_mut() {
            Some(Held::Credential(credential)) => credential.replace_tokens(tokens),
            _ => return Err(Error::NotAuthenticated),
        }
        debug!("access token refreshed");
        Ok(())
    }

    /// Probe the access token with a cheap authenticated read.
    ///
    /// Any failure, including an empty session, counts as invalid. On GraphQL
    /// revisions a body carrying `errors` is a failure too.
    pub async fn verify(&self) -> bool {
        let token = match self.access_token().await {
            Ok(token) => token,
            Err(_) => return false,
        };

        let outcome = dispatch(self.transport.as_ref(), &self.config, &self.probe, &token)
            .await
            .and_then(|body| {
                if self.config.revision.is_graphql() {
                    check_envelope(self.probe.operation, &body)
                } else {
                    Ok(())
                }
            });
        match outcome {
            Ok(()) => true,
            Err(err) => {
                debug!(error = %err, "token probe failed");
                false
            }
        }
    }

    /// Make sure the session can be used for an authenticated call.
    ///
    /// An empty session fails with [`Error::NotAuthenticated`] without touching
    /// the network. Otherwise the token is probed; if rejected it is refreshed
    /// exactly once and probed again. If that also fails the credential is
    /// cleared, the persisted record deleted, and [`Error::SessionExpired`]
    /// returned. A rejected access token session expires without a refresh
    /// and leaves the store alone.
    pub async fn ensure_valid(&self) -> Result<()> {
        if !self.is_authenticated().await {
            return Err(Error::NotAuthenticated);
        }
        if self.verify().await {
            return Ok(());
        }

        if self.is_token_session().await {
            warn!("access token rejected; session expired");
            self.held.write().await.take();
            return Err(Error::SessionExpired);
        }

        info!("access token rejected; refreshing");
        let refreshed = match self.refresh().await {
            Ok(()) => true,
            Err(err) => {
                debug!(error = %err, "refresh failed");
                false
            }
        };
        if refreshed && self.verify().await {
            if let Err(err) = self.persist().await {
                warn!(error = %err, "refreshed credential could not be persisted");
            }
            return Ok(());
        }

        warn!("session expired; clearing credential");
        self.invalidate().await;
        Err(Error::SessionExpired)
    }

    /// Write the current credential to the store.
    ///
    /// Access token sessions have nothing to persist; this is a no-op for them.
    pub async fn persist(&self) -> Result<()> {
        let stored = match self.held.read().await.as_ref() {
            Some(Held::Credential(credential)) => credential.to_stored(),
            Some(Held::Token(_)) => {
                debug!("access token sessions are not persisted");
                return Ok(());
            }
            None => return Err(Error::NotAuthenticated),
        };
        self.store.save(&stored).await
    }

    /// Clear the credential and delete the persisted record.
    pub async fn invalidate(&self) {
        self.held.write().await.take();
        if let Err(err) = self.store.delete().await {
            warn!(error = %err, "could not delete stored credential");
        }
    }

    /// Returns `true` if a credential is held. Says nothing about validity.
    pub async fn is_authenticated(&self) -> bool {
        self.held.read().await.is_some()
    }

    /// Returns `true` if the session runs on a personal access token.
    pub async fn is_token_session(&self) -> bool {
        matches!(self.held.read().await.as_ref(), Some(Held::Token(_)))
    }

    /// Client id of the held credential, or the configured default.
    pub async fn client_id(&self) -> String {
        match self.held.read().await.as_ref() {
            Some(Held::Credential(credential)) => credential.client_id().to_string(),
            _ => self.config.client_id.clone(),
        }
    }

    /// Current access token.
    pub(crate) async fn access_token(&self) -> Result<SecretString> {
        match self.held.read().await.as_ref() {
            Some(Held::Credential(credential)) => Ok(credential.access_token().clone()),
            Some(Held::Token(token)) => Ok(token.clone()),
            None => Err(Error::NotAuthenticated),
        }
    }

    async fn start_passwordless(&self, email: &str) -> Result<()> {
        let body = json!({
            "email": email,
            "client_id": self.client_id().await,
            "connection": "email",
            "send": "code",
        });
        let response = self.post_identity(PASSWORDLESS_START_PATH, &body).await?;
        if !response.is_success() {
            return Err(Error::AuthStartFailed {
                status: response.status.as_u16(),
                body: response.text(),
            });
        }
        info!("one-time code sent by email");
        Ok(())
    }

    async fn post_identity(&self, path: &str, body: &serde_json::Value) -> Result<HttpResponse> {
        let request = HttpRequest {
            method: reqwest::Method::POST,
            url: self.config.identity_endpoint(path),
            headers: identity_headers(&self.config)?,
            body: serde_json::to_vec(body)?.into(),
        };
        self.transport.send(request).await
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("revision", &self.config.revision)
            .field("probe", &self.probe.operation)
            .field("credential", &"[REDACTED]")
            .finish()
    }
}
