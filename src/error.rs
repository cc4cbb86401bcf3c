//! Error types for the Fennel API client.
//!
//! Every failure surfaced by this crate is a variant of [`Error`]. Identity
//! provider failures, session expiry and remote call failures are kept apart
//! so callers can decide whether to re-run the login flow.

use thiserror::Error;

use crate::models::Revision;

/// A specialized `Result` type for Fennel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all Fennel API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed before a status was received
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Protobuf message could not be decoded
    #[error("Protobuf decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    /// Reading or writing the persisted credential failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// No session has been established (load or login first)
    #[error("Not authenticated; log in or load a stored credential first")]
    NotAuthenticated,

    /// The passwordless start request was rejected
    #[error("Passwordless start failed: status={status}, body={body}")]
    AuthStartFailed {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The one-time code could not be exchanged for tokens
    #[error("Token exchange failed: status={status}, body={body}")]
    AuthExchangeFailed {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The refresh token was rejected
    #[error("Token refresh failed: status={status}, body={body}")]
    RefreshFailed {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// A one-time code is needed but the caller cannot provide one now
    #[error("One-time code required; the code has been sent, call login again with it")]
    OtpRequired,

    /// A personal access token was rejected when first checked
    #[error("Access token was rejected")]
    InvalidToken,

    /// Both the stored and the refreshed token were rejected; credential destroyed
    #[error("Session expired; log in again")]
    SessionExpired,

    /// An authenticated API call returned a non-success status
    #[error("{operation} failed: status={status}, body={body}")]
    RemoteCallFailed {
        /// Name of the operation that failed
        operation: &'static str,
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The response parsed but did not contain the expected data
    #[error("{operation} returned an unexpected response: {message}")]
    UnexpectedResponse {
        /// Name of the operation
        operation: &'static str,
        /// What was wrong with the payload
        message: String,
    },

    /// Client-side parameter validation failed
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A ticker lookup returned no matching security
    #[error("Security not found: {0}")]
    SecurityNotFound(String),

    /// Orders cannot be placed while the market is closed
    #[error("Market is closed")]
    MarketClosed,

    /// The selected backend revision has no such operation
    #[error("{operation} is not supported by the {revision} backend")]
    Unsupported {
        /// Name of the operation
        operation: &'static str,
        /// The backend revision in use
        revision: Revision,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns `true` if this is an authentication-related error.
    ///
    /// # Example
    ///
    /// ```
    /// use fennel_invest::Error;
    ///
    /// assert!(Error::SessionExpired.is_auth_error());
    /// assert!(!Error::MarketClosed.is_auth_error());
    /// ```
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Error::NotAuthenticated
                | Error::AuthStartFailed { .. }
                | Error::AuthExchangeFailed { .. }
                | Error::RefreshFailed { .. }
                | Error::OtpRequired
                | Error::InvalidToken
                | Error::SessionExpired
        )
    }

    /// Returns `true` if this error indicates a client-side issue
    /// (invalid input, bad request, etc.).
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::RemoteCallFailed { status, .. } => *status >= 400 && *status < 500,
            Error::InvalidParameter(_)
            | Error::SecurityNotFound(_)
            | Error::Config(_)
            | Error::Unsupported { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a server-side issue.
    pub fn is_server_error(&self) -> bool {
        match self {
            Error::RemoteCallFailed { status, .. }
            | Error::AuthStartFailed { status, .. }
            | Error::AuthExchangeFailed { status, .. }
            | Error::RefreshFailed { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_auth() {
        assert!(Error::SessionExpired.is_auth_error());
        assert!(Error::NotAuthenticated.is_auth_error());
        assert!(Error::InvalidToken.is_auth_error());
        assert!(Error::RefreshFailed {
            status: 403,
            body: String::new()
        }
        .is_auth_error());
        assert!(!Error::MarketClosed.is_auth_error());
    }

    #[test]
    fn test_error_classification() {
        let err = Error::RemoteCallFailed {
            operation: "getAccounts",
            status: 404,
            body: "missing".into(),
        };
        assert!(err.is_client_error());
        assert!(!err.is_server_error());

        let err = Error::RemoteCallFailed {
            operation: "getAccounts",
            status: 503,
            body: String::new(),
        };
        assert!(err.is_server_error());
        assert!(Error::InvalidParameter("shares".into()).is_client_error());
    }

    #[test]
    fn test_remote_call_display() {
        let err = Error::RemoteCallFailed {
            operation: "cancelOrder",
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(err.to_string(), "cancelOrder failed: status=500, body=boom");
    }

    #[test]
    fn test_unsupported_display() {
        let err = Error::Unsupported {
            operation: "getNbboPrice",
            revision: Revision::GraphQl,
        };
        assert_eq!(
            err.to_string(),
            "getNbboPrice is not supported by the graphql backend"
        );
    }
}
