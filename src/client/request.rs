//! Request payloads, header construction and authenticated dispatch.

use bytes::Bytes;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, AUTHORIZATION, CONTENT_TYPE, HOST, USER_AGENT,
};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use super::config::ClientConfig;
use super::transport::{HttpRequest, Transport};
use crate::{Error, Result};

const PROTOBUF: &str = "application/x-protobuf";

/// Body of an API request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// No body
    Empty,
    /// JSON document (GraphQL revisions)
    Json(serde_json::Value),
    /// Encoded protobuf message (protobuf revision)
    Protobuf(Vec<u8>),
}

impl RequestBody {
    fn to_bytes(&self) -> Result<Bytes> {
        Ok(match self {
            RequestBody::Empty => Bytes::new(),
            RequestBody::Json(value) => Bytes::from(serde_json::to_vec(value)?),
            RequestBody::Protobuf(bytes) => Bytes::from(bytes.clone()),
        })
    }
}

/// A named, authenticated API request before the bearer token is attached.
///
/// Returned as-is by dry-run order placement.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Operation name, used in errors and logs
    pub operation: &'static str,
    /// HTTP method
    pub method: Method,
    /// Absolute URL
    pub url: String,
    /// Payload
    pub body: RequestBody,
}

impl ApiRequest {
    /// A POST carrying a JSON document.
    pub fn json(operation: &'static str, url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            operation,
            method: Method::POST,
            url: url.into(),
            body: RequestBody::Json(body),
        }
    }

    /// A POST carrying an encoded protobuf message.
    pub fn protobuf(operation: &'static str, url: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            operation,
            method: Method::POST,
            url: url.into(),
            body: RequestBody::Protobuf(body),
        }
    }

    /// A body-less GET.
    pub fn get(operation: &'static str, url: impl Into<String>) -> Self {
        Self {
            operation,
            method: Method::GET,
            url: url.into(),
            body: RequestBody::Empty,
        }
    }
}

fn header_value(value: &str, what: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| Error::Config(format!("invalid {what} header value")))
}

/// Headers for calls to the identity provider.
pub(crate) fn identity_headers(config: &ClientConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(HOST, header_value(&config.identity_host()?, "host")?);
    headers.insert(USER_AGENT, header_value(&config.user_agent, "user-agent")?);
    Ok(headers)
}

/// Headers for authenticated API calls.
pub(crate) fn api_headers(
    config: &ClientConfig,
    body: &RequestBody,
    token: &SecretString,
) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, header_value(&config.user_agent, "user-agent")?);
    headers.insert(
        AUTHORIZATION,
        header_value(&format!("Bearer {}", token.expose_secret()), "authorization")?,
    );

    if config.revision.is_graphql() {
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(HOST, header_value(&config.api_host()?, "host")?);
    } else {
        headers.insert(ACCEPT, HeaderValue::from_static(PROTOBUF));
        if !matches!(body, RequestBody::Empty) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(PROTOBUF));
        }
    }
    Ok(headers)
}

/// Send an authenticated request; any non-success status becomes
/// [`Error::RemoteCallFailed`].
pub(crate) async fn dispatch(
    transport: &dyn Transport,
    config: &ClientConfig,
    request: &ApiRequest,
    token: &SecretString,
) -> Result<Bytes> {
    let http_request = HttpRequest {
        method: request.method.clone(),
        url: request.url.clone(),
        headers: api_headers(config, &request.body, token)?,
        body: request.body.to_bytes()?,
    };

    let response = transport.send(http_request).await?;
    debug!(
        operation = request.operation,
        status = response.status.as_u16(),
        "api call completed"
    );

    if !response.is_success() {
        return Err(Error::RemoteCallFailed {
            operation: request.operation,
            status: response.status.as_u16(),
            body: response.text(),
        });
    }
    Ok(response.body)
}
