//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Once};

use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;
use wiremock::MockServer;

use fennel_invest::client::{ReqwestTransport, Transport};
use fennel_invest::store::{CredentialStore, MemoryCredentialStore, StoredCredential};
use fennel_invest::{ClientConfig, FennelClient, Revision};

static INIT: Once = Once::new();

/// Initialize logging for tests
pub fn init_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// A config whose identity, GraphQL and protobuf URLs all point at `server`.
pub fn config_for(server: &MockServer, revision: Revision) -> ClientConfig {
    ClientConfig::default()
        .with_revision(revision)
        .with_identity_url(server.uri())
        .with_graphql_url(format!("{}/graphql/", server.uri()))
        .with_api_url(server.uri())
}

/// `Host` header value the client sends to the mock server.
pub fn mock_host(server: &MockServer) -> String {
    server.address().to_string()
}

pub fn stored(access: &str, refresh: &str) -> StoredCredential {
    StoredCredential {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
        id_token: "id-token".to_string(),
        client_id: None,
    }
}

pub fn token_body(access: &str, refresh: &str) -> Value {
    json!({
        "access_token": access,
        "refresh_token": refresh,
        "id_token": "id-token",
        "token_type": "Bearer",
        "expires_in": 86400
    })
}

/// Build a client against `server` with the given store, session restored.
pub async fn client_with_store(
    server: &MockServer,
    revision: Revision,
    store: Arc<MemoryCredentialStore>,
) -> FennelClient {
    init_logging();
    let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new(
        std::time::Duration::from_secs(5),
    )
    .unwrap());
    let client = FennelClient::with_parts(
        config_for(server, revision),
        transport,
        store as Arc<dyn CredentialStore>,
    )
    .unwrap();
    client.load_session().await;
    client
}

/// A client with a stored, valid-looking credential already loaded.
pub async fn logged_in_client(server: &MockServer, revision: Revision) -> FennelClient {
    let store = Arc::new(MemoryCredentialStore::with_credential(stored(
        "access-1",
        "refresh-1",
    )));
    client_with_store(server, revision, store).await
}
