//! The session credential.

use secrecy::{ExposeSecret, SecretString};

use crate::store::StoredCredential;

/// Tokens issued by the identity provider plus the OAuth client id they
/// belong to.
///
/// A `Credential` is always fully populated; the absence of a session is
/// modelled as `Option<Credential>::None` by the session manager.
#[derive(Clone)]
pub struct Credential {
    access_token: SecretString,
    refresh_token: SecretString,
    id_token: SecretString,
    client_id: String,
}

impl Credential {
    /// Build a credential from raw token strings.
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        id_token: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            refresh_token: SecretString::from(refresh_token.into()),
            id_token: SecretString::from(id_token.into()),
            client_id: client_id.into(),
        }
    }

    /// Restore a credential from its persisted form.
    ///
    /// Returns `None` when any token is blank; a partial record is treated
    /// the same as no record.
    pub fn from_stored(stored: StoredCredential, default_client_id: &str) -> Option<Self> {
        if stored.access_token.is_empty()
            || stored.refresh_token.is_empty()
            || stored.id_token.is_empty()
        {
            return None;
        }
        let client_id = stored
            .client_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| default_client_id.to_string());
        Some(Self::new(
            stored.access_token,
            stored.refresh_token,
            stored.id_token,
            client_id,
        ))
    }

    /// The persisted form of this credential.
    pub fn to_stored(&self) -> StoredCredential {
        StoredCredential {
            access_token: self.access_token.expose_secret().to_string(),
            refresh_token: self.refresh_token.expose_secret().to_string(),
            id_token: self.id_token.expose_secret().to_string(),
            client_id: Some(self.client_id.clone()),
        }
    }

    /// OAuth client id.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub(crate) fn access_token(&self) -> &SecretString {
        &self.access_token
    }

    pub(crate) fn refresh_token(&self) -> &SecretString {
        &self.refresh_token
    }

    /// Replace all three tokens, keeping the client id.
    pub(crate) fn replace_tokens(&mut self, tokens: TokenSet) {
        self.access_token = SecretString::from(tokens.access_token);
        self.refresh_token = SecretString::from(tokens.refresh_token);
        self.id_token = SecretString::from(tokens.id_token);
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("id_token", &"[REDACTED]")
            .field("client_id", &self.client_id)
            .finish()
    }
}

/// Token fields of an OAuth token response.
#[derive(serde::Deserialize)]
pub(crate) struct TokenSet {
    pub access_token: String,
    pub refresh_token: String,
    pub id_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(client_id: Option<&str>) -> StoredCredential {
        StoredCredential {
            access_token: "a".into(),
            refresh_token: "r".into(),
            id_token: "i".into(),
            client_id: client_id.map(String::from),
        }
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let credential = Credential::new("super-secret-token", "r", "i", "client");
        let debug_str = format!("{:?}", credential);
        assert!(!debug_str.contains("super-secret-token"));
        assert!(debug_str.contains("REDACTED"));
        assert!(debug_str.contains("client"));
    }

    #[test]
    fn test_from_stored_client_id_fallback() {
        let credential = Credential::from_stored(stored(None), "default").unwrap();
        assert_eq!(credential.client_id(), "default");

        let credential = Credential::from_stored(stored(Some("saved")), "default").unwrap();
        assert_eq!(credential.client_id(), "saved");
    }

    #[test]
    fn test_partial_record_is_absent() {
        let mut partial = stored(None);
        partial.refresh_token.clear();
        assert!(Credential::from_stored(partial, "default").is_none());
    }

    #[test]
    fn test_replace_tokens_keeps_client_id() {
        let mut credential = Credential::new("a", "r", "i", "client");
        credential.replace_tokens(TokenSet {
            access_token: "a2".into(),
            refresh_token: "r2".into(),
            id_token: "i2".into(),
        });
        let stored = credential.to_stored();
        assert_eq!(stored.access_token, "a2");
        assert_eq!(stored.refresh_token, "r2");
        assert_eq!(stored.id_token, "i2");
        assert_eq!(stored.client_id.as_deref(), Some("client"));
    }
}
