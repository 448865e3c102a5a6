//! OAuth2 access tokens for a Google service account.
//!
//! Implements the JWT-bearer grant: a short-lived RS256 assertion signed with
//! the service account's private key is exchanged at the key's `token_uri`
//! for a bearer token. Tokens are cached until shortly before they expire.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::error::StorageError;

/// Scope needed to write objects and change their ACLs.
const STORAGE_SCOPE: &str = "https://www.googleapis.com/auth/devstorage.full_control";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for each assertion (Google's maximum).
const ASSERTION_TTL_SECS: i64 = 3600;

/// Tokens this close to expiry are refreshed.
const REFRESH_MARGIN_SECS: i64 = 60;

/// Fields of a service account key file that the exchange needs.
#[derive(Debug, Clone, Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn from_response(response: TokenResponse, now: DateTime<Utc>) -> Self {
        Self {
            value: response.access_token,
            expires_at: now + Duration::seconds(response.expires_in),
        }
    }

    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) < self.expires_at
    }
}

/// Issues bearer tokens for one service account.
pub struct TokenProvider {
    key: ServiceAccountKey,
    signing_key: EncodingKey,
    cached: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("client_email", &self.key.client_email)
            .field("token_uri", &self.key.token_uri)
            .finish_non_exhaustive()
    }
}

impl TokenProvider {
    /// Load a service account key file.
    ///
    /// # Errors
    ///
    /// Returns a credential error if the file cannot be read or is not a
    /// usable service account key.
    pub fn from_file(path: &Path) -> Result<Self, StorageError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            StorageError::credential(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&raw)
    }

    /// Parse a service account key from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns a credential error if required fields are missing or the
    /// private key is not a valid RSA PEM.
    pub fn from_json(raw: &str) -> Result<Self, StorageError> {
        let key: ServiceAccountKey = serde_json::from_str(raw)
            .map_err(|e| StorageError::credential(format!("malformed key file: {e}")))?;
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;

        Ok(Self {
            key,
            signing_key,
            cached: Mutex::new(None),
        })
    }

    /// Service account identity.
    #[must_use]
    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// Sign the assertion presented to the token endpoint.
    fn sign_assertion(&self, now: DateTime<Utc>) -> Result<String, StorageError> {
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: STORAGE_SCOPE,
            aud: &self.key.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_TTL_SECS,
        };
        Ok(encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &self.signing_key,
        )?)
    }

    /// Return a valid bearer token, exchanging a new assertion if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails or the token endpoint rejects the
    /// assertion.
    pub async fn access_token(&self, http: &reqwest::Client) -> Result<String, StorageError> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();

        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(token.value.clone());
        }

        let assertion = self.sign_assertion(now)?;
        let response = http
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", JWT_BEARER_GRANT),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::rejected(status.as_u16(), body));
        }

        let token = CachedToken::from_response(response.json::<TokenResponse>().await?, now);
        tracing::debug!(
            client_email = %self.key.client_email,
            expires_at = %token.expires_at,
            "Obtained storage access token"
        );
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }
}
