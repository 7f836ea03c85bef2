use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::config::SheetsConfig;

/// Grant type for the OAuth 2.0 JWT bearer flow.
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for each signed assertion.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Tokens this close to expiry are refreshed before use.
const REFRESH_MARGIN_SECS: i64 = 60;

/// Claims of the self-signed service account assertion
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServiceAccountClaims {
    /// Service account email
    pub iss: String,
    /// Space separated OAuth scopes
    pub scope: String,
    /// Token endpoint
    pub aud: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Error types for Google service account authorization
#[derive(Debug, thiserror::Error)]
pub enum GoogleAuthError {
    #[error("Invalid service account key: {0}")]
    InvalidKey(String),
    #[error("Failed to sign assertion: {0}")]
    EncodingFailed(String),
    #[error("Token request failed: {0}")]
    TokenRequestFailed(String),
    #[error("Token endpoint returned {status}: {body}")]
    TokenRejected { status: u16, body: String },
    #[error("Malformed token response: {0}")]
    InvalidTokenResponse(String),
}

/// OAuth access token with its expiry
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) < self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Authorizes Sheets API calls as a Google service account.
///
/// One instance is shared by every request; `authorize` hands out the cached
/// access token and exchanges a fresh assertion only when it is about to
/// expire.
pub struct GoogleServiceAccountAuth {
    service_account_email: String,
    token_uri: String,
    encoding_key: EncodingKey,
    client: reqwest::Client,
    cached: Mutex<Option<AccessToken>>,
}

impl GoogleServiceAccountAuth {
    pub fn new(config: &SheetsConfig, client: reqwest::Client) -> Result<Self, GoogleAuthError> {
        let encoding_key = EncodingKey::from_rsa_pem(config.private_key.as_bytes()).map_err(|err| {
            error!("Failed to parse service account private key: {}", err);
            GoogleAuthError::InvalidKey(err.to_string())
        })?;

        info!("Google service account auth ready for {}", config.service_account_email);
        Ok(GoogleServiceAccountAuth {
            service_account_email: config.service_account_email.clone(),
            token_uri: config.token_uri.clone(),
            encoding_key,
            client,
            cached: Mutex::new(None),
        })
    }

    /// Signs an RS256 assertion for the spreadsheets scope.
    pub fn build_assertion(&self, now: DateTime<Utc>) -> Result<String, GoogleAuthError> {
        let claims = ServiceAccountClaims {
            iss: self.service_account_email.clone(),
            scope: SheetsConfig::SCOPE.to_string(),
            aud: self.token_uri.clone(),
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };

        encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key).map_err(|err| {
            error!("Failed to encode service account assertion: {}", err);
            GoogleAuthError::EncodingFailed(err.to_string())
        })
    }

    /// Returns a bearer token valid for at least another minute.
    pub async fn authorize(&self) -> Result<String, GoogleAuthError> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();

        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(now)) {
            debug!("Reusing cached Google access token");
            return Ok(token.value.clone());
        }

        let token = self.fetch_token(now).await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    async fn fetch_token(&self, now: DateTime<Utc>) -> Result<AccessToken, GoogleAuthError> {
        debug!("Requesting Google access token from {}", self.token_uri);
        let assertion = self.build_assertion(now)?;

        let response = self
            .client
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|err| {
                error!("Google token request failed: {}", err);
                GoogleAuthError::TokenRequestFailed(err.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Google token endpoint returned {}: {}", status, body);
            return Err(GoogleAuthError::TokenRejected { status: status.as_u16(), body });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|err| GoogleAuthError::InvalidTokenResponse(err.to_string()))?;

        info!("Obtained Google access token valid for {} seconds", token.expires_in);
        Ok(AccessToken {
            value: token.access_token,
            expires_at: now + Duration::seconds(token.expires_in),
        })
    }
}
