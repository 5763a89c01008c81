use crate::database::DbError;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, instrument};

const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
/// Access tokens are refreshed this long before they expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// The parts of a Google service account key file that are needed to mint access tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    pub project_id: Option<String>,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_owned()
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> Result<Self, DbError> {
        serde_json::from_str(json).map_err(|e| DbError::Credentials(e.to_string()))
    }

    pub async fn from_file(path: &Path) -> Result<Self, DbError> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DbError::Credentials(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }
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
    expires_in: u64,
}

pub struct CachedToken {
    value: String,
    refresh_at: Instant,
}

/// Produces bearer tokens for the Firestore REST API.
pub enum AccessTokenSource {
    /// OAuth2 JWT-bearer flow using a service account key.
    ServiceAccount {
        http_client: Client,
        key: ServiceAccountKey,
        cached: Mutex<Option<CachedToken>>,
    },
    /// The emulator accepts this fixed token with full privileges.
    Emulator,
}

impl AccessTokenSource {
    #[must_use]
    pub fn service_account(http_client: Client, key: ServiceAccountKey) -> Self {
        Self::ServiceAccount {
            http_client,
            key,
            cached: Mutex::new(None),
        }
    }

    pub async fn token(&self) -> Result<String, DbError> {
        match self {
            Self::Emulator => Ok("owner".to_owned()),
            Self::ServiceAccount {
                http_client,
                key,
                cached,
            } => {
                let mut cached = cached.lock().await;
                if let Some(token) = cached.as_ref()
                    && Instant::now() < token.refresh_at
                {
                    return Ok(token.value.clone());
                }
                let fresh = fetch_access_token(http_client, key).await?;
                let value = fresh.value.clone();
                *cached = Some(fresh);
                Ok(value)
            }
        }
    }
}

fn sign_assertion(key: &ServiceAccountKey) -> Result<String, DbError> {
    let iat = Utc::now().timestamp();
    let claims = AssertionClaims {
        iss: &key.client_email,
        scope: DATASTORE_SCOPE,
        aud: &key.token_uri,
        iat,
        exp: iat + 3600,
    };
    let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
    Ok(encode(&Header::new(Algorithm::RS256), &claims, &signing_key)?)
}

#[instrument(skip_all, fields(client_email = %key.client_email))]
async fn fetch_access_token(
    http_client: &Client,
    key: &ServiceAccountKey,
) -> Result<CachedToken, DbError> {
    let assertion = sign_assertion(key)?;
    let response = http_client
        .post(&key.token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", &assertion)])
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let message = response.text().await.unwrap_or_default();
        return Err(DbError::Credentials(format!(
            "token exchange returned {status}: {message}"
        )));
    }

    let token: TokenResponse = response.json().await?;
    debug!("Obtained document store access token valid for {}s", token.expires_in);
    let lifetime = Duration::from_secs(token.expires_in).saturating_sub(EXPIRY_MARGIN);
    Ok(CachedToken {
        value: token.access_token,
        refresh_at: Instant::now() + lifetime,
    })
}
