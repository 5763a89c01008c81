use crate::auth::AuthError;
use app_state::FirebaseSettings;
use async_trait::async_trait;
use color_eyre::eyre::eyre;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use moka::future::Cache;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

pub const GOOGLE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// At most one refetch per interval is forced by tokens with an unknown key id.
const FORCED_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Identity extracted from a valid bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub uid: String,
    pub email: Option<String>,
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Fails with `AuthError::InvalidToken` for anything that isn't a currently valid token.
    async fn verify(&self, token: &str) -> Result<VerifiedToken, AuthError>;
}

#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    sub: String,
    email: Option<String>,
}

/// Verifies Firebase ID tokens locally against Google's published signing keys.
pub struct FirebaseTokenVerifier {
    http_client: reqwest::Client,
    jwks_url: String,
    validation: Validation,
    keys: Cache<(), Arc<JwkSet>>,
    recently_refreshed: Cache<(), ()>,
}

impl FirebaseTokenVerifier {
    #[must_use]
    pub fn new(
        http_client: reqwest::Client,
        settings: &FirebaseSettings,
        key_cache_ttl: Duration,
    ) -> Self {
        Self {
            http_client,
            jwks_url: GOOGLE_JWKS_URL.to_owned(),
            validation: firebase_validation(&settings.project_id, &settings.token_issuer()),
            keys: Cache::builder()
                .max_capacity(1)
                .time_to_live(key_cache_ttl)
                .build(),
            recently_refreshed: Cache::builder()
                .max_capacity(1)
                .time_to_live(FORCED_REFRESH_INTERVAL)
                .build(),
        }
    }

    #[must_use]
    pub fn with_jwks_url(mut self, jwks_url: impl Into<String>) -> Self {
        self.jwks_url = jwks_url.into();
        self
    }

    async fn fetch_keys(&self) -> Result<Arc<JwkSet>, AuthError> {
        debug!("Fetching token signing keys from {}", self.jwks_url);
        let keys = self
            .http_client
            .get(&self.jwks_url)
            .send()
            .await?
            .error_for_status()?
            .json::<JwkSet>()
            .await?;
        Ok(Arc::new(keys))
    }

    async fn keys(&self) -> Result<Arc<JwkSet>, AuthError> {
        self.keys
            .try_get_with((), self.fetch_keys())
            .await
            .map_err(|e| AuthError::Internal(eyre!("Could not load signing keys: {e:?}")))
    }

    /// Refetches the key set unless that already happened within the refresh interval.
    /// The cached set stays in place if the fetch fails.
    async fn refresh_keys(&self) -> Result<Option<Arc<JwkSet>>, AuthError> {
        let marker = self.recently_refreshed.entry(()).or_insert(()).await;
        if !marker.is_fresh() {
            debug!("Signing keys were refreshed recently, not refetching");
            return Ok(None);
        }
        let keys = self.fetch_keys().await?;
        self.keys.insert((), keys.clone()).await;
        Ok(Some(keys))
    }
}

fn firebase_validation(project_id: &str, issuer: &str) -> Validation {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[project_id]);
    validation.set_issuer(&[issuer]);
    validation.set_required_spec_claims(&["exp", "sub", "aud", "iss"]);
    validation
}

/// Checks the token against a key set. `Ok(None)` means the token's key id is not in the set.
fn verify_with_keys(
    token: &str,
    keys: &JwkSet,
    validation: &Validation,
) -> Result<Option<VerifiedToken>, AuthError> {
    let header = decode_header(token).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
    let kid = header
        .kid
        .ok_or_else(|| AuthError::InvalidToken("token has no key id".to_owned()))?;
    let Some(jwk) = keys.find(&kid) else {
        return Ok(None);
    };

    let key = DecodingKey::from_jwk(jwk).map_err(|e| AuthError::Internal(e.into()))?;
    let claims = decode::<FirebaseClaims>(token, &key, validation)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?
        .claims;
    if claims.sub.is_empty() {
        return Err(AuthError::InvalidToken("empty subject".to_owned()));
    }

    Ok(Some(VerifiedToken {
        uid: claims.sub,
        email: claims.email,
    }))
}

#[async_trait]
impl TokenVerifier for FirebaseTokenVerifier {
    #[instrument(skip_all)]
    async fn verify(&self, token: &str) -> Result<VerifiedToken, AuthError> {
        let keys = self.keys().await?;
        if let Some(verified) = verify_with_keys(token, &keys, &self.validation)? {
            return Ok(verified);
        }

        let unknown_key = || AuthError::InvalidToken("unknown signing key".to_owned());
        // Unknown key id, the keys may have rotated since they were cached.
        let Some(keys) = self.refresh_keys().await? else {
            return Err(unknown_key());
        };
        verify_with_keys(token, &keys, &self.validation)?.ok_or_else(unknown_key)
    }
}
