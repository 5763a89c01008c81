use app_state::{AppSettings, StoreBackend};
use axum::extract::FromRef;
use color_eyre::Result;
use common_services::auth::{FirebaseTokenVerifier, TokenVerifier};
use common_services::database::firestore::FirestoreClient;
use common_services::database::{DocumentStore, MemoryDocumentStore};
use common_services::media::{CloudinaryClient, MediaStore};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Process-wide service handles, built once at startup and shared by every request.
#[derive(Clone)]
pub struct ApiContext {
    pub store: Arc<dyn DocumentStore>,
    pub media: Arc<dyn MediaStore>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub settings: AppSettings,
}

impl ApiContext {
    pub async fn from_settings(settings: AppSettings) -> Result<Self> {
        let http_client = Client::new();

        let store: Arc<dyn DocumentStore> = match settings.store.backend {
            StoreBackend::Firestore => Arc::new(
                FirestoreClient::from_settings(http_client.clone(), &settings.firebase).await?,
            ),
            StoreBackend::Memory => {
                warn!("Using the in-memory document store, data is lost on exit.");
                Arc::new(MemoryDocumentStore::new())
            }
        };
        info!("Media CDN cloud: {}", settings.cloudinary.cloud_name);
        let media = Arc::new(CloudinaryClient::new(
            http_client.clone(),
            &settings.cloudinary,
        ));
        let verifier = Arc::new(FirebaseTokenVerifier::new(
            http_client,
            &settings.firebase,
            Duration::from_secs(settings.constants.auth.jwks_cache_seconds),
        ));

        Ok(Self {
            store,
            media,
            verifier,
            settings,
        })
    }
}

impl FromRef<ApiContext> for AppSettings {
    fn from_ref(state: &ApiContext) -> Self {
        state.settings.clone()
    }
}
