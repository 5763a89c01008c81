use crate::runner::context::fakes::{RecordingMedia, StaticTokenVerifier};
use crate::test_constants::{
    ADMIN_TOKEN, ADMIN_UID, EDITOR_EMAIL, EDITOR_TOKEN, EDITOR_UID, OTHER_EDITOR_TOKEN,
    OTHER_EDITOR_UID, TEST_SETTINGS, VISITOR_EMAIL, VISITOR_TOKEN, VISITOR_UID,
};
use api::api_state::ApiContext;
use api::build_app;
use app_state::{AppSettings, settings_from_yaml};
use color_eyre::eyre::{Result, eyre};
use common_services::database::app_user::UserRole;
use common_services::database::{MemoryDocumentStore, UserStore};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// The API served on an ephemeral port, backed by in-memory fakes.
pub struct TestContext {
    pub settings: AppSettings,
    pub http_client: Client,
    pub base_url: String,
    pub store: Arc<MemoryDocumentStore>,
    pub media: Arc<RecordingMedia>,
    api_handle: JoinHandle<()>,
}

impl TestContext {
    pub async fn new() -> Result<Self> {
        info!("Setting up test environment...");
        let settings = settings_from_yaml(TEST_SETTINGS)?;

        let store = Arc::new(MemoryDocumentStore::new());
        Self::seed_roles(&store).await?;
        let media = Arc::new(RecordingMedia::default());
        let verifier = Arc::new(StaticTokenVerifier::new(&[
            (ADMIN_TOKEN, ADMIN_UID, None),
            (EDITOR_TOKEN, EDITOR_UID, Some(EDITOR_EMAIL)),
            (OTHER_EDITOR_TOKEN, OTHER_EDITOR_UID, None),
            (VISITOR_TOKEN, VISITOR_UID, Some(VISITOR_EMAIL)),
        ]));

        let api_state = ApiContext {
            store: store.clone(),
            media: media.clone(),
            verifier,
            settings: settings.clone(),
        };
        let listener =
            TcpListener::bind(format!("{}:{}", settings.api.host, settings.api.port)).await?;
        let base_url = format!("http://{}", listener.local_addr()?);
        let app = build_app(api_state);
        let api_handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!("API server failed: {}", e);
            }
        });

        let http_client = Client::new();
        Self::wait_for_healthy_api(&base_url, &http_client).await?;

        info!("Test environment is ready at {base_url}.");
        Ok(Self {
            settings,
            http_client,
            base_url,
            store,
            media,
            api_handle,
        })
    }

    async fn seed_roles(store: &MemoryDocumentStore) -> Result<()> {
        UserStore::set_role(store, ADMIN_UID, UserRole::Admin).await?;
        UserStore::set_role(store, EDITOR_UID, UserRole::Editor).await?;
        UserStore::set_role(store, OTHER_EDITOR_UID, UserRole::Editor).await?;
        Ok(())
    }

    /// Polls `/health` until the server answers or the attempts run out.
    async fn wait_for_healthy_api(base_url: &str, http_client: &Client) -> Result<()> {
        for attempt in 1..=20 {
            info!("Health check attempt {}...", attempt);
            match http_client.get(format!("{base_url}/health")).send().await {
                Ok(response) if response.status().is_success() => {
                    info!("API is healthy!");
                    return Ok(());
                }
                Ok(response) => {
                    warn!(
                        "API health check returned non-success status: {}",
                        response.status()
                    );
                }
                Err(e) => {
                    warn!("API health check failed: {:?}. Retrying...", e);
                }
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        Err(eyre!("API did not become healthy within the timeout period."))
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.api_handle.abort();
        info!("Teardown complete.");
    }
}
