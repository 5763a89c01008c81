use crate::{
    AppConstants, AppInfoSettings, CloudinarySettings, FirebaseSettings, LoggingSettings,
    RawSettings, StoreSettings,
};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub app: AppInfoSettings,
    pub logging: LoggingSettings,
    pub api: ApiSettings,
    pub firebase: FirebaseSettings,
    pub cloudinary: CloudinarySettings,
    pub store: StoreSettings,
    pub constants: AppConstants,
}

/// Configuration for the API server.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub host: String,
    pub port: u32,
    /// Empty means any origin is allowed.
    pub allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
}

impl From<RawSettings> for AppSettings {
    fn from(raw: RawSettings) -> Self {
        let api = ApiSettings {
            host: raw.api.host,
            port: raw.api.port,
            allowed_origins: split_origins(&raw.api.allowed_origins),
            max_upload_bytes: raw.api.max_upload_bytes,
        };

        Self {
            app: raw.app,
            logging: raw.logging,
            api,
            firebase: raw.firebase,
            cloudinary: raw.cloudinary,
            store: raw.store,
            constants: raw.constants,
        }
    }
}

/// Splits a comma separated origin list, trimming entries and dropping empty ones.
#[must_use]
pub fn split_origins(origins: &str) -> Vec<String> {
    origins
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

impl AppSettings {
    /// Default `EnvFilter` directive for when `RUST_LOG` is unset.
    /// Debug mode raises the service crates to `debug`.
    #[must_use]
    pub fn log_directive(&self) -> String {
        if self.app.debug {
            format!("{},api=debug,common_services=debug", self.logging.level)
        } else {
            self.logging.level.clone()
        }
    }
}

impl FirebaseSettings {
    /// The issuer every identity token for this project must carry.
    #[must_use]
    pub fn token_issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.project_id)
    }
}
