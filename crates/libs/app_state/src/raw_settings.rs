use serde::Deserialize;
use std::path::PathBuf;

/// Settings exactly as they appear in `config/settings.yaml` and the `APP__*` environment.
#[derive(Debug, Deserialize, Clone)]
pub struct RawSettings {
    pub app: AppInfoSettings,
    pub logging: LoggingSettings,
    pub api: RawApiSettings,
    pub firebase: FirebaseSettings,
    pub cloudinary: CloudinarySettings,
    pub store: StoreSettings,
    pub constants: AppConstants,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppInfoSettings {
    pub name: String,
    pub debug: bool,
}

/// Logging configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    /// Default `EnvFilter` directive, used when `RUST_LOG` is not set.
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawApiSettings {
    pub host: String,
    pub port: u32,
    /// Comma separated list of origins, e.g. `http://localhost:5173,https://photos.example.com`.
    pub allowed_origins: String,
    /// Body limit for upload routes.
    pub max_upload_bytes: usize,
}

/// Identity provider and document database project.
#[derive(Debug, Deserialize, Clone)]
pub struct FirebaseSettings {
    pub project_id: String,
    /// Path to a service account JSON file.
    pub credentials_path: Option<PathBuf>,
    /// Inline service account JSON. Takes precedence over `credentials_path`.
    pub credentials_json: Option<String>,
    /// `host:port` of a local Firestore emulator.
    pub emulator_host: Option<String>,
}

/// Media CDN account.
#[derive(Debug, Deserialize, Clone)]
pub struct CloudinarySettings {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Folder prefix for per-user uploads.
    pub upload_root: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreSettings {
    pub backend: StoreBackend,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Firestore,
    /// Process-local store, contents are lost on exit.
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConstants {
    pub search: SearchConstants,
    pub listing: ListingConstants,
    pub auth: AuthConstants,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConstants {
    /// How many image documents a search reads before filtering.
    pub scan_cap: usize,
    pub default_limit: usize,
    pub max_limit: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ListingConstants {
    pub default_limit: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConstants {
    /// How long the identity provider's signing keys are cached.
    pub jwks_cache_seconds: u64,
}
