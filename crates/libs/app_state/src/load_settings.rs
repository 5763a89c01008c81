use crate::{AppSettings, RawSettings};
use color_eyre::eyre::Result;
use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use std::path::PathBuf;
use tracing::info;

const SETTINGS_FILE: &str = "config/settings";
const LEGACY_CREDENTIALS_VAR: &str = "GOOGLE_APPLICATION_CREDENTIALS";

fn with_defaults(builder: ConfigBuilder<DefaultState>) -> Result<ConfigBuilder<DefaultState>> {
    Ok(builder
        .set_default("app.name", "Sunian Photos API")?
        .set_default("app.debug", true)?
        .set_default("logging.level", "api=info,common_services=info,tower_http=debug")?
        .set_default("api.host", "0.0.0.0")?
        .set_default("api.port", 8000)?
        .set_default("api.allowed_origins", "http://localhost:8000,http://localhost:5173")?
        .set_default("api.max_upload_bytes", 20 * 1024 * 1024)?
        .set_default("cloudinary.upload_root", "sunian-photos")?
        .set_default("store.backend", "firestore")?
        .set_default("constants.search.scan_cap", 500)?
        .set_default("constants.search.default_limit", 50)?
        .set_default("constants.search.max_limit", 100)?
        .set_default("constants.listing.default_limit", 50)?
        .set_default("constants.auth.jwks_cache_seconds", 3600)?)
}

/// Loads `.env`, `config/settings.yaml` and `APP__*` environment overrides, in that order.
pub fn load_app_settings() -> Result<AppSettings> {
    dotenv::from_path(".env").ok();

    let builder = with_defaults(Config::builder())?
        .add_source(File::with_name(SETTINGS_FILE).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        );

    let mut raw_settings = builder.build()?.try_deserialize::<RawSettings>()?;
    if raw_settings.firebase.credentials_path.is_none()
        && let Ok(path) = std::env::var(LEGACY_CREDENTIALS_VAR)
    {
        info!("Using service account from {LEGACY_CREDENTIALS_VAR}");
        raw_settings.firebase.credentials_path = Some(PathBuf::from(path));
    }

    Ok(raw_settings.into())
}

/// Builds settings from a YAML document on top of the defaults, without touching the environment.
pub fn settings_from_yaml(yaml: &str) -> Result<AppSettings> {
    let raw_settings = with_defaults(Config::builder())?
        .add_source(File::from_str(yaml, FileFormat::Yaml))
        .build()?
        .try_deserialize::<RawSettings>()?;
    Ok(raw_settings.into())
}
