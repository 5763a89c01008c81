use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Media CDN request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Media CDN returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Unexpected media CDN response: {0}")]
    InvalidResponse(String),
}
