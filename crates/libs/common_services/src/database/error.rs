use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Document store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Document store returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Document store credentials: {0}")]
    Credentials(String),

    #[error("JSON serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Malformed document {path}: {message}")]
    Malformed { path: String, message: String },
}

impl From<jsonwebtoken::errors::Error> for DbError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::Credentials(err.to_string())
    }
}
