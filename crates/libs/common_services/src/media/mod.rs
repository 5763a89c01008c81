mod cloudinary;
mod error;
mod metadata;

pub use cloudinary::*;
pub use error::*;
pub use metadata::*;

use async_trait::async_trait;
use bytes::Bytes;

/// How the CDN should name an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadNaming {
    /// Let the CDN pick the identifier and replace any existing asset under it.
    Overwrite,
    /// Derive the name from the filename with a random suffix.
    Unique,
}

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub bytes: Bytes,
    pub filename: String,
    pub folder: String,
    pub naming: UploadNaming,
}

/// What the CDN reports back after storing an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMedia {
    pub public_id: String,
    pub secure_url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub bytes: Option<u64>,
    pub format: Option<String>,
    pub resource_type: Option<String>,
}

/// Binary storage for images.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(&self, request: UploadRequest) -> Result<UploadedMedia, MediaError>;

    async fn destroy(&self, public_id: &str) -> Result<(), MediaError>;
}
