use crate::database::image::{Image, Privacy};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};

/// A file received in a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub bytes: Bytes,
    pub filename: String,
    pub content_type: Option<String>,
}

/// Response of the legacy upload routes.
#[derive(Debug, Serialize, ToSchema)]
pub struct ImageCreateResponse {
    pub id: String,
    pub filename: String,
    /// Canonical CDN url.
    pub storage_path: String,
    pub mime_type: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub size_bytes: Option<u64>,
    pub title: Option<String>,
    pub caption: Option<String>,
    pub alt_text: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UploadImageParams {
    pub title: Option<String>,
    pub album_id: Option<String>,
    /// `public` (default) or `private`.
    pub privacy: Option<Privacy>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListImagesParams {
    /// Keyword matched against title, caption, filename and tags.
    pub q: Option<String>,
    pub album_id: Option<String>,
    #[serde(default)]
    pub skip: usize,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LegacyImageListResponse {
    pub images: Vec<Image>,
}

/// Editable image fields. Absent fields are left untouched.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct EditImageRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy: Option<Privacy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EditImageResponse {
    pub ok: bool,
    /// The fields that were written.
    #[schema(value_type = Object)]
    pub updated: Map<String, Value>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReorderResponse {
    pub status: String,
    pub order: Vec<String>,
}
