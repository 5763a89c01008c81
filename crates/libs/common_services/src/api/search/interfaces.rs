use crate::database::image::Image;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Conjunctive image filter. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
pub struct SearchRequest {
    /// Case-insensitive keyword matched against title, caption, filename or tags.
    pub q: Option<String>,
    pub album_id: Option<String>,
    /// Exact license, e.g. `CC-BY`.
    pub license: Option<String>,
    /// First upload date to include (`YYYY-MM-DD`).
    pub from_date: Option<NaiveDate>,
    /// Last upload date to include (`YYYY-MM-DD`).
    pub to_date: Option<NaiveDate>,
    /// Case-insensitive substring of the EXIF camera model.
    pub camera: Option<String>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImageListResponse {
    pub count: usize,
    pub images: Vec<Image>,
}

impl From<Vec<Image>> for ImageListResponse {
    fn from(images: Vec<Image>) -> Self {
        Self {
            count: images.len(),
            images,
        }
    }
}
