use crate::api::ApiError;
use crate::api::search::interfaces::{ImageListResponse, SearchRequest};
use crate::database::image::Image;
use crate::database::{DocumentStore, ImageStore};
use app_state::SearchConstants;
use tracing::{debug, instrument};
use validator::Validate;

/// Case-insensitive keyword match against title, caption and filename, falling back to tags.
/// `keyword` must already be lowercase.
#[must_use]
pub fn matches_keyword(image: &Image, keyword: &str) -> bool {
    let in_text = [&image.title, &image.caption, &image.filename]
        .into_iter()
        .flatten()
        .any(|text| text.to_lowercase().contains(keyword));
    in_text || image.tags.iter().any(|tag| tag.to_lowercase().contains(keyword))
}

/// Compiled form of a [`SearchRequest`].
struct SearchFilter {
    keyword: Option<String>,
    album_id: Option<String>,
    license: Option<String>,
    from_date: Option<chrono::NaiveDate>,
    to_date: Option<chrono::NaiveDate>,
    camera: Option<String>,
}

impl SearchFilter {
    fn new(request: &SearchRequest) -> Self {
        let lower = |s: &Option<String>| {
            s.as_deref()
                .filter(|s| !s.is_empty())
                .map(str::to_lowercase)
        };
        let non_empty = |s: &Option<String>| s.clone().filter(|s| !s.is_empty());
        Self {
            keyword: lower(&request.q),
            album_id: non_empty(&request.album_id),
            license: non_empty(&request.license),
            from_date: request.from_date,
            to_date: request.to_date,
            camera: lower(&request.camera),
        }
    }

    fn matches(&self, image: &Image) -> bool {
        let uploaded_on = image.uploaded_at.date_naive();
        self.keyword
            .as_ref()
            .is_none_or(|keyword| matches_keyword(image, keyword))
            && self
                .album_id
                .as_ref()
                .is_none_or(|album_id| image.album_id.as_ref() == Some(album_id))
            && self
                .license
                .as_ref()
                .is_none_or(|license| image.license.as_ref() == Some(license))
            && self.from_date.is_none_or(|from| uploaded_on >= from)
            && self.to_date.is_none_or(|to| uploaded_on <= to)
            && self.camera.as_ref().is_none_or(|camera| {
                image
                    .camera_model()
                    .unwrap_or_default()
                    .to_lowercase()
                    .contains(camera.as_str())
            })
    }
}

/// Scans up to `scan_cap` images and keeps those matching every given filter,
/// stopping once the limit is reached.
#[instrument(skip(store, constants))]
pub async fn search_images(
    store: &dyn DocumentStore,
    constants: &SearchConstants,
    request: &SearchRequest,
) -> Result<ImageListResponse, ApiError> {
    request.validate()?;
    let limit = request
        .limit
        .unwrap_or(constants.default_limit)
        .min(constants.max_limit);
    let filter = SearchFilter::new(request);

    let scanned = ImageStore::scan(store, constants.scan_cap).await?;
    debug!("Scanned {} images", scanned.len());
    let images: Vec<Image> = scanned
        .into_iter()
        .filter(|image| filter.matches(image))
        .take(limit)
        .collect();

    Ok(images.into())
}
