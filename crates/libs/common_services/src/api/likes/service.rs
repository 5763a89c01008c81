use crate::api::ApiError;
use crate::api::likes::interfaces::{LikeRequest, LikeToggleResponse};
use crate::database::{DocumentStore, ImageStore};
use tracing::{debug, instrument};

/// Adds the identifier to the image's likes, or removes it if already present.
///
/// The membership check is a plain read; the add/remove itself is an atomic set operation.
/// Under concurrent toggles by the same identifier the returned `liked` may be stale, the
/// stored set never is. The count is read after the write.
#[instrument(skip(store, request))]
pub async fn toggle_like(
    store: &dyn DocumentStore,
    image_id: &str,
    request: &LikeRequest,
) -> Result<LikeToggleResponse, ApiError> {
    let identifier = request
        .identifier()
        .ok_or_else(|| ApiError::BadRequest("Missing user_email or user_id in body".to_owned()))?;
    let not_found = || ApiError::NotFound(format!("Image {image_id} not found"));

    let image = ImageStore::find_by_id(store, image_id)
        .await?
        .ok_or_else(not_found)?;
    let liked = if image.likes.iter().any(|like| like == identifier) {
        ImageStore::remove_like(store, image_id, identifier).await?;
        false
    } else {
        ImageStore::add_like(store, image_id, identifier).await?;
        true
    };

    let total_likes = ImageStore::find_by_id(store, image_id)
        .await?
        .ok_or_else(not_found)?
        .likes
        .len();
    debug!("{identifier} liked={liked}, total {total_likes}");

    Ok(LikeToggleResponse { liked, total_likes })
}
