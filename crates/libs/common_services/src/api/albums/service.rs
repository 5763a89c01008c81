use crate::api::ApiError;
use crate::api::albums::interfaces::{AlbumListResponse, CreateAlbumRequest};
use crate::auth::{Action, AuthUser, authorize};
use crate::database::album::Album;
use crate::database::{AlbumStore, DocumentStore, ImageStore};
use chrono::{SubsecRound, Utc};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

#[instrument(skip(store, user))]
pub async fn create_album(
    store: &dyn DocumentStore,
    user: &AuthUser,
    request: CreateAlbumRequest,
) -> Result<Album, ApiError> {
    request.validate()?;
    let album = Album {
        id: Uuid::new_v4().to_string(),
        title: request.title,
        description: request.description.unwrap_or_default(),
        created_by: user.uid.clone(),
        created_at: Utc::now().trunc_subsecs(6),
        image_ids: vec![],
    };
    AlbumStore::create(store, &album).await?;
    info!("Created album {}", album.id);
    Ok(album)
}

pub async fn list_albums(store: &dyn DocumentStore) -> Result<AlbumListResponse, ApiError> {
    Ok(AlbumListResponse {
        albums: AlbumStore::list(store).await?,
    })
}

pub async fn get_album(store: &dyn DocumentStore, album_id: &str) -> Result<Album, ApiError> {
    AlbumStore::find_by_id(store, album_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Album {album_id} not found")))
}

/// Adds an existing image to the album. Both sides of the link are written in one batch.
#[instrument(skip(store, user))]
pub async fn add_image_to_album(
    store: &dyn DocumentStore,
    user: &AuthUser,
    album_id: &str,
    image_id: &str,
) -> Result<(), ApiError> {
    let album = get_album(store, album_id).await?;
    authorize(
        Some(user),
        &Action::AddToAlbum {
            creator: &album.created_by,
        },
    )?;
    if !ImageStore::exists(store, image_id).await? {
        return Err(ApiError::NotFound(format!("Image {image_id} not found")));
    }

    AlbumStore::add_image(store, album_id, image_id).await?;
    Ok(())
}
