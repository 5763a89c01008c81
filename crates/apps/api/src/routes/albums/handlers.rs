use crate::api_state::ApiContext;
use crate::extract::{ApiJson, ApiQuery};
use axum::extract::{Path, State};
use axum::{Extension, Json};
use common_services::api::ApiError;
use common_services::api::albums::interfaces::{
    AddImageParams, AlbumListResponse, CreateAlbumRequest, OkResponse,
};
use common_services::api::albums::service::{
    add_image_to_album, create_album, get_album, list_albums,
};
use common_services::auth::AuthUser;
use common_services::database::album::Album;

#[utoipa::path(
    post,
    path = "/albums",
    tag = "Albums",
    request_body = CreateAlbumRequest,
    responses(
        (status = 200, description = "The created album.", body = Album),
        (status = 400, description = "Empty title."),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_album_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<AuthUser>,
    ApiJson(request): ApiJson<CreateAlbumRequest>,
) -> Result<Json<Album>, ApiError> {
    let album = create_album(context.store.as_ref(), &user, request).await?;
    Ok(Json(album))
}

/// All albums, oldest first.
#[utoipa::path(
    get,
    path = "/albums",
    tag = "Albums",
    responses(
        (status = 200, description = "Every album.", body = AlbumListResponse),
    )
)]
pub async fn list_albums_handler(
    State(context): State<ApiContext>,
) -> Result<Json<AlbumListResponse>, ApiError> {
    let albums = list_albums(context.store.as_ref()).await?;
    Ok(Json(albums))
}

#[utoipa::path(
    get,
    path = "/albums/{album_id}",
    tag = "Albums",
    params(("album_id" = String, Path, description = "Album identifier.")),
    responses(
        (status = 200, description = "The album.", body = Album),
        (status = 404, description = "Album not found."),
    )
)]
pub async fn get_album_handler(
    State(context): State<ApiContext>,
    Path(album_id): Path<String>,
) -> Result<Json<Album>, ApiError> {
    let album = get_album(context.store.as_ref(), &album_id).await?;
    Ok(Json(album))
}

/// Add an image to an album. The album's creator, editors and admins may do this.
#[utoipa::path(
    post,
    path = "/albums/{album_id}/add",
    tag = "Albums",
    params(
        ("album_id" = String, Path, description = "Album identifier."),
        AddImageParams
    ),
    responses(
        (status = 200, description = "Image added.", body = OkResponse),
        (status = 403, description = "Caller may not change this album."),
        (status = 404, description = "Album or image not found."),
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_image_to_album_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<AuthUser>,
    Path(album_id): Path<String>,
    ApiQuery(params): ApiQuery<AddImageParams>,
) -> Result<Json<OkResponse>, ApiError> {
    add_image_to_album(context.store.as_ref(), &user, &album_id, &params.public_id).await?;
    Ok(Json(OkResponse { ok: true }))
}
