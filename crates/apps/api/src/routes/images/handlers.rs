//! Routes kept compatible with the first version of the API, under `/api`.

use crate::api_state::ApiContext;
use crate::auth::middlewares::optional_user::OptionalUser;
use crate::extract::ApiJson;
use crate::upload::read_upload;
use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use common_services::api::ApiError;
use common_services::api::comments::interfaces::{LegacyComment, LegacyCommentRequest};
use common_services::api::comments::service::{add_legacy_comment, list_legacy_comments};
use common_services::api::images::interfaces::{
    ImageCreateResponse, LegacyImageListResponse, ReorderResponse,
};
use common_services::api::images::service::{
    DeleteScope, delete_image, list_legacy_images, reorder_images, upload_legacy_image,
};
use common_services::api::likes::interfaces::{LikeRequest, LikeToggleResponse};
use common_services::api::likes::service::toggle_like;
use common_services::auth::AuthUser;

/// Upload an image into an album folder.
///
/// Multipart form with a `file` and an optional `album` field. Requires the editor or admin role.
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "Legacy",
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored.", body = ImageCreateResponse),
        (status = 400, description = "No file in the form."),
        (status = 403, description = "Caller is not an editor or admin."),
        (status = 500, description = "Media CDN or document store failure."),
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_legacy_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<AuthUser>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ImageCreateResponse>, ApiError> {
    let mut upload = read_upload(multipart?).await?;
    let album = upload.fields.remove("album");
    let created = upload_legacy_image(
        context.store.as_ref(),
        context.media.as_ref(),
        &user,
        upload.file,
        album,
    )
    .await?;
    Ok(Json(created))
}

/// Same as `/api/upload`, kept for older clients.
#[utoipa::path(
    post,
    path = "/api/images/photos",
    tag = "Legacy",
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored.", body = ImageCreateResponse),
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_legacy_compat_handler(
    state: State<ApiContext>,
    user: Extension<AuthUser>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ImageCreateResponse>, ApiError> {
    upload_legacy_handler(state, user, multipart).await
}

/// List visible images by gallery order.
#[utoipa::path(
    get,
    path = "/api/images",
    tag = "Legacy",
    responses(
        (status = 200, description = "Images ordered by their ordering index.", body = LegacyImageListResponse),
    )
)]
pub async fn list_legacy_images_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<OptionalUser>,
) -> Result<Json<LegacyImageListResponse>, ApiError> {
    let images = list_legacy_images(context.store.as_ref(), user.0.as_ref()).await?;
    Ok(Json(images))
}

/// Delete any image. Requires the editor or admin role.
#[utoipa::path(
    delete,
    path = "/api/images/{image_id}",
    tag = "Legacy",
    params(("image_id" = String, Path, description = "Image identifier.")),
    responses(
        (status = 204, description = "Image deleted."),
        (status = 403, description = "Caller is not an editor or admin."),
        (status = 404, description = "Image not found."),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_legacy_image_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<AuthUser>,
    Path(image_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    delete_image(
        context.store.as_ref(),
        context.media.as_ref(),
        &user,
        &image_id,
        DeleteScope::Privileged,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Give every listed image its position in the list as ordering index, atomically.
#[utoipa::path(
    put,
    path = "/api/images/reorder",
    tag = "Legacy",
    request_body = Vec<String>,
    responses(
        (status = 200, description = "New order applied.", body = ReorderResponse),
        (status = 403, description = "Caller is not an editor or admin."),
        (status = 404, description = "An image in the list does not exist, nothing was changed."),
    ),
    security(("bearer_auth" = []))
)]
pub async fn reorder_images_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<AuthUser>,
    ApiJson(order): ApiJson<Vec<String>>,
) -> Result<Json<ReorderResponse>, ApiError> {
    let response = reorder_images(context.store.as_ref(), &user, order).await?;
    Ok(Json(response))
}

/// Toggle a like by email (preferred) or user id.
#[utoipa::path(
    post,
    path = "/api/images/{image_id}/like",
    tag = "Legacy",
    params(("image_id" = String, Path, description = "Image identifier.")),
    request_body = LikeRequest,
    responses(
        (status = 200, description = "Membership after the toggle.", body = LikeToggleResponse),
        (status = 400, description = "Neither user_email nor user_id given."),
        (status = 404, description = "Image not found."),
    )
)]
pub async fn toggle_like_handler(
    State(context): State<ApiContext>,
    Path(image_id): Path<String>,
    ApiJson(request): ApiJson<LikeRequest>,
) -> Result<Json<LikeToggleResponse>, ApiError> {
    let response = toggle_like(context.store.as_ref(), &image_id, &request).await?;
    Ok(Json(response))
}

/// Add a comment without signing in.
#[utoipa::path(
    post,
    path = "/api/images/{image_id}/comments",
    tag = "Legacy",
    params(("image_id" = String, Path, description = "Image identifier.")),
    request_body = LegacyCommentRequest,
    responses(
        (status = 200, description = "Stored comment.", body = LegacyComment),
        (status = 404, description = "Image not found."),
    )
)]
pub async fn add_legacy_comment_handler(
    State(context): State<ApiContext>,
    Path(image_id): Path<String>,
    ApiJson(request): ApiJson<LegacyCommentRequest>,
) -> Result<Json<LegacyComment>, ApiError> {
    let comment = add_legacy_comment(context.store.as_ref(), &image_id, request).await?;
    Ok(Json(comment))
}

/// Comments on an image, oldest first.
#[utoipa::path(
    get,
    path = "/api/images/{image_id}/comments",
    tag = "Legacy",
    params(("image_id" = String, Path, description = "Image identifier.")),
    responses(
        (status = 200, description = "Comments, oldest first.", body = Vec<LegacyComment>),
    )
)]
pub async fn list_legacy_comments_handler(
    State(context): State<ApiContext>,
    Path(image_id): Path<String>,
) -> Result<Json<Vec<LegacyComment>>, ApiError> {
    let comments = list_legacy_comments(context.store.as_ref(), &image_id).await?;
    Ok(Json(comments))
}
