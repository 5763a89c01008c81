use crate::api_state::ApiContext;
use crate::auth::middlewares::optional_user::OptionalUser;
use crate::extract::{ApiJson, ApiQuery};
use crate::upload::read_upload;
use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use common_services::api::ApiError;
use common_services::api::images::interfaces::{
    EditImageRequest, EditImageResponse, ListImagesParams, UploadImageParams,
};
use common_services::api::images::service::{
    DeleteScope, delete_image, edit_image, get_image, list_images, upload_image,
};
use common_services::api::search::interfaces::ImageListResponse;
use common_services::auth::AuthUser;
use common_services::database::image::Image;

/// Upload a photo into the caller's folder.
///
/// The multipart form carries the `file`; title, album and privacy come from the query string.
#[utoipa::path(
    post,
    path = "/photos",
    tag = "Photos",
    params(UploadImageParams),
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "The stored image record.", body = Image),
        (status = 400, description = "No file in the form."),
        (status = 403, description = "Caller is not an editor or admin."),
        (status = 500, description = "Media CDN or document store failure."),
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_photo_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<AuthUser>,
    ApiQuery(params): ApiQuery<UploadImageParams>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Image>, ApiError> {
    let upload = read_upload(multipart?).await?;
    let image = upload_image(
        context.store.as_ref(),
        context.media.as_ref(),
        &context.settings.cloudinary.upload_root,
        &user,
        upload.file,
        params,
    )
    .await?;
    Ok(Json(image))
}

/// List photos visible to the caller, by gallery order.
#[utoipa::path(
    get,
    path = "/photos",
    tag = "Photos",
    params(ListImagesParams),
    responses(
        (status = 200, description = "A page of visible images.", body = ImageListResponse),
        (status = 401, description = "A token was sent but is invalid."),
    )
)]
pub async fn list_photos_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<OptionalUser>,
    ApiQuery(params): ApiQuery<ListImagesParams>,
) -> Result<Json<ImageListResponse>, ApiError> {
    let images = list_images(
        context.store.as_ref(),
        user.0.as_ref(),
        &params,
        context.settings.constants.listing.default_limit,
    )
    .await?;
    Ok(Json(images))
}

#[utoipa::path(
    get,
    path = "/photos/{image_id}",
    tag = "Photos",
    params(("image_id" = String, Path, description = "Image identifier.")),
    responses(
        (status = 200, description = "The image record.", body = Image),
        (status = 403, description = "The image is not public and the caller does not own it."),
        (status = 404, description = "Image not found."),
    )
)]
pub async fn get_photo_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<OptionalUser>,
    Path(image_id): Path<String>,
) -> Result<Json<Image>, ApiError> {
    let image = get_image(context.store.as_ref(), user.0.as_ref(), &image_id).await?;
    Ok(Json(image))
}

/// Update the given fields of a photo. Owner, editor or admin only.
#[utoipa::path(
    post,
    path = "/photos/{image_id}/edit",
    tag = "Photos",
    params(("image_id" = String, Path, description = "Image identifier.")),
    request_body = EditImageRequest,
    responses(
        (status = 200, description = "The fields that were written.", body = EditImageResponse),
        (status = 403, description = "Caller may not modify this image."),
        (status = 404, description = "Image not found."),
    ),
    security(("bearer_auth" = []))
)]
pub async fn edit_photo_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<AuthUser>,
    Path(image_id): Path<String>,
    ApiJson(request): ApiJson<EditImageRequest>,
) -> Result<Json<EditImageResponse>, ApiError> {
    let response = edit_image(context.store.as_ref(), &user, &image_id, &request).await?;
    Ok(Json(response))
}

/// Delete a photo, its CDN asset and its comments. Owner, editor or admin only.
#[utoipa::path(
    delete,
    path = "/photos/{image_id}",
    tag = "Photos",
    params(("image_id" = String, Path, description = "Image identifier.")),
    responses(
        (status = 204, description = "Image deleted."),
        (status = 403, description = "Caller may not delete this image."),
        (status = 404, description = "Image not found."),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_photo_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<AuthUser>,
    Path(image_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    delete_image(
        context.store.as_ref(),
        context.media.as_ref(),
        &user,
        &image_id,
        DeleteScope::OwnerOrPrivileged,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
