use crate::api_state::ApiContext;
use crate::extract::ApiJson;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use common_services::api::ApiError;
use common_services::api::albums::interfaces::OkResponse;
use common_services::api::comments::interfaces::{CommentListResponse, CreateCommentRequest};
use common_services::api::comments::service::{add_comment, delete_comment, list_comments};
use common_services::auth::AuthUser;
use common_services::database::comment::Comment;

#[utoipa::path(
    post,
    path = "/comments/{image_id}",
    tag = "Comments",
    params(("image_id" = String, Path, description = "Image identifier.")),
    request_body = CreateCommentRequest,
    responses(
        (status = 200, description = "The stored comment.", body = Comment),
        (status = 400, description = "Empty content."),
        (status = 404, description = "Image not found."),
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_comment_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<AuthUser>,
    Path(image_id): Path<String>,
    ApiJson(request): ApiJson<CreateCommentRequest>,
) -> Result<Json<Comment>, ApiError> {
    let comment = add_comment(context.store.as_ref(), &user, &image_id, request).await?;
    Ok(Json(comment))
}

/// Comments on an image, newest first.
#[utoipa::path(
    get,
    path = "/comments/{image_id}",
    tag = "Comments",
    params(("image_id" = String, Path, description = "Image identifier.")),
    responses(
        (status = 200, description = "Comments, newest first.", body = CommentListResponse),
        (status = 404, description = "Image not found."),
    )
)]
pub async fn list_comments_handler(
    State(context): State<ApiContext>,
    Path(image_id): Path<String>,
) -> Result<Json<CommentListResponse>, ApiError> {
    let comments = list_comments(context.store.as_ref(), &image_id).await?;
    Ok(Json(comments))
}

/// Delete a comment. The author, editors and admins may do this.
#[utoipa::path(
    delete,
    path = "/comments/{image_id}/{comment_id}",
    tag = "Comments",
    params(
        ("image_id" = String, Path, description = "Image identifier."),
        ("comment_id" = String, Path, description = "Comment identifier.")
    ),
    responses(
        (status = 200, description = "Comment deleted.", body = OkResponse),
        (status = 403, description = "Caller may not delete this comment."),
        (status = 404, description = "Comment not found."),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_comment_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<AuthUser>,
    Path((image_id, comment_id)): Path<(String, String)>,
) -> Result<Json<OkResponse>, ApiError> {
    delete_comment(context.store.as_ref(), &user, &image_id, &comment_id).await?;
    Ok(Json(OkResponse { ok: true }))
}
