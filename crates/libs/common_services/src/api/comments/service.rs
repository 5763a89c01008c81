use crate::api::ApiError;
use crate::api::comments::interfaces::{
    CommentListResponse, CreateCommentRequest, LegacyComment, LegacyCommentRequest,
};
use crate::auth::{Action, AuthUser, authorize};
use crate::database::comment::Comment;
use crate::database::{CommentStore, Direction, DocumentStore, ImageStore};
use chrono::{SubsecRound, Utc};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

async fn ensure_image_exists(store: &dyn DocumentStore, image_id: &str) -> Result<(), ApiError> {
    if ImageStore::exists(store, image_id).await? {
        Ok(())
    } else {
        Err(ApiError::NotFound(format!("Image {image_id} not found")))
    }
}

fn new_comment(
    image_id: &str,
    author_uid: Option<String>,
    user_email: Option<String>,
    content: String,
) -> Comment {
    Comment {
        id: Uuid::new_v4().to_string(),
        image_id: image_id.to_owned(),
        author_uid,
        user_email,
        content,
        created_at: Utc::now().trunc_subsecs(6),
    }
}

#[instrument(skip(store, user, request))]
pub async fn add_comment(
    store: &dyn DocumentStore,
    user: &AuthUser,
    image_id: &str,
    request: CreateCommentRequest,
) -> Result<Comment, ApiError> {
    request.validate()?;
    ensure_image_exists(store, image_id).await?;
    let comment = new_comment(
        image_id,
        Some(user.uid.clone()),
        user.email.clone(),
        request.content,
    );
    CommentStore::create(store, &comment).await?;
    Ok(comment)
}

/// Newest first.
pub async fn list_comments(
    store: &dyn DocumentStore,
    image_id: &str,
) -> Result<CommentListResponse, ApiError> {
    ensure_image_exists(store, image_id).await?;
    Ok(CommentListResponse {
        comments: CommentStore::list(store, image_id, Direction::Descending).await?,
    })
}

#[instrument(skip(store, user))]
pub async fn delete_comment(
    store: &dyn DocumentStore,
    user: &AuthUser,
    image_id: &str,
    comment_id: &str,
) -> Result<(), ApiError> {
    let comment = CommentStore::find_by_id(store, image_id, comment_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Comment {comment_id} not found")))?;
    authorize(
        Some(user),
        &Action::DeleteComment {
            author: comment.author_uid.as_deref(),
        },
    )?;
    CommentStore::delete(store, image_id, comment_id).await?;
    Ok(())
}

/// Legacy add: no authentication, the author is whatever identifiers the body carries.
#[instrument(skip(store, request))]
pub async fn add_legacy_comment(
    store: &dyn DocumentStore,
    image_id: &str,
    request: LegacyCommentRequest,
) -> Result<LegacyComment, ApiError> {
    request.validate()?;
    ensure_image_exists(store, image_id).await?;
    let comment = new_comment(image_id, request.user_id, request.user_email, request.content);
    CommentStore::create(store, &comment).await?;
    Ok(comment.into())
}

/// Oldest first.
pub async fn list_legacy_comments(
    store: &dyn DocumentStore,
    image_id: &str,
) -> Result<Vec<LegacyComment>, ApiError> {
    let comments = CommentStore::list(store, image_id, Direction::Ascending).await?;
    Ok(comments.into_iter().map(Into::into).collect())
}
