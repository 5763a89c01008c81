use crate::database::comment::Comment;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommentListResponse {
    pub comments: Vec<Comment>,
}

/// Body of the legacy comment route. Both identifiers are optional.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct LegacyCommentRequest {
    pub user_email: Option<String>,
    pub user_id: Option<String>,
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: String,
}

/// Comment shape of the legacy routes.
#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
pub struct LegacyComment {
    pub user_email: Option<String>,
    pub user_id: Option<String>,
    pub content: String,
    pub created_at: String,
}

impl From<Comment> for LegacyComment {
    fn from(comment: Comment) -> Self {
        Self {
            user_email: comment.user_email,
            user_id: comment.author_uid,
            content: comment.content,
            created_at: crate::database::format_timestamp(&comment.created_at),
        }
    }
}
