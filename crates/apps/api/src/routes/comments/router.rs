use crate::api_state::ApiContext;
use crate::comments::handlers::{add_comment_handler, delete_comment_handler, list_comments_handler};
use axum::{
    Router,
    routing::{delete, get, post},
};

pub fn comments_public_router() -> Router<ApiContext> {
    Router::new().route("/comments/{image_id}", get(list_comments_handler))
}

pub fn comments_protected_router() -> Router<ApiContext> {
    Router::new()
        .route("/comments/{image_id}", post(add_comment_handler))
        .route(
            "/comments/{image_id}/{comment_id}",
            delete(delete_comment_handler),
        )
}
