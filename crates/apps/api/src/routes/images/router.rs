use crate::api_state::ApiContext;
use crate::images::handlers::{
    add_legacy_comment_handler, delete_legacy_image_handler, list_legacy_comments_handler,
    list_legacy_images_handler, reorder_images_handler, toggle_like_handler,
    upload_legacy_compat_handler, upload_legacy_handler,
};
use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    routing::{delete, get, post, put},
};

pub fn legacy_public_router() -> Router<ApiContext> {
    Router::new()
        .route("/api/images/{image_id}/like", post(toggle_like_handler))
        .route(
            "/api/images/{image_id}/comments",
            post(add_legacy_comment_handler).get(list_legacy_comments_handler),
        )
}

pub fn legacy_auth_optional_router() -> Router<ApiContext> {
    Router::new().route("/api/images", get(list_legacy_images_handler))
}

pub fn legacy_protected_router(max_upload_bytes: usize) -> Router<ApiContext> {
    Router::new()
        .route("/api/upload", post(upload_legacy_handler))
        .route("/api/images/photos", post(upload_legacy_compat_handler))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .route("/api/images/reorder", put(reorder_images_handler))
        .route("/api/images/{image_id}", delete(delete_legacy_image_handler))
}
