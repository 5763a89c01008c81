use crate::api_state::ApiContext;
use crate::photos::handlers::{
    delete_photo_handler, edit_photo_handler, get_photo_handler, list_photos_handler,
    upload_photo_handler,
};
use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    routing::{delete, get, post},
};

pub fn photos_auth_optional_router() -> Router<ApiContext> {
    Router::new()
        .route("/photos", get(list_photos_handler))
        .route("/photos/", get(list_photos_handler))
        .route("/photos/{image_id}", get(get_photo_handler))
}

pub fn photos_protected_router(max_upload_bytes: usize) -> Router<ApiContext> {
    Router::new()
        .route("/photos", post(upload_photo_handler))
        .route("/photos/", post(upload_photo_handler))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .route("/photos/{image_id}/edit", post(edit_photo_handler))
        .route("/photos/{image_id}", delete(delete_photo_handler))
}
