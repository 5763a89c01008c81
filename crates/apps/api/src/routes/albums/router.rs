use crate::albums::handlers::{
    add_image_to_album_handler, create_album_handler, get_album_handler, list_albums_handler,
};
use crate::api_state::ApiContext;
use axum::{
    Router,
    routing::{get, post},
};

pub fn albums_public_router() -> Router<ApiContext> {
    Router::new()
        .route("/albums", get(list_albums_handler))
        .route("/albums/", get(list_albums_handler))
        .route("/albums/{album_id}", get(get_album_handler))
}

pub fn albums_protected_router() -> Router<ApiContext> {
    Router::new()
        .route("/albums", post(create_album_handler))
        .route("/albums/", post(create_album_handler))
        .route("/albums/{album_id}/add", post(add_image_to_album_handler))
}
