pub mod albums;
mod api_doc;
pub mod auth;
pub mod comments;
pub mod extract;
pub mod images;
pub mod photos;
pub mod root;
pub mod search;
pub mod upload;
pub mod users;

use crate::albums::router::{albums_protected_router, albums_public_router};
use crate::api_state::ApiContext;
use crate::auth::middlewares::optional_user::OptionalUser;
use crate::auth::middlewares::user::ApiUser;
use crate::comments::router::{comments_protected_router, comments_public_router};
use crate::images::router::{
    legacy_auth_optional_router, legacy_protected_router, legacy_public_router,
};
use crate::photos::router::{photos_auth_optional_router, photos_protected_router};
use crate::root::router::root_public_router;
use crate::routes::api_doc::ApiDoc;
use crate::search::router::search_public_router;
use crate::users::router::users_protected_router;
use axum::middleware::from_extractor_with_state;
use axum::{Json, Router, routing::get};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

// --- Router Construction ---
pub fn create_router(api_state: ApiContext) -> Router {
    let openapi = ApiDoc::openapi();
    let max_upload_bytes = api_state.settings.api.max_upload_bytes;
    Router::new()
        .merge(Scalar::with_url("/docs", openapi.clone()))
        .route("/openapi.json", get(move || async move { Json(openapi) }))
        .merge(public_routes())
        .merge(protected_routes(api_state.clone(), max_upload_bytes))
        .merge(auth_optional_routes(api_state.clone()))
        .with_state(api_state)
}

fn public_routes() -> Router<ApiContext> {
    Router::new()
        .merge(root_public_router())
        .merge(legacy_public_router())
        .merge(albums_public_router())
        .merge(comments_public_router())
        .merge(search_public_router())
}

fn auth_optional_routes(api_state: ApiContext) -> Router<ApiContext> {
    Router::new()
        .merge(legacy_auth_optional_router())
        .merge(photos_auth_optional_router())
        .route_layer(from_extractor_with_state::<OptionalUser, ApiContext>(
            api_state,
        ))
}

fn protected_routes(api_state: ApiContext, max_upload_bytes: usize) -> Router<ApiContext> {
    Router::new()
        .merge(legacy_protected_router(max_upload_bytes))
        .merge(photos_protected_router(max_upload_bytes))
        .merge(albums_protected_router())
        .merge(comments_protected_router())
        .merge(users_protected_router())
        .route_layer(from_extractor_with_state::<ApiUser, ApiContext>(api_state))
}
