use crate::api_state::ApiContext;
use crate::users::handlers::{get_me_handler, set_role_handler};
use axum::{
    Router,
    routing::{get, post},
};

pub fn users_protected_router() -> Router<ApiContext> {
    Router::new()
        .route("/users/me", get(get_me_handler))
        .route("/users/{uid}/role", post(set_role_handler))
}
