use axum::extract::{FromRequest, FromRequestParts};
use common_services::api::ApiError;

/// `axum::Json`, rejecting malformed bodies with a 400 `ApiError`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Query`, rejecting malformed query strings with a 400 `ApiError`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
