use crate::auth::{AuthError, PolicyError};
use crate::database::DbError;
use crate::media::MediaError;
use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};
use validator::ValidationErrors;

/// Errors returned by every route, mapped onto HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    /// The document store or media CDN failed.
    #[error("{0}")]
    Upstream(String),
}

fn log_error(error: &ApiError) {
    match error {
        ApiError::Unauthorized(message) => warn!("Unauthorized: {message}"),
        ApiError::Forbidden(message) => warn!("Forbidden: {message}"),
        ApiError::NotFound(message) => warn!("Not found: {message}"),
        ApiError::BadRequest(message) => warn!("Bad request: {message}"),
        ApiError::Upstream(message) => error!("Upstream failure: {message}"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log_error(&self);

        let status = match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        let mut response = (status, body).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(path) => Self::NotFound(format!("{path} not found")),
            other => Self::Upstream(other.to_string()),
        }
    }
}

impl From<MediaError> for ApiError {
    fn from(err: MediaError) -> Self {
        Self::Upstream(err.to_string())
    }
}

impl From<PolicyError> for ApiError {
    fn from(err: PolicyError) -> Self {
        match err {
            PolicyError::Forbidden(message) => Self::Forbidden(message),
            PolicyError::BadRequest(message) => Self::BadRequest(message),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => Self::Unauthorized("Missing bearer token".to_owned()),
            AuthError::InvalidToken(reason) => Self::Unauthorized(format!("Invalid token: {reason}")),
            AuthError::Internal(e) => Self::Upstream(e.to_string()),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(err: ValidationErrors) -> Self {
        Self::BadRequest(err.to_string())
    }
}

macro_rules! bad_request_from {
    ($($rejection:ty),* $(,)?) => {
        $(
            impl From<$rejection> for ApiError {
                fn from(err: $rejection) -> Self {
                    Self::BadRequest(err.body_text())
                }
            }
        )*
    };
}

bad_request_from!(
    JsonRejection,
    QueryRejection,
    PathRejection,
    MultipartRejection,
    MultipartError,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_not_found_is_404_and_other_failures_surface_their_message() {
        let not_found = ApiError::from(DbError::NotFound("images/x".into()));
        let upstream = ApiError::from(DbError::Upstream {
            status: 503,
            message: "backend unavailable".into(),
        });

        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);
        assert!(matches!(&upstream, ApiError::Upstream(m) if m.contains("backend unavailable")));
        assert_eq!(
            upstream.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn unauthorized_announces_bearer_scheme() {
        let response = ApiError::from(AuthError::MissingToken).into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE),
            Some(&HeaderValue::from_static("Bearer"))
        );
    }

    #[tokio::test]
    async fn non_multipart_upload_is_bad_request() {
        // ARRANGE
        let request = axum::http::Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from("{}"))
            .expect("valid request");

        // ACT
        let rejection = <axum::extract::Multipart as axum::extract::FromRequest<()>>::from_request(
            request,
            &(),
        )
        .await
        .err();

        // ASSERT
        let rejection = rejection.map(ApiError::from);
        assert!(matches!(rejection, Some(ApiError::BadRequest(_))));
        assert_eq!(
            rejection.map(|e| e.into_response().status()),
            Some(StatusCode::BAD_REQUEST)
        );
    }
}
