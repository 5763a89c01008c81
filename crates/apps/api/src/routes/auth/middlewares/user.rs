use crate::api_state::ApiContext;
use crate::auth::middlewares::common::{authenticate_token, extract_context, extract_token};
use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
};
use common_services::auth::{AuthError, AuthUser};

/// Requires a valid bearer token. Handlers read the caller as `Extension<AuthUser>`.
#[derive(Clone, Debug)]
pub struct ApiUser(pub AuthUser);

impl<S> FromRequestParts<S> for ApiUser
where
    S: Send + Sync,
    State<ApiContext>: FromRequestParts<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts)?;
        let context = extract_context(parts, state).await?;
        let user = authenticate_token(&context, &token).await?;
        parts.extensions.insert(user.clone());
        Ok(Self(user))
    }
}
