use crate::api_state::ApiContext;
use crate::auth::middlewares::common::{authenticate_token, extract_context, extract_token};
use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
};
use common_services::auth::{AuthError, AuthUser};

/// Anonymous callers pass through as `None`; a token that is present must be valid.
#[derive(Clone, Debug)]
pub struct OptionalUser(pub Option<AuthUser>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
    State<ApiContext>: FromRequestParts<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match extract_token(parts) {
            Ok(token) => {
                let context = extract_context(parts, state).await?;
                let user = authenticate_token(&context, &token).await?;
                parts.extensions.insert(Self(Some(user.clone())));
                Ok(Self(Some(user)))
            }
            Err(AuthError::MissingToken) => {
                parts.extensions.insert(Self(None));
                Ok(Self(None))
            }
            Err(e) => Err(e),
        }
    }
}
