use crate::auth::{AuthError, TokenVerifier};
use crate::database::app_user::UserRole;
use crate::database::{DocumentStore, UserStore};
use tracing::instrument;

/// An authenticated caller with their resolved role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
    pub role: UserRole,
}

impl AuthUser {
    #[must_use]
    pub const fn is_privileged(&self) -> bool {
        self.role.is_privileged()
    }
}

/// Verifies the bearer token, then looks up the caller's role. Every call re-verifies.
#[instrument(skip_all)]
pub async fn authenticate(
    verifier: &dyn TokenVerifier,
    store: &dyn DocumentStore,
    token: &str,
) -> Result<AuthUser, AuthError> {
    let verified = verifier.verify(token).await?;
    let role = UserStore::find_role(store, &verified.uid).await?;
    Ok(AuthUser {
        uid: verified.uid,
        email: verified.email,
        role,
    })
}
