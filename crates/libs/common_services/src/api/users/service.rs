use crate::api::ApiError;
use crate::api::users::interfaces::{RoleAssignment, UserProfile};
use crate::auth::{AuthUser, authorize_role_assignment};
use crate::database::{DocumentStore, UserStore};
use tracing::{info, instrument};

const UNKNOWN_USERNAME: &str = "unknown";

#[instrument(skip(store, user))]
pub async fn get_me(store: &dyn DocumentStore, user: &AuthUser) -> Result<UserProfile, ApiError> {
    let record = UserStore::find_by_id(store, &user.uid).await?;
    let username = record
        .as_ref()
        .and_then(|record| record.username.clone())
        .unwrap_or_else(|| UNKNOWN_USERNAME.to_owned());
    let email = user
        .email
        .clone()
        .or_else(|| record.and_then(|record| record.email));

    Ok(UserProfile {
        id: user.uid.clone(),
        username,
        email,
        role: user.role,
    })
}

/// Admin-only. Merge-writes the role so other profile fields survive.
#[instrument(skip(store, user))]
pub async fn set_role(
    store: &dyn DocumentStore,
    user: &AuthUser,
    target_uid: &str,
    requested_role: &str,
) -> Result<RoleAssignment, ApiError> {
    let role = authorize_role_assignment(Some(user), requested_role)?;
    UserStore::set_role(store, target_uid, role).await?;
    info!("{} set role of {target_uid} to {role}", user.uid);
    Ok(RoleAssignment {
        uid: target_uid.to_owned(),
        role,
    })
}
