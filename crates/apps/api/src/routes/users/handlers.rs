use crate::api_state::ApiContext;
use crate::extract::ApiQuery;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use common_services::api::ApiError;
use common_services::api::users::interfaces::{RoleAssignment, SetRoleParams, UserProfile};
use common_services::api::users::service::{get_me, set_role};
use common_services::auth::AuthUser;

/// The signed-in caller's profile and role.
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Caller profile.", body = UserProfile),
        (status = 401, description = "Missing or invalid token."),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_me_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = get_me(context.store.as_ref(), &user).await?;
    Ok(Json(profile))
}

/// Assign a role to a user. Admin only.
#[utoipa::path(
    post,
    path = "/users/{uid}/role",
    tag = "Users",
    params(
        ("uid" = String, Path, description = "Identity provider user id."),
        SetRoleParams
    ),
    responses(
        (status = 200, description = "Role stored.", body = RoleAssignment),
        (status = 400, description = "Unknown role."),
        (status = 403, description = "Caller is not an admin."),
    ),
    security(("bearer_auth" = []))
)]
pub async fn set_role_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<AuthUser>,
    Path(uid): Path<String>,
    ApiQuery(params): ApiQuery<SetRoleParams>,
) -> Result<Json<RoleAssignment>, ApiError> {
    let assignment = set_role(context.store.as_ref(), &user, &uid, &params.role).await?;
    Ok(Json(assignment))
}
