use crate::database::app_user::UserRole;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub role: UserRole,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SetRoleParams {
    /// One of `admin`, `editor`, `visitor`.
    pub role: String,
}

#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
pub struct RoleAssignment {
    pub uid: String,
    pub role: UserRole,
}
