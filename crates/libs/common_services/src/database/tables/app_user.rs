use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Authorization role, stored per user in the `users` collection.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Visitor,
    Editor,
    Admin,
}

impl UserRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Visitor => "visitor",
            Self::Editor => "editor",
            Self::Admin => "admin",
        }
    }

    /// Editors and admins may manage any image or comment.
    #[must_use]
    pub const fn is_privileged(self) -> bool {
        matches!(self, Self::Editor | Self::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "visitor" => Ok(Self::Visitor),
            "editor" => Ok(Self::Editor),
            "admin" => Ok(Self::Admin),
            other => Err(format!("invalid role '{other}'")),
        }
    }
}

/// A user record. Absent records and malformed roles both mean [`UserRole::Visitor`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct AppUser {
    pub role: UserRole,
    pub username: Option<String>,
    pub email: Option<String>,
}
