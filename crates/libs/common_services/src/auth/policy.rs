use crate::auth::AuthUser;
use crate::database::app_user::UserRole;
use crate::database::image::Privacy;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Something a caller wants to do, with the ownership facts needed to decide it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
    UploadImage,
    ReorderImages,
    /// Role-gated delete of any image, regardless of uploader.
    DeleteAnyImage,
    /// Edit or delete one image.
    ModifyImage { uploader: Option<&'a str> },
    ViewImage {
        privacy: Privacy,
        uploader: Option<&'a str>,
    },
    AddToAlbum { creator: &'a str },
    DeleteComment { author: Option<&'a str> },
    AssignRole,
}

impl Action<'_> {
    const fn describe(&self) -> &'static str {
        match self {
            Self::UploadImage => "upload images",
            Self::ReorderImages => "reorder images",
            Self::DeleteAnyImage => "delete images",
            Self::ModifyImage { .. } => "modify this image",
            Self::ViewImage { .. } => "view this image",
            Self::AddToAlbum { .. } => "add images to this album",
            Self::DeleteComment { .. } => "delete this comment",
            Self::AssignRole => "assign roles",
        }
    }
}

fn is_owner(user: &AuthUser, owner: Option<&str>) -> bool {
    owner.is_some_and(|owner| owner == user.uid)
}

/// The permission table. Every denial is `Forbidden`.
pub fn authorize(user: Option<&AuthUser>, action: &Action<'_>) -> Result<(), PolicyError> {
    let allowed = match (action, user) {
        (Action::ViewImage { privacy: Privacy::Public, .. }, _) => true,
        (_, None) => false,
        (Action::UploadImage | Action::ReorderImages | Action::DeleteAnyImage, Some(user)) => {
            user.is_privileged()
        }
        (
            Action::ModifyImage { uploader } | Action::ViewImage { uploader, .. },
            Some(user),
        ) => user.is_privileged() || is_owner(user, *uploader),
        (Action::AddToAlbum { creator }, Some(user)) => {
            user.is_privileged() || is_owner(user, Some(*creator))
        }
        (Action::DeleteComment { author }, Some(user)) => {
            user.is_privileged() || is_owner(user, *author)
        }
        (Action::AssignRole, Some(user)) => user.role == UserRole::Admin,
    };

    if allowed {
        Ok(())
    } else {
        Err(PolicyError::Forbidden(format!(
            "You do not have permission to {}.",
            action.describe()
        )))
    }
}

/// Authorizes a role assignment and parses the requested role.
/// The caller's permission is checked before the role value.
pub fn authorize_role_assignment(
    user: Option<&AuthUser>,
    requested_role: &str,
) -> Result<UserRole, PolicyError> {
    authorize(user, &Action::AssignRole)?;
    requested_role.parse().map_err(|_| {
        PolicyError::BadRequest(format!(
            "Invalid role '{requested_role}', expected one of admin, editor, visitor"
        ))
    })
}
