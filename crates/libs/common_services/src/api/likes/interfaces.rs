use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Who is liking. The email is preferred when both are given.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LikeRequest {
    pub user_email: Option<String>,
    pub user_id: Option<String>,
}

impl LikeRequest {
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        [&self.user_email, &self.user_id]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|id| !id.is_empty())
    }
}

#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
pub struct LikeToggleResponse {
    pub liked: bool,
    pub total_likes: usize,
}
