use crate::database::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A comment in the `images/{image_id}/comments` sub-collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Comment {
    pub id: String,
    pub image_id: String,
    /// Legacy comments stored the free-form identifier under `user_id`.
    #[serde(alias = "user_id")]
    pub author_uid: Option<String>,
    pub user_email: Option<String>,
    pub content: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}
