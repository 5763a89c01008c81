use crate::database::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use utoipa::ToSchema;

/// Who may see an image besides its uploader and privileged roles.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    #[default]
    Public,
    Private,
}

impl Privacy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for Privacy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parsing, used for request bodies.
impl std::str::FromStr for Privacy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            other => Err(format!("privacy must be 'public' or 'private', got '{other}'")),
        }
    }
}

impl<'de> Deserialize<'de> for Privacy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Stored documents are read leniently: unset means public, anything unrecognised is
/// treated as private.
fn stored_privacy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Privacy, D::Error> {
    Ok(match Option::<String>::deserialize(deserializer)?.as_deref() {
        None | Some("" | "public") => Privacy::Public,
        Some(_) => Privacy::Private,
    })
}

/// An uploaded image and its metadata, stored in the `images` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Image {
    pub id: String,
    /// Identifier of the binary on the media CDN.
    pub public_id: Option<String>,
    pub filename: Option<String>,
    pub url: Option<String>,
    pub mime_type: Option<String>,
    pub format: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub size_bytes: Option<u64>,
    pub title: Option<String>,
    pub caption: Option<String>,
    pub alt_text: Option<String>,
    pub license: Option<String>,
    #[serde(default, deserialize_with = "stored_privacy")]
    pub privacy: Privacy,
    pub uploaded_by: Option<String>,
    #[serde(with = "timestamp")]
    pub uploaded_at: DateTime<Utc>,
    pub album_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub exif: BTreeMap<String, String>,
    #[serde(default)]
    pub likes: Vec<String>,
    /// Position in the gallery. Not necessarily contiguous.
    #[serde(default)]
    pub order: i64,
}

impl Image {
    #[must_use]
    pub fn is_uploaded_by(&self, uid: &str) -> bool {
        self.uploaded_by.as_deref() == Some(uid)
    }

    #[must_use]
    pub fn camera_model(&self) -> Option<&str> {
        self.exif.get("Model").map(String::as_str)
    }
}
