use crate::database::DbError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;

pub type Fields = Map<String, Value>;

/// Address of a single document: `collection/id`. Collections may be nested,
/// e.g. `images/abc/comments`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentPath {
    collection: String,
    id: String,
}

impl DocumentPath {
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
        }
    }

    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Path of a collection nested under this document.
    #[must_use]
    pub fn sub_collection(&self, name: &str) -> String {
        format!("{self}/{name}")
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    /// Deserializes the fields. A missing `id` field is filled from the document id.
    pub fn into_model<T: DeserializeOwned>(mut self) -> Result<T, DbError> {
        self.fields
            .entry("id")
            .or_insert_with(|| Value::String(self.id.clone()));
        serde_json::from_value(Value::Object(self.fields)).map_err(|e| DbError::Malformed {
            path: self.id,
            message: e.to_string(),
        })
    }
}

/// Serializes a model into top-level document fields.
pub fn to_fields<T: Serialize>(model: &T) -> Result<Fields, DbError> {
    match serde_json::to_value(model)? {
        Value::Object(fields) => Ok(fields),
        other => Err(DbError::Malformed {
            path: String::new(),
            message: format!("expected an object, got {other}"),
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub order_by: Option<String>,
    pub direction: Direction,
    pub limit: Option<usize>,
}

impl ListQuery {
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Documents lacking `field` are left out of the result.
    #[must_use]
    pub fn ordered_by(field: &str) -> Self {
        Self {
            order_by: Some(field.to_owned()),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn descending(mut self) -> Self {
        self.direction = Direction::Descending;
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// One write inside an atomic commit.
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    /// Replace the whole document, creating it if needed.
    Set { path: DocumentPath, fields: Fields },
    /// Overwrite only the given top-level fields, creating the document if needed.
    Merge { path: DocumentPath, fields: Fields },
    /// Like `Merge`, but the document must already exist.
    Update { path: DocumentPath, fields: Fields },
    Delete { path: DocumentPath },
    /// Append `value` to the array `field` unless already present. Document must exist.
    ArrayUnion {
        path: DocumentPath,
        field: String,
        value: Value,
    },
    /// Remove every occurrence of `value` from the array `field`. Document must exist.
    ArrayRemove {
        path: DocumentPath,
        field: String,
        value: Value,
    },
}

impl Write {
    #[must_use]
    pub const fn path(&self) -> &DocumentPath {
        match self {
            Self::Set { path, .. }
            | Self::Merge { path, .. }
            | Self::Update { path, .. }
            | Self::Delete { path }
            | Self::ArrayUnion { path, .. }
            | Self::ArrayRemove { path, .. } => path,
        }
    }
}
