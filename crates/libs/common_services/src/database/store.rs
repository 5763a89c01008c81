use crate::database::{DbError, Document, DocumentPath, Fields, ListQuery, Write};
use async_trait::async_trait;
use serde_json::Value;

/// A collection-of-documents database with atomic multi-document commits.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, DbError>;

    async fn set(&self, path: &DocumentPath, fields: Fields) -> Result<(), DbError>;

    async fn merge(&self, path: &DocumentPath, fields: Fields) -> Result<(), DbError>;

    /// Deleting a missing document is not an error.
    async fn delete(&self, path: &DocumentPath) -> Result<(), DbError>;

    async fn list(&self, collection: &str, query: &ListQuery) -> Result<Vec<Document>, DbError>;

    /// Applies every write or none of them.
    async fn commit(&self, writes: Vec<Write>) -> Result<(), DbError>;

    async fn array_union(
        &self,
        path: &DocumentPath,
        field: &str,
        value: Value,
    ) -> Result<(), DbError> {
        self.commit(vec![Write::ArrayUnion {
            path: path.clone(),
            field: field.to_owned(),
            value,
        }])
        .await
    }

    async fn array_remove(
        &self,
        path: &DocumentPath,
        field: &str,
        value: Value,
    ) -> Result<(), DbError> {
        self.commit(vec![Write::ArrayRemove {
            path: path.clone(),
            field: field.to_owned(),
            value,
        }])
        .await
    }
}
