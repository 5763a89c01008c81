use super::decode_all;
use crate::database::comment::Comment;
use crate::database::{
    DbError, Direction, DocumentPath, DocumentStore, ImageStore, ListQuery, Write, to_fields,
};

pub struct CommentStore;

impl CommentStore {
    const SUB_COLLECTION: &'static str = "comments";

    #[must_use]
    pub fn collection(image_id: &str) -> String {
        ImageStore::path(image_id).sub_collection(Self::SUB_COLLECTION)
    }

    #[must_use]
    pub fn path(image_id: &str, comment_id: &str) -> DocumentPath {
        DocumentPath::new(Self::collection(image_id), comment_id)
    }

    pub async fn create(store: &dyn DocumentStore, comment: &Comment) -> Result<(), DbError> {
        store
            .set(
                &Self::path(&comment.image_id, &comment.id),
                to_fields(comment)?,
            )
            .await
    }

    pub async fn find_by_id(
        store: &dyn DocumentStore,
        image_id: &str,
        comment_id: &str,
    ) -> Result<Option<Comment>, DbError> {
        store
            .get(&Self::path(image_id, comment_id))
            .await?
            .map(|doc| doc.into_model())
            .transpose()
    }

    pub async fn list(
        store: &dyn DocumentStore,
        image_id: &str,
        direction: Direction,
    ) -> Result<Vec<Comment>, DbError> {
        let mut query = ListQuery::ordered_by("created_at");
        query.direction = direction;
        let docs = store.list(&Self::collection(image_id), &query).await?;
        Ok(decode_all(docs))
    }

    pub async fn delete(
        store: &dyn DocumentStore,
        image_id: &str,
        comment_id: &str,
    ) -> Result<(), DbError> {
        store.delete(&Self::path(image_id, comment_id)).await
    }

    /// Delete writes for every comment under an image.
    pub async fn delete_all_writes(
        store: &dyn DocumentStore,
        image_id: &str,
    ) -> Result<Vec<Write>, DbError> {
        let docs = store
            .list(&Self::collection(image_id), &ListQuery::all())
            .await?;
        Ok(docs
            .into_iter()
            .map(|doc| Write::Delete {
                path: Self::path(image_id, &doc.id),
            })
            .collect())
    }
}
