use super::decode_all;
use crate::database::image::Image;
use crate::database::{
    DbError, DocumentPath, DocumentStore, Fields, ListQuery, Write, to_fields,
};
use serde_json::Value;

pub struct ImageStore;

impl ImageStore {
    pub const COLLECTION: &'static str = "images";

    #[must_use]
    pub fn path(image_id: &str) -> DocumentPath {
        DocumentPath::new(Self::COLLECTION, image_id)
    }

    pub async fn find_by_id(
        store: &dyn DocumentStore,
        image_id: &str,
    ) -> Result<Option<Image>, DbError> {
        store
            .get(&Self::path(image_id))
            .await?
            .map(|doc| doc.into_model())
            .transpose()
    }

    pub async fn exists(store: &dyn DocumentStore, image_id: &str) -> Result<bool, DbError> {
        Ok(store.get(&Self::path(image_id)).await?.is_some())
    }

    pub async fn create(store: &dyn DocumentStore, image: &Image) -> Result<(), DbError> {
        store.set(&Self::path(&image.id), to_fields(image)?).await
    }

    pub async fn merge_fields(
        store: &dyn DocumentStore,
        image_id: &str,
        fields: Fields,
    ) -> Result<(), DbError> {
        store.merge(&Self::path(image_id), fields).await
    }

    /// All images by ascending gallery position.
    pub async fn list_ordered(store: &dyn DocumentStore) -> Result<Vec<Image>, DbError> {
        let docs = store
            .list(Self::COLLECTION, &ListQuery::ordered_by("order"))
            .await?;
        Ok(decode_all(docs))
    }

    pub async fn list_all(store: &dyn DocumentStore) -> Result<Vec<Image>, DbError> {
        let docs = store.list(Self::COLLECTION, &ListQuery::all()).await?;
        Ok(decode_all(docs))
    }

    /// Up to `cap` images in no particular order.
    pub async fn scan(store: &dyn DocumentStore, cap: usize) -> Result<Vec<Image>, DbError> {
        let docs = store
            .list(Self::COLLECTION, &ListQuery::all().limit(cap))
            .await?;
        Ok(decode_all(docs))
    }

    /// Gives every listed image its position in `order` as its new ordering index,
    /// atomically. Fails as a whole if any image is missing.
    pub async fn reorder(store: &dyn DocumentStore, order: &[String]) -> Result<(), DbError> {
        let writes = order
            .iter()
            .enumerate()
            .map(|(index, image_id)| {
                let mut fields = Fields::new();
                fields.insert("order".to_owned(), Value::from(index as i64));
                Write::Update {
                    path: Self::path(image_id),
                    fields,
                }
            })
            .collect();
        store.commit(writes).await
    }

    pub async fn add_like(
        store: &dyn DocumentStore,
        image_id: &str,
        identifier: &str,
    ) -> Result<(), DbError> {
        store
            .array_union(&Self::path(image_id), "likes", Value::from(identifier))
            .await
    }

    pub async fn remove_like(
        store: &dyn DocumentStore,
        image_id: &str,
        identifier: &str,
    ) -> Result<(), DbError> {
        store
            .array_remove(&Self::path(image_id), "likes", Value::from(identifier))
            .await
    }

    /// Write that points an existing image at an album, for use inside a batch.
    /// The batch fails if the image is gone.
    #[must_use]
    pub fn album_write(image_id: &str, album_id: &str) -> Write {
        let mut fields = Fields::new();
        fields.insert("album_id".to_owned(), Value::from(album_id));
        Write::Update {
            path: Self::path(image_id),
            fields,
        }
    }
}
