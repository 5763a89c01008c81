use super::decode_all;
use crate::database::album::Album;
use crate::database::{
    DbError, DocumentPath, DocumentStore, ImageStore, ListQuery, Write, to_fields,
};
use serde_json::Value;

pub struct AlbumStore;

impl AlbumStore {
    pub const COLLECTION: &'static str = "albums";

    #[must_use]
    pub fn path(album_id: &str) -> DocumentPath {
        DocumentPath::new(Self::COLLECTION, album_id)
    }

    pub async fn create(store: &dyn DocumentStore, album: &Album) -> Result<(), DbError> {
        store.set(&Self::path(&album.id), to_fields(album)?).await
    }

    pub async fn find_by_id(
        store: &dyn DocumentStore,
        album_id: &str,
    ) -> Result<Option<Album>, DbError> {
        store
            .get(&Self::path(album_id))
            .await?
            .map(|doc| doc.into_model())
            .transpose()
    }

    /// All albums, oldest first.
    pub async fn list(store: &dyn DocumentStore) -> Result<Vec<Album>, DbError> {
        let docs = store
            .list(Self::COLLECTION, &ListQuery::ordered_by("created_at"))
            .await?;
        Ok(decode_all(docs))
    }

    /// Adds the image to the album's image list and records the album on the image,
    /// in one atomic batch.
    pub async fn add_image(
        store: &dyn DocumentStore,
        album_id: &str,
        image_id: &str,
    ) -> Result<(), DbError> {
        store
            .commit(vec![
                Write::ArrayUnion {
                    path: Self::path(album_id),
                    field: "image_ids".to_owned(),
                    value: Value::from(image_id),
                },
                ImageStore::album_write(image_id, album_id),
            ])
            .await
    }

    /// Write that drops an image from an existing album's image list.
    #[must_use]
    pub fn remove_image_write(album_id: &str, image_id: &str) -> Write {
        Write::ArrayRemove {
            path: Self::path(album_id),
            field: "image_ids".to_owned(),
            value: Value::from(image_id),
        }
    }
}
