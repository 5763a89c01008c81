mod album_store;
mod comment_store;
mod image_store;
mod user_store;

pub use album_store::*;
pub use comment_store::*;
pub use image_store::*;
pub use user_store::*;

use crate::database::Document;
use serde::de::DeserializeOwned;
use tracing::warn;

/// Decodes documents, skipping (and logging) any that don't fit the model.
fn decode_all<T: DeserializeOwned>(documents: Vec<Document>) -> Vec<T> {
    documents
        .into_iter()
        .filter_map(|doc| match doc.into_model() {
            Ok(model) => Some(model),
            Err(e) => {
                warn!("Skipping unreadable document: {e}");
                None
            }
        })
        .collect()
}
