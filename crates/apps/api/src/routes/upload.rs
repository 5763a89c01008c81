use axum::extract::multipart::Multipart;
use bytes::Bytes;
use common_services::api::ApiError;
use common_services::api::images::interfaces::UploadedFile;
use std::collections::HashMap;
use tracing::debug;

/// A multipart upload: the `file` part plus every other part read as text.
#[derive(Debug)]
pub struct UploadForm {
    pub file: UploadedFile,
    pub fields: HashMap<String, String>,
}

pub async fn read_upload(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut file = None;
    let mut fields = HashMap::new();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(ToOwned::to_owned) else {
            continue;
        };
        if name == "file" {
            let filename = field.file_name().unwrap_or("upload").to_owned();
            let content_type = field.content_type().map(ToOwned::to_owned);
            let bytes: Bytes = field.bytes().await?;
            debug!(filename = %filename, size = bytes.len(), "Received upload part");
            file = Some(UploadedFile {
                bytes,
                filename,
                content_type,
            });
        } else {
            let value = field.text().await?;
            if !value.is_empty() {
                fields.insert(name, value);
            }
        }
    }

    let file = file.ok_or_else(|| ApiError::BadRequest("No file uploaded.".to_owned()))?;
    Ok(UploadForm { file, fields })
}
