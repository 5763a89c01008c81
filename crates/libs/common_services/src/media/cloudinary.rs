use crate::media::{MediaError, MediaStore, UploadNaming, UploadRequest, UploadedMedia};
use app_state::CloudinarySettings;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::{Digest, Sha1};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Cloudinary image upload API, authenticated with signed requests.
#[derive(Clone)]
pub struct CloudinaryClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    api_secret: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
    width: Option<u32>,
    height: Option<u32>,
    bytes: Option<u64>,
    format: Option<String>,
    resource_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: String,
}

impl CloudinaryClient {
    #[must_use]
    pub fn new(http_client: reqwest::Client, settings: &CloudinarySettings) -> Self {
        Self {
            http_client,
            base_url: format!("{API_BASE}/{}/image", settings.cloud_name),
            api_key: settings.api_key.clone(),
            api_secret: settings.api_secret.clone(),
        }
    }

    /// Adds `timestamp`, `api_key` and `signature` to the parameters of a signed call.
    fn signed(&self, mut params: BTreeMap<&'static str, String>) -> BTreeMap<&'static str, String> {
        params.insert("timestamp", Utc::now().timestamp().to_string());
        let signature = sign(&params, &self.api_secret);
        params.insert("api_key", self.api_key.clone());
        params.insert("signature", signature);
        params
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, MediaError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map_or(body, |e| e.error.message);
        Err(MediaError::Upstream {
            status: status.as_u16(),
            message,
        })
    }
}

/// Cloudinary request signature: SHA-1 over the sorted `key=value` pairs joined by `&`,
/// followed by the API secret.
#[must_use]
pub fn sign(params: &BTreeMap<&str, String>, api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    let mut hasher = Sha1::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn upload_params(folder: &str, naming: UploadNaming) -> BTreeMap<&'static str, String> {
    let mut params = BTreeMap::new();
    params.insert("folder", folder.to_owned());
    match naming {
        UploadNaming::Overwrite => {
            params.insert("overwrite", "true".to_owned());
        }
        UploadNaming::Unique => {
            params.insert("use_filename", "true".to_owned());
            params.insert("unique_filename", "true".to_owned());
        }
    }
    params
}

#[async_trait]
impl MediaStore for CloudinaryClient {
    #[instrument(skip(self, request), fields(filename = %request.filename, folder = %request.folder))]
    async fn upload(&self, request: UploadRequest) -> Result<UploadedMedia, MediaError> {
        let params = self.signed(upload_params(&request.folder, request.naming));
        let mut form = Form::new().part(
            "file",
            Part::bytes(request.bytes.to_vec()).file_name(request.filename),
        );
        for (key, value) in params {
            form = form.text(key, value);
        }

        let response = self
            .http_client
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .await?;
        let uploaded: UploadResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))?;
        debug!("Uploaded {} to the CDN", uploaded.public_id);

        Ok(UploadedMedia {
            public_id: uploaded.public_id,
            secure_url: uploaded.secure_url,
            width: uploaded.width,
            height: uploaded.height,
            bytes: uploaded.bytes,
            format: uploaded.format,
            resource_type: uploaded.resource_type,
        })
    }

    #[instrument(skip(self))]
    async fn destroy(&self, public_id: &str) -> Result<(), MediaError> {
        let mut params = BTreeMap::new();
        params.insert("public_id", public_id.to_owned());
        params.insert("invalidate", "true".to_owned());
        let params = self.signed(params);

        let response = self
            .http_client
            .post(format!("{}/destroy", self.base_url))
            .form(&params)
            .send()
            .await?;
        let destroyed: DestroyResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))?;

        match destroyed.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(MediaError::InvalidResponse(format!(
                "destroy of {public_id} returned '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_matches_documented_example() {
        let mut params = BTreeMap::new();
        params.insert("timestamp", "1315060510".to_owned());
        params.insert("public_id", "sample_image".to_owned());
        params.insert("eager", "w_400,h_300,c_pad|w_260,h_200,c_crop".to_owned());

        assert_eq!(
            sign(&params, "abcd"),
            "bfd09f95f331f558cbd1320e67aa8d488770583e"
        );
    }

    #[test]
    fn signed_params_exclude_key_from_signature() {
        let client = CloudinaryClient::new(
            reqwest::Client::new(),
            &CloudinarySettings {
                cloud_name: "demo".into(),
                api_key: "key".into(),
                api_secret: "secret".into(),
                upload_root: "root".into(),
            },
        );

        let params = client.signed(upload_params("albums/x", UploadNaming::Unique));

        let mut unsigned = params.clone();
        let signature = unsigned.remove("signature").unwrap_or_default();
        unsigned.remove("api_key");
        assert_eq!(signature, sign(&unsigned, "secret"));
        assert_eq!(params.get("api_key").map(String::as_str), Some("key"));
        assert!(!params.contains_key("overwrite"));
        assert_eq!(params.get("unique_filename").map(String::as_str), Some("true"));
        assert_eq!(client.base_url, "https://api.cloudinary.com/v1_1/demo/image");
    }
}
