use async_trait::async_trait;
use common_services::auth::{AuthError, TokenVerifier, VerifiedToken};
use common_services::media::{MediaError, MediaStore, UploadRequest, UploadedMedia};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Accepts a fixed set of opaque tokens.
pub struct StaticTokenVerifier {
    tokens: HashMap<String, VerifiedToken>,
}

impl StaticTokenVerifier {
    pub fn new(entries: &[(&str, &str, Option<&str>)]) -> Self {
        let tokens = entries
            .iter()
            .map(|(token, uid, email)| {
                (
                    (*token).to_owned(),
                    VerifiedToken {
                        uid: (*uid).to_owned(),
                        email: email.map(ToOwned::to_owned),
                    },
                )
            })
            .collect();
        Self { tokens }
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedToken, AuthError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| AuthError::InvalidToken("unknown test token".to_owned()))
    }
}

/// Media CDN stand-in that records uploads and deletions.
#[derive(Default)]
pub struct RecordingMedia {
    counter: AtomicUsize,
    pub uploads: Mutex<Vec<UploadRequest>>,
    pub destroyed: Mutex<Vec<String>>,
    pub fail_destroy: AtomicBool,
}

impl RecordingMedia {
    pub fn set_fail_destroy(&self, fail: bool) {
        self.fail_destroy.store(fail, Ordering::SeqCst);
    }

    pub fn destroyed(&self) -> Vec<String> {
        self.destroyed.lock().expect("poisoned").clone()
    }
}

#[async_trait]
impl MediaStore for RecordingMedia {
    async fn upload(&self, request: UploadRequest) -> Result<UploadedMedia, MediaError> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let stem = request
            .filename
            .rsplit_once('.')
            .map_or(request.filename.as_str(), |(stem, _)| stem);
        let public_id = format!("{}/{stem}_{n}", request.folder);
        let media = UploadedMedia {
            secure_url: format!("https://cdn.test/{public_id}.jpg"),
            public_id,
            width: Some(640),
            height: Some(480),
            bytes: Some(request.bytes.len() as u64),
            format: Some("jpg".to_owned()),
            resource_type: Some("image".to_owned()),
        };
        self.uploads.lock().expect("poisoned").push(request);
        Ok(media)
    }

    async fn destroy(&self, public_id: &str) -> Result<(), MediaError> {
        if self.fail_destroy.load(Ordering::SeqCst) {
            return Err(MediaError::Upstream {
                status: 502,
                message: "CDN unavailable".to_owned(),
            });
        }
        self.destroyed
            .lock()
            .expect("poisoned")
            .push(public_id.to_owned());
        Ok(())
    }
}
