use crate::runner::context::test_context::TestContext;
use color_eyre::Result;
use color_eyre::eyre::bail;
use common_services::database::image::Image;
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde_json::Value;

/// A few bytes standing in for a JPEG. The fake CDN never decodes them.
pub fn image_form(filename: &str) -> Result<Form> {
    let part = Part::bytes(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10])
        .file_name(filename.to_owned())
        .mime_str("image/jpeg")?;
    Ok(Form::new().part("file", part))
}

/// Uploads through `/photos` with the given query parameters.
pub async fn upload_photo(
    context: &TestContext,
    token: &str,
    filename: &str,
    query: &[(&str, &str)],
) -> Result<Image> {
    let response = context
        .http_client
        .post(context.url("/photos"))
        .bearer_auth(token)
        .query(query)
        .multipart(image_form(filename)?)
        .send()
        .await?;
    let response = expect_status(response, StatusCode::OK).await?;
    Ok(response.json().await?)
}

/// Uploads through the legacy `/api/upload` route and returns the new image id.
pub async fn upload_legacy(
    context: &TestContext,
    token: &str,
    filename: &str,
    album: Option<&str>,
) -> Result<String> {
    let mut form = image_form(filename)?;
    if let Some(album) = album {
        form = form.text("album", album.to_owned());
    }
    let response = context
        .http_client
        .post(context.url("/api/upload"))
        .bearer_auth(token)
        .multipart(form)
        .send()
        .await?;
    let response = expect_status(response, StatusCode::OK).await?;
    let body: Value = response.json().await?;
    match body["id"].as_str() {
        Some(id) => Ok(id.to_owned()),
        None => bail!("upload response has no id: {body}"),
    }
}

/// Fails with the response body when the status is not the expected one.
pub async fn expect_status(response: Response, expected: StatusCode) -> Result<Response> {
    let status = response.status();
    if status != expected {
        let body = response.text().await.unwrap_or_default();
        bail!("expected {expected}, got {status}: {body}");
    }
    Ok(response)
}

/// Reads the `{"error": ...}` message of a failed request.
pub async fn error_message(response: Response) -> Result<String> {
    let body: Value = response.json().await?;
    Ok(body["error"].as_str().unwrap_or_default().to_owned())
}
