use crate::api_state::ApiContext;
use crate::extract::ApiJson;
use axum::Json;
use axum::extract::State;
use common_services::api::ApiError;
use common_services::api::search::interfaces::{ImageListResponse, SearchRequest};
use common_services::api::search::service::search_images;

/// Filter images by keyword, album, license, upload date range and camera model.
///
/// All given filters must match. Only the most recent documents up to the scan cap are considered.
#[utoipa::path(
    post,
    path = "/search",
    tag = "Search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Matching images.", body = ImageListResponse),
        (status = 400, description = "Invalid filter, e.g. a limit out of range."),
    )
)]
pub async fn search_handler(
    State(context): State<ApiContext>,
    ApiJson(request): ApiJson<SearchRequest>,
) -> Result<Json<ImageListResponse>, ApiError> {
    let images = search_images(
        context.store.as_ref(),
        &context.settings.constants.search,
        &request,
    )
    .await?;
    Ok(Json(images))
}
