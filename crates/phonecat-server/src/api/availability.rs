use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_scraper_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct RefreshResult {
    refreshed_at: DateTime<Utc>,
    locale_count: usize,
    disabled: Vec<String>,
}

pub(super) async fn refresh_availability(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<RefreshResult>>, ApiError> {
    let snapshot = state
        .storefront
        .refresh_availability()
        .await
        .map_err(|e| map_scraper_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: RefreshResult {
            refreshed_at: snapshot.refreshed_at,
            locale_count: snapshot.locale_count,
            disabled: snapshot.disabled.iter().cloned().collect(),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
