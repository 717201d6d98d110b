use axum::{
    extract::{Path, State},
    Extension, Json,
};
use phonecat_core::{ConfigSummary, LocaleEntry};

use crate::middleware::RequestId;

use super::{map_scraper_error, ApiError, ApiResponse, AppState, ResponseMeta};

pub(super) async fn list_locales(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<LocaleEntry>>>, ApiError> {
    let data = state
        .storefront
        .get_locales()
        .await
        .map_err(|e| map_scraper_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `GET /api/v1/locales/{locale}/config`, where `{locale}` may span several
/// path segments (`ca/fr`).
pub(super) async fn get_locale_config(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(rest): Path<String>,
) -> Result<Json<ApiResponse<ConfigSummary>>, ApiError> {
    let Some(locale) = rest.strip_suffix("/config") else {
        return Err(ApiError::new(req_id.0, "not_found", "no such route"));
    };

    let data = state
        .storefront
        .get_config(locale)
        .await
        .map_err(|e| map_scraper_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
