use axum::{
    extract::{Query, State},
    http::{header::ACCEPT_LANGUAGE, HeaderMap},
    Extension, Json,
};
use phonecat_core::CatalogModel;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_scraper_error, ApiError, ApiResponse, AppState, ResponseMeta};

const DEFAULT_LOCALE: &str = "us";

#[derive(Debug, Deserialize)]
pub(super) struct ModelsQuery {
    pub locale: Option<String>,
}

pub(super) async fn list_models(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ModelsQuery>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Vec<CatalogModel>>>, ApiError> {
    let accept_language = headers
        .get(ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok());
    let locale = resolve_locale(query.locale.as_deref(), accept_language);

    let data = state
        .storefront
        .get_models(&locale)
        .await
        .map_err(|e| map_scraper_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Picks the storefront locale: explicit query parameter, else the primary
/// tag of `Accept-Language` lower-cased, else `us`.
pub(super) fn resolve_locale(query: Option<&str>, accept_language: Option<&str>) -> String {
    if let Some(locale) = query.map(str::trim).filter(|l| !l.is_empty()) {
        return locale.to_owned();
    }
    accept_language
        .and_then(|header| header.split(',').next())
        .and_then(|tag| tag.split(';').next())
        .map(str::trim)
        .filter(|tag| !tag.is_empty() && *tag != "*")
        .map_or_else(|| DEFAULT_LOCALE.to_owned(), str::to_ascii_lowercase)
}
