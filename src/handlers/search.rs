use crate::{
    errors::ApiError,
    handlers::common::success_response,
    services::search::SearchResponse,
    AppState,
};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Search query; matched against names and descriptions.
    #[serde(default)]
    pub q: String,
}

/// Unified catalog search across collections, products, categories and
/// brands. Blank or one-character queries are 200s with an empty result
/// set and an explanatory message, never errors.
#[utoipa::path(
    get,
    path = "/api/v1/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Ranked, grouped search results", body = SearchResponse)
    )
)]
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state.services.search.search(&params.q).await?;
    Ok(success_response(response))
}
