use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    adapters::inbound::http::{SuggestionResponse, TermPageResponse},
    domain::search::{Facets, SearchParams},
    AppState,
};

use super::ApiError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(search))
        .route("/suggest", get(suggest))
        .route("/export", get(export))
        .route("/facets", get(facets))
}

#[derive(Debug, Clone, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    query: String,
    language: Option<String>,
    domain: Option<String>,
    sort_by: Option<String>,
    page: Option<i64>,
    page_size: Option<i64>,
    #[serde(default)]
    fuzzy: bool,
}

impl From<SearchQuery> for SearchParams {
    fn from(query: SearchQuery) -> Self {
        Self {
            query: query.query,
            language: query.language,
            domain: query.domain,
            sort_by: query.sort_by,
            page: query.page,
            page_size: query.page_size,
            fuzzy: query.fuzzy,
        }
    }
}

#[instrument(name = "GET /search", skip(app_state))]
async fn search(
    State(app_state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<TermPageResponse>, ApiError> {
    let Query(query) = query?;
    let page = app_state.search.search(query.into()).await?;

    Ok(Json(page.into()))
}

#[derive(Debug, Clone, Deserialize)]
struct SuggestQuery {
    query: Option<String>,
}

#[instrument(name = "GET /search/suggest", skip(app_state))]
async fn suggest(
    State(app_state): State<AppState>,
    query: Result<Query<SuggestQuery>, QueryRejection>,
) -> Result<Json<Vec<SuggestionResponse>>, ApiError> {
    let Query(query) = query?;
    let suggestions = app_state
        .search
        .suggest(query.query.as_deref().unwrap_or_default())
        .await?;

    Ok(Json(suggestions.into_iter().map(Into::into).collect()))
}

#[instrument(name = "GET /search/export", skip(app_state))]
async fn export(State(app_state): State<AppState>) -> Result<Json<TermPageResponse>, ApiError> {
    let page = app_state.search.export().await?;

    Ok(Json(page.into()))
}

#[instrument(name = "GET /search/facets", skip(app_state))]
async fn facets(State(app_state): State<AppState>) -> Result<Json<Facets>, ApiError> {
    let facets = app_state.search.facets().await?;

    Ok(Json(facets))
}
