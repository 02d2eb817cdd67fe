//! Endpoint handlers
//!
//! Each handler validates its query string, calls the matching
//! [`PubMedClient`](crate::PubMedClient) operation and returns the result as JSON.
//! Dropping a handler future (client disconnect) drops any in-flight upstream call.

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use super::AppState;
use super::error::ApiError;
use crate::error::PubMedError;
use crate::pubmed::models::{
    AbstractResult, DEFAULT_DATETYPE, DEFAULT_SEARCH_AND_FETCH_RETMAX, DEFAULT_SEARCH_RETMAX,
    DEFAULT_SORT, MergedResult, SearchParams, SearchResult, SummaryResult,
};

/// Largest page NCBI ESearch will return
pub const MAX_RETMAX: u32 = 10_000;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub health: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct EchoRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct EchoResponse {
    pub echo: String,
}

/// Query string for the search endpoints
#[derive(Debug, Default, Deserialize)]
pub struct SearchQueryParams {
    #[serde(default)]
    pub query: String,
    pub retmax: Option<u32>,
    pub retstart: Option<u32>,
    pub sort: Option<String>,
    pub datetype: Option<String>,
    pub mindate: Option<String>,
    pub maxdate: Option<String>,
}

impl SearchQueryParams {
    /// Validate and fill in defaults
    pub fn into_search_params(self, default_retmax: u32) -> Result<SearchParams, PubMedError> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err(PubMedError::InvalidQuery(
                "query must not be empty".to_string(),
            ));
        }

        let retmax = self.retmax.unwrap_or(default_retmax);
        if retmax == 0 || retmax > MAX_RETMAX {
            return Err(PubMedError::InvalidQuery(format!(
                "retmax must be between 1 and {MAX_RETMAX}"
            )));
        }

        Ok(SearchParams {
            query: query.to_string(),
            retmax,
            retstart: self.retstart.unwrap_or(0),
            sort: non_blank(self.sort).unwrap_or_else(|| DEFAULT_SORT.to_string()),
            datetype: non_blank(self.datetype).unwrap_or_else(|| DEFAULT_DATETYPE.to_string()),
            mindate: non_blank(self.mindate),
            maxdate: non_blank(self.maxdate),
        })
    }
}

/// Query string for the id-batch endpoints: `ids=1,2,3`
#[derive(Debug, Default, Deserialize)]
pub struct IdsQueryParams {
    #[serde(default)]
    pub ids: String,
}

impl IdsQueryParams {
    pub fn split_ids(&self) -> Result<Vec<&str>, PubMedError> {
        let ids: Vec<&str> = self
            .ids
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .collect();

        if ids.is_empty() {
            return Err(PubMedError::InvalidQuery(
                "ids must contain at least one id".to_string(),
            ));
        }

        Ok(ids)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse { status: "ok" })
}

pub async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse { health: "ok" })
}

pub async fn echo(Json(body): Json<EchoRequest>) -> Json<EchoResponse> {
    Json(EchoResponse { echo: body.text })
}

/// GET /pubmed/search
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQueryParams>,
) -> Result<Json<SearchResult>, ApiError> {
    let params = params.into_search_params(DEFAULT_SEARCH_RETMAX)?;
    let result = state.client.search_articles(&params).await?;
    Ok(Json(result))
}

/// GET /pubmed/summary
pub async fn summary(
    State(state): State<AppState>,
    Query(params): Query<IdsQueryParams>,
) -> Result<Json<SummaryResult>, ApiError> {
    let ids = params.split_ids()?;
    let result = state.client.fetch_summaries(&ids).await?;
    Ok(Json(result))
}

/// GET /pubmed/abstract
pub async fn abstracts(
    State(state): State<AppState>,
    Query(params): Query<IdsQueryParams>,
) -> Result<Json<AbstractResult>, ApiError> {
    let ids = params.split_ids()?;
    let result = state.client.fetch_abstracts(&ids).await?;
    Ok(Json(result))
}

/// GET /pubmed/search_and_fetch
pub async fn search_and_fetch(
    State(state): State<AppState>,
    Query(params): Query<SearchQueryParams>,
) -> Result<Json<MergedResult>, ApiError> {
    let params = params.into_search_params(DEFAULT_SEARCH_AND_FETCH_RETMAX)?;
    let result = state.client.search_and_fetch(&params).await?;
    Ok(Json(result))
}
