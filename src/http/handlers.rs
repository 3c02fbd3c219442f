//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the session
//! manager for business logic.

use axum::{
    extract::{Path, State},
    Json,
};

use super::dto::{
    CreateSearchResponse, FilterUpdateRequest, HealthResponse, LastSearchResponse,
    PageUpdateRequest, SearchResultsView, ShareLinkResponse, SortUpdateRequest,
};
use super::error::AppError;
use super::state::AppState;
use crate::models::SearchParams;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn search_not_found(search_id: &str) -> AppError {
    AppError::NotFound(format!("Search {} not found", search_id))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running.
pub async fn health_check(State(_state): State<AppState>) -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse::default()))
}

// =============================================================================
// Search Sessions
// =============================================================================

/// POST /v1/searches
///
/// Fetch offers for the given parameters (at most once per distinct key) and
/// open an interactive session over them.
pub async fn create_search(
    State(state): State<AppState>,
    Json(params): Json<SearchParams>,
) -> Result<(axum::http::StatusCode, Json<CreateSearchResponse>), AppError> {
    let (search_id, results) = state.manager.create_session(params).await?;

    let carriers = state
        .manager
        .with_session(&search_id, |session| session.carriers().clone())
        .unwrap_or_default();

    Ok((
        axum::http::StatusCode::CREATED,
        Json(CreateSearchResponse {
            search_id,
            carriers,
            results,
        }),
    ))
}

/// GET /v1/searches/{search_id}/results
///
/// Current page of filtered, sorted results plus chart data.
pub async fn get_results(
    State(state): State<AppState>,
    Path(search_id): Path<String>,
) -> HandlerResult<SearchResultsView> {
    let view = state
        .manager
        .with_session(&search_id, |session| session.view())
        .ok_or_else(|| search_not_found(&search_id))?;

    Ok(Json(view))
}

/// PUT /v1/searches/{search_id}/filters
///
/// Replace the filter state. Invalid bounds are rejected with 400.
pub async fn update_filters(
    State(state): State<AppState>,
    Path(search_id): Path<String>,
    Json(request): Json<FilterUpdateRequest>,
) -> HandlerResult<SearchResultsView> {
    let result = state
        .manager
        .with_session(&search_id, |session| {
            let filters = request.into_filter_state(session.filter_defaults())?;
            session.set_filters(filters);
            Ok::<_, crate::services::filter::FilterError>(session.view())
        })
        .ok_or_else(|| search_not_found(&search_id))?;

    let view = result.map_err(AppError::from)?;
    Ok(Json(view))
}

/// PUT /v1/searches/{search_id}/sort
///
/// Change the sort field and direction.
pub async fn update_sort(
    State(state): State<AppState>,
    Path(search_id): Path<String>,
    Json(request): Json<SortUpdateRequest>,
) -> HandlerResult<SearchResultsView> {
    let view = state
        .manager
        .with_session(&search_id, |session| {
            session.set_sort(request.field, request.direction);
            session.view()
        })
        .ok_or_else(|| search_not_found(&search_id))?;

    Ok(Json(view))
}

/// PUT /v1/searches/{search_id}/page
///
/// Navigate to a page. Out-of-range indices clamp to the last page.
pub async fn update_page(
    State(state): State<AppState>,
    Path(search_id): Path<String>,
    Json(request): Json<PageUpdateRequest>,
) -> HandlerResult<SearchResultsView> {
    let view = state
        .manager
        .with_session(&search_id, |session| {
            session.set_page(request.page);
            session.view()
        })
        .ok_or_else(|| search_not_found(&search_id))?;

    Ok(Json(view))
}

/// GET /v1/searches/{search_id}/share
///
/// Query-string representation of the search parameters for shareable links.
/// Filter and sort state are session-local and never serialized.
pub async fn share_link(
    State(state): State<AppState>,
    Path(search_id): Path<String>,
) -> HandlerResult<ShareLinkResponse> {
    let query = state
        .manager
        .with_session(&search_id, |session| session.params().to_query_string())
        .ok_or_else(|| search_not_found(&search_id))?
        .map_err(|e| AppError::Internal(format!("Failed to serialize search params: {}", e)))?;

    Ok(Json(ShareLinkResponse { query }))
}

/// DELETE /v1/searches/{search_id}
///
/// Drop a session.
pub async fn delete_search(
    State(state): State<AppState>,
    Path(search_id): Path<String>,
) -> Result<axum::http::StatusCode, AppError> {
    state.manager.remove_session(&search_id);
    Ok(axum::http::StatusCode::NO_CONTENT)
}

/// GET /v1/searches/last
///
/// The most recently created search, restored from the persisted store.
pub async fn last_search(State(state): State<AppState>) -> HandlerResult<LastSearchResponse> {
    Ok(Json(LastSearchResponse {
        params: state.manager.last_search(),
    }))
}
