//! Placement statistics endpoints.
//!
//! - `GET /api/placement-stats` -- filtered, sorted, paginated listing
//! - `POST /api/placement-stats` -- create
//! - `GET /api/placement-stats/{id}` -- fetch one
//! - `PUT /api/placement-stats/{id}` -- full replace
//! - `DELETE /api/placement-stats/{id}` -- delete

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use placement_core::placement::{COLLECTION, SEARCH_FIELDS};
use placement_core::{
    Document, PaginationMeta, PlacementStats, PlacementStatsInput, QueryParameters, RequestQuery,
    VERSION_FIELD,
};
use serde::Serialize;
use tracing::info;

use super::AppState;
use crate::network::error::ApiError;
use crate::network::instrument::instrumented;

/// Parameters consumed by the list helpers rather than the generic filter.
const LIST_HELPER_KEYS: [&str; 5] = [
    "department",
    "isPublished",
    "minPercentage",
    "maxPercentage",
    "populate",
];

/// Body of a list response.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub data: Vec<Document>,
    pub pagination: PaginationMeta,
}

fn populate_relations(params: &QueryParameters) -> Vec<String> {
    params
        .text("populate")
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Builds the listing query from raw query-string pairs.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] for malformed operators, dates, or
/// percentage bounds.
pub fn list_query(pairs: Vec<(String, String)>) -> Result<RequestQuery, ApiError> {
    let params = QueryParameters::from_pairs(pairs);
    let relations = populate_relations(&params);
    let query = RequestQuery::with_reserved_keys(params, &LIST_HELPER_KEYS)
        .filter()?
        .search(SEARCH_FIELDS)
        .date_range_default()?
        .array_filter("department")
        .range_filter("placementPercentage", "minPercentage", "maxPercentage")?
        .boolean_filter("isPublished")
        .sort()
        .limit_fields()
        .paginate()
        .populate(relations);
    Ok(query)
}

fn not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("placement stats `{id}`"))
}

fn public(mut document: Document) -> Document {
    document.remove(VERSION_FIELD);
    document
}

pub async fn list_stats(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ListResponse>, ApiError> {
    instrumented("list", async move {
        let query = list_query(pairs)?;
        let store = state.store.as_ref();
        let data = query.execute(store, COLLECTION).await?;
        let total = query.count(store, COLLECTION).await?;
        let pagination = query.spec().pagination.unwrap_or_default().meta(total);
        Ok(Json(ListResponse { data, pagination }))
    })
    .await
}

pub async fn create_stats(
    State(state): State<AppState>,
    Json(input): Json<PlacementStatsInput>,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    instrumented("create", async move {
        let stats = input.into_stats(Utc::now())?;
        let stored = state.store.insert(COLLECTION, stats.to_document()?).await?;
        info!(id = ?stored.get("id"), department = %stats.department, "placement stats created");
        Ok((StatusCode::CREATED, Json(public(stored))))
    })
    .await
}

pub async fn get_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    instrumented("get", async move {
        let document = state
            .store
            .get(COLLECTION, &id)
            .await?
            .ok_or_else(|| not_found(&id))?;
        Ok(Json(public(document)))
    })
    .await
}

pub async fn replace_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<PlacementStatsInput>,
) -> Result<Json<Document>, ApiError> {
    instrumented("replace", async move {
        let current = state
            .store
            .get(COLLECTION, &id)
            .await?
            .ok_or_else(|| not_found(&id))?;
        let next = PlacementStats::from_document(current)?.replace_with(input, Utc::now())?;
        let stored = state
            .store
            .replace(COLLECTION, &id, next.to_document()?)
            .await?
            .ok_or_else(|| not_found(&id))?;
        info!(id, "placement stats replaced");
        Ok(Json(public(stored)))
    })
    .await
}

pub async fn delete_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    instrumented("delete", async move {
        if state.store.delete(COLLECTION, &id).await? {
            info!(id, "placement stats deleted");
            Ok(StatusCode::NO_CONTENT)
        } else {
            Err(not_found(&id))
        }
    })
    .await
}
