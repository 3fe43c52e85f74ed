use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use super::error::ApiError;
use super::AppState;
use crate::catalog::{self, CatalogEntry};
use crate::record::MedicineRecord;

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

pub async fn medicine(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<MedicineRecord>, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::InvalidRequest("Medicine name is required".into()));
    }
    let record = state.assembler.assemble(name).await?;
    Ok(Json(record))
}

pub async fn popular_medicines() -> Json<Value> {
    let categories: BTreeMap<&str, &[&str]> = catalog::categories().collect();
    Json(json!({
        "categories": categories,
        "total": catalog::total(),
    }))
}

pub async fn random_medicine() -> Result<Json<CatalogEntry>, ApiError> {
    catalog::random_entry()
        .map(Json)
        .ok_or_else(|| ApiError::Internal("catalog is empty".into()))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub category: Option<String>,
}

pub async fn search_medicines(Query(params): Query<SearchParams>) -> Result<Json<Value>, ApiError> {
    let query = params.q.as_deref().map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return Err(ApiError::InvalidRequest("Query parameter `q` is required".into()));
    }
    let results = catalog::search(query, params.category.as_deref());
    Ok(Json(json!({
        "query": query,
        "count": results.len(),
        "results": results,
    })))
}
