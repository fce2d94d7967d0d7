// Copyright (c) The Starcoin Core Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::{
    address_book::AddressCategory,
    server::{
        error::{ApiError, ApiResult},
        AppState,
    },
};
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
pub struct FavoritesQuery {
    #[serde(rename = "type")]
    pub category: Option<String>,
}

/// The address is stored as sent, a missing one is stored empty.
#[derive(Debug, Deserialize)]
pub struct AddFavoriteBody {
    #[serde(default)]
    pub address: String,
}

fn category(query: &FavoritesQuery) -> ApiResult<AddressCategory> {
    query
        .category
        .as_deref()
        .unwrap_or_default()
        .parse::<AddressCategory>()
        .map_err(|_| ApiError::bad_request("Invalid address type"))
}

/// `GET /favorites?type={wallet|token}`
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<FavoritesQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<String>>> {
    let Query(query) = query?;
    let category = category(&query)?;
    let addresses = state.address_book.get(category.as_str());
    debug!("Returning {} {} favorites", addresses.len(), category);
    Ok(Json(addresses))
}

/// `POST /favorites?type={wallet|token}` with body `{"address": "0x..."}`
pub async fn add(
    State(state): State<AppState>,
    query: Result<Query<FavoritesQuery>, QueryRejection>,
    body: Bytes,
) -> ApiResult<StatusCode> {
    let Query(query) = query?;
    let category = category(&query)?;
    // decoded regardless of Content-Type
    let body: AddFavoriteBody = serde_json::from_slice(&body)
        .map_err(|_| ApiError::bad_request("Invalid request body"))?;

    info!("Adding {} favorite {}", category, body.address);
    let address_book = state.address_book.clone();
    tokio::task::spawn_blocking(move || address_book.add_and_save(category.as_str(), &body.address))
        .await
        .map_err(|e| ApiError::InternalServerError(format!("Failed to save favorite address: {}", e)))?
        .map_err(|e| ApiError::with_context("Failed to save favorite address", e))?;

    Ok(StatusCode::CREATED)
}
