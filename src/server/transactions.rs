// Copyright (c) The Starcoin Core Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::{
    server::{
        error::{ApiError, ApiResult},
        AppState,
    },
    transaction_filter::{DateRange, TransactionFilter},
    types::{Transaction, TransactionDetails, TransactionStatus},
};
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use chrono::{DateTime, Timelike, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    pub address: Option<String>,
    #[serde(rename = "startIndex")]
    pub start_index: Option<String>,
    pub count: Option<String>,
}

impl ListingQuery {
    fn address(&self) -> ApiResult<&str> {
        self.address
            .as_deref()
            .filter(|address| !address.is_empty())
            .ok_or_else(|| ApiError::bad_request("Missing 'address' query parameter"))
    }

    /// Values that do not parse as integers count as absent.
    fn integer(value: &Option<String>) -> Option<i64> {
        value.as_deref().and_then(|v| v.trim().parse().ok())
    }
}

#[derive(Debug, Deserialize)]
pub struct TxQuery {
    pub txid: Option<String>,
}

impl TxQuery {
    fn txid(&self, missing: &str) -> ApiResult<&str> {
        self.txid
            .as_deref()
            .filter(|txid| !txid.is_empty())
            .ok_or_else(|| ApiError::bad_request(missing))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FilteredTransactionsRequest {
    pub wallet_address: String,
    pub start_date: String,
    pub end_date: String,
    pub token_type: String,
}

fn parse_date(value: &str, error: &str) -> ApiResult<Option<DateTime<Utc>>> {
    if value.is_empty() {
        return Ok(None);
    }
    // bounds are compared in whole seconds
    DateTime::parse_from_rfc3339(value)
        .map(|date| {
            let date = date.with_timezone(&Utc);
            Some(date.with_nanosecond(0).unwrap_or(date))
        })
        .map_err(|_| ApiError::bad_request(error))
}

impl FilteredTransactionsRequest {
    pub fn filter(&self) -> ApiResult<TransactionFilter> {
        let start = parse_date(&self.start_date, "Invalid start date format")?;
        let end = parse_date(&self.end_date, "Invalid end date format")?;

        let date_range = DateRange::new(start, end);
        if date_range.is_reversed() {
            return Err(ApiError::bad_request(
                "start_date must not be after end_date",
            ));
        }

        let date_range = (!date_range.is_unbounded()).then_some(date_range);
        let token_type = (!self.token_type.is_empty()).then(|| self.token_type.clone());
        Ok(TransactionFilter::new(date_range, token_type))
    }
}

/// `GET /transactions?address=..&startIndex=..&count=..`
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListingQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Transaction>>> {
    let Query(query) = query?;
    let address = query.address()?;
    let transactions = state
        .gateway
        .list_transactions(
            address,
            ListingQuery::integer(&query.start_index),
            ListingQuery::integer(&query.count),
        )
        .await
        .map_err(|e| ApiError::with_context("Error fetching transactions", e))?;
    Ok(Json(transactions))
}

/// `GET /token-transfers?address=..&startIndex=..&count=..`
pub async fn list_token_transfers(
    State(state): State<AppState>,
    query: Result<Query<ListingQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Transaction>>> {
    let Query(query) = query?;
    let address = query.address()?;
    let transactions = state
        .gateway
        .list_token_transfers(
            address,
            ListingQuery::integer(&query.start_index),
            ListingQuery::integer(&query.count),
        )
        .await
        .map_err(|e| ApiError::with_context("Error fetching token transfers", e))?;
    Ok(Json(transactions))
}

/// `GET /transaction-details?txid=..`
pub async fn details(
    State(state): State<AppState>,
    query: Result<Query<TxQuery>, QueryRejection>,
) -> ApiResult<Json<TransactionDetails>> {
    let Query(query) = query?;
    let txid = query.txid("missing transaction ID")?;
    let details = state
        .gateway
        .fetch_details(txid)
        .await
        .map_err(|e| ApiError::with_context("could not fetch transaction details", e))?;
    Ok(Json(details))
}

/// `GET /transaction-status?txid=..`
pub async fn status(
    State(state): State<AppState>,
    query: Result<Query<TxQuery>, QueryRejection>,
) -> ApiResult<Json<TransactionStatus>> {
    let Query(query) = query?;
    let txid = query.txid("missing txid parameter")?;
    let status = state
        .gateway
        .fetch_status(txid)
        .await
        .map_err(|e| ApiError::with_context("could not fetch transaction status", e))?;
    Ok(Json(status))
}

/// `POST /filtered-transactions`
///
/// Example request
/// ```json
/// {
///     "wallet_address": "0xde0b295669a9fd93d5f28d9ec85e40f4cb697bae",
///     "start_date": "2023-01-01T00:00:00Z",
///     "end_date": "2023-12-31T23:59:59Z",
///     "token_type": "ETH"
/// }
/// ```
pub async fn filtered(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<Vec<Transaction>>> {
    let request: FilteredTransactionsRequest = serde_json::from_slice(&body)
        .map_err(|_| ApiError::bad_request("Failed to parse request"))?;
    if request.wallet_address.is_empty() {
        return Err(ApiError::bad_request(
            "Missing 'wallet_address' in request body",
        ));
    }
    let filter = request.filter()?;

    let transactions = state
        .gateway
        .fetch_filtered(&request.wallet_address, &filter)
        .await
        .map_err(|e| ApiError::with_context("Failed to fetch filtered transactions", e))?;
    Ok(Json(transactions))
}
