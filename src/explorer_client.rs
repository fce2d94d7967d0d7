// Copyright (c) The Starcoin Core Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::{
    config::Config,
    explorer_source::{ExplorerError, ExplorerQuery, ExplorerSource},
};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

/// Plain HTTP access to the explorer REST endpoint.
///
/// A single GET per query, no retries and no timeout beyond what
/// `reqwest` applies by default. The body is returned as untyped JSON,
/// interpretation is left to the mapper.
pub struct ExplorerClient {
    client: Client,
    base_url: String,
}

impl ExplorerClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: config.explorer_api_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait::async_trait]
impl ExplorerSource for ExplorerClient {
    async fn get(&self, query: &ExplorerQuery) -> Result<Value, ExplorerError> {
        info!(
            "Querying explorer: module={}, action={}",
            query.module, query.action
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&query.pairs())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            return Err(ExplorerError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let response_text = response.text().await?;
        debug!("Explorer response: {}", response_text);
        let json: Value = serde_json::from_str(&response_text)?;
        Ok(json)
    }
}
