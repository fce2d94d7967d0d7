// Copyright (c) The Starcoin Core Contributors
// SPDX-License-Identifier: Apache-2.0

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("explorer request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("explorer request failed with status: {status} - Error body: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("explorer response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One explorer API call, as `module`/`action` plus extra query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerQuery {
    pub module: String,
    pub action: String,
    pub params: Vec<(String, String)>,
}

impl ExplorerQuery {
    pub fn new(module: &str, action: &str) -> Self {
        Self {
            module: module.to_string(),
            action: action.to_string(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.push((key.to_string(), value.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Full parameter list in the order the explorer expects it.
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs = vec![("module", self.module.as_str()), ("action", self.action.as_str())];
        pairs.extend(self.params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        pairs
    }
}

#[async_trait::async_trait]
pub trait ExplorerSource: Send + Sync {
    async fn get(&self, query: &ExplorerQuery) -> Result<Value, ExplorerError>;
}
