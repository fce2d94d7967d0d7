// Copyright (c) The Starcoin Core Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use serde::Deserialize;
use std::{env, path::PathBuf};

pub const DEFAULT_EXPLORER_API_URL: &str = "https://api.etherscan.io/api";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub explorer_api_url: String,
    pub explorer_api_key: String,
    pub listen_addr: String,
    pub address_book_path: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let config = Config {
            explorer_api_url: env::var("EXPLORER_API_URL")
                .unwrap_or_else(|_| DEFAULT_EXPLORER_API_URL.to_string()),
            // ETHERSCAN_APT_KEY is the name older deployments shipped with
            explorer_api_key: env::var("ETHERSCAN_API_KEY")
                .or_else(|_| env::var("ETHERSCAN_APT_KEY"))
                .unwrap_or_default(),
            listen_addr: env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            address_book_path: env::var("ADDRESS_BOOK_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("addresses.json")),
        };

        Ok(config)
    }

    pub fn localhost() -> Self {
        Self {
            explorer_api_url: "http://127.0.0.1:8545/api".to_string(),
            explorer_api_key: "".to_string(),
            listen_addr: "127.0.0.1:8080".to_string(),
            address_book_path: PathBuf::from("addresses.json"),
        }
    }
}
