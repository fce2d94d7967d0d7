// Copyright (c) The Starcoin Core Contributors
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use serde::Serialize;

pub const NATIVE_TOKEN: &str = "ETH";

/// A ledger transaction as returned to callers.
///
/// `id` can only be set through [`Transaction::new`]. There is no `Default`:
/// every instance carries a timestamp taken from upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    #[serde(rename = "hash")]
    id: String,
    #[serde(rename = "from")]
    pub from_address: String,
    #[serde(rename = "to")]
    pub to_address: String,
    pub value: String,
    #[serde(rename = "gasPrice")]
    pub gas_price: String,
    #[serde(rename = "tokenType")]
    pub token_type: String,
    #[serde(rename = "blockHeight")]
    pub block_height: u64,
    pub status: String,
    #[serde(rename = "timeStamp")]
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    pub fn new(id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            from_address: String::new(),
            to_address: String::new(),
            value: String::new(),
            gas_price: String::new(),
            token_type: NATIVE_TOKEN.to_string(),
            block_height: 0,
            status: String::new(),
            timestamp,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Contract creations carry no recipient.
    pub fn is_contract_creation(&self) -> bool {
        self.to_address.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionDetails {
    pub from: String,
    pub to: String,
    pub value: String,
    pub gas: String,
    #[serde(rename = "gasPrice")]
    pub gas_price: String,
    #[serde(rename = "inputData")]
    pub input_data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionStatus {
    #[serde(rename = "txid")]
    pub tx_id: String,
    pub status: String,
}

impl TransactionStatus {
    /// Turns the explorer's receipt flag into a readable state.
    pub fn from_receipt_flag(tx_id: &str, flag: &str) -> Self {
        let status = match flag {
            "1" => "success",
            "0" => "failed",
            "" => "pending",
            other => other,
        };
        Self {
            tx_id: tx_id.to_string(),
            status: status.to_string(),
        }
    }
}
