// Copyright (c) The Starcoin Core Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::{
    error::{Error, Result},
    types::{Transaction, TransactionDetails, TransactionStatus, NATIVE_TOKEN},
};
use chrono::{TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Message the explorer pairs with `status == "0"` when an address has no history.
const NO_TRANSACTIONS_FOUND: &str = "No transactions found";

/// Which listing endpoint a batch of records came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingKind {
    /// `account/txlist`, native transfers without token metadata.
    Native,
    /// `account/tokentx`, records carry a `tokenSymbol`.
    TokenTransfer,
}

/// Envelope shared by the `account` and `transaction` modules.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    status: Value,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: Value,
}

/// Envelope of the `proxy` module, which mirrors JSON-RPC.
#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTransaction {
    #[serde(default)]
    block_number: String,
    #[serde(default)]
    time_stamp: String,
    #[serde(default)]
    hash: String,
    #[serde(default)]
    from: String,
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    value: String,
    #[serde(default)]
    gas_price: String,
    #[serde(default)]
    is_error: Option<String>,
    #[serde(default, rename = "txreceipt_status")]
    receipt_status: Option<String>,
    #[serde(default)]
    token_symbol: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDetails {
    from: String,
    #[serde(default)]
    to: Option<String>,
    value: String,
    gas: String,
    gas_price: String,
    input: String,
}

/// Why a single listing record was dropped.
#[derive(Debug, Error)]
enum RecordError {
    #[error("record has an unexpected shape: {0}")]
    Shape(#[from] serde_json::Error),
    #[error("record has no hash")]
    MissingHash,
    #[error("field {field} is not an integer: {value:?}")]
    NotAnInteger { field: &'static str, value: String },
    #[error("timestamp {0} is out of range")]
    TimestampOutOfRange(i64),
}

fn decode_envelope(raw: Value) -> Result<Envelope> {
    serde_json::from_value(raw)
        .map_err(|e| Error::Upstream(format!("malformed explorer envelope: {}", e)))
}

/// Error text carried by a failed envelope: `result` when the explorer put
/// a message there, `message` otherwise.
fn failure_reason(envelope: &Envelope) -> String {
    match envelope.result.as_str() {
        Some(text) if !text.is_empty() && !envelope.message.is_empty() => {
            format!("{}: {}", envelope.message, text)
        }
        Some(text) if !text.is_empty() => text.to_string(),
        _ if !envelope.message.is_empty() => envelope.message.clone(),
        _ => "unknown explorer error".to_string(),
    }
}

fn parse_integer<T: std::str::FromStr>(
    field: &'static str,
    value: &str,
) -> std::result::Result<T, RecordError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| RecordError::NotAnInteger {
            field,
            value: value.to_string(),
        })
}

/// Success flag of a listing record, `"1"` for success and `"0"` for failure.
fn receipt_flag(raw: &RawTransaction) -> String {
    match (&raw.receipt_status, &raw.is_error) {
        (Some(flag), _) if !flag.is_empty() => flag.clone(),
        (_, Some(is_error)) if is_error == "0" => "1".to_string(),
        (_, Some(is_error)) if is_error == "1" => "0".to_string(),
        _ => String::new(),
    }
}

fn map_record(record: Value, kind: ListingKind) -> std::result::Result<Transaction, RecordError> {
    let raw: RawTransaction = serde_json::from_value(record)?;
    if raw.hash.is_empty() {
        return Err(RecordError::MissingHash);
    }

    let block_height: u64 = parse_integer("blockNumber", &raw.block_number)?;
    let seconds: i64 = parse_integer("timeStamp", &raw.time_stamp)?;
    let timestamp = Utc
        .timestamp_opt(seconds, 0)
        .single()
        .ok_or(RecordError::TimestampOutOfRange(seconds))?;

    let status = receipt_flag(&raw);
    let token_type = match kind {
        ListingKind::Native => NATIVE_TOKEN.to_string(),
        ListingKind::TokenTransfer => raw.token_symbol.unwrap_or_default(),
    };

    let mut tx = Transaction::new(raw.hash, timestamp);
    tx.from_address = raw.from;
    tx.to_address = raw.to.unwrap_or_default();
    tx.value = raw.value;
    tx.gas_price = raw.gas_price;
    tx.token_type = token_type;
    tx.block_height = block_height;
    tx.status = status;
    Ok(tx)
}

/// Maps a listing response into domain transactions.
///
/// Envelope failures fail the whole call. Individual records that cannot be
/// mapped are logged and skipped so one bad record does not hide the others.
pub fn to_listing(raw: Value, kind: ListingKind) -> Result<Vec<Transaction>> {
    let envelope = decode_envelope(raw)?;

    if envelope.message != "OK" {
        if envelope.status.as_str() == Some("0") && envelope.message == NO_TRANSACTIONS_FOUND {
            debug!("Explorer reported no transactions");
            return Ok(Vec::new());
        }
        return Err(Error::Upstream(failure_reason(&envelope)));
    }

    let records = match envelope.result {
        Value::Array(records) => records,
        other => {
            return Err(Error::Upstream(format!(
                "expected a list of transactions, got {}",
                other
            )))
        }
    };

    let total = records.len();
    let transactions: Vec<Transaction> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match map_record(record, kind) {
            Ok(tx) => Some(tx),
            Err(e) => {
                warn!("Skipping explorer record {}: {}", index, e);
                None
            }
        })
        .collect();

    debug!("Mapped {} of {} explorer records", transactions.len(), total);
    Ok(transactions)
}

pub fn to_transactions(raw: Value) -> Result<Vec<Transaction>> {
    to_listing(raw, ListingKind::Native)
}

pub fn to_token_transfers(raw: Value) -> Result<Vec<Transaction>> {
    to_listing(raw, ListingKind::TokenTransfer)
}

pub fn to_details(raw: Value) -> Result<TransactionDetails> {
    let envelope: RpcEnvelope = serde_json::from_value(raw)
        .map_err(|e| Error::Upstream(format!("malformed explorer envelope: {}", e)))?;

    if let Some(error) = envelope.error {
        return Err(Error::Upstream(format!(
            "explorer rpc error {}: {}",
            error.code, error.message
        )));
    }

    match envelope.result {
        Value::Null => Err(Error::NotFound("transaction not found".to_string())),
        Value::String(text) => Err(Error::Upstream(text)),
        result @ Value::Object(_) => {
            let raw: RawDetails = serde_json::from_value(result)
                .map_err(|e| Error::Upstream(format!("malformed transaction details: {}", e)))?;
            Ok(TransactionDetails {
                from: raw.from,
                to: raw.to.unwrap_or_default(),
                value: raw.value,
                gas: raw.gas,
                gas_price: raw.gas_price,
                input_data: raw.input,
            })
        }
        other => Err(Error::Upstream(format!(
            "unexpected transaction details payload: {}",
            other
        ))),
    }
}

pub fn to_status(raw: Value, tx_id: &str) -> Result<TransactionStatus> {
    let envelope = decode_envelope(raw)?;

    let status = envelope
        .status
        .as_str()
        .ok_or_else(|| Error::Upstream("could not parse transaction status".to_string()))?;

    if status == "0" {
        return Err(Error::Upstream(failure_reason(&envelope)));
    }

    let flag = envelope
        .result
        .get("status")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Upstream("could not parse transaction status".to_string()))?;

    Ok(TransactionStatus::from_receipt_flag(tx_id, flag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(hash: &str, block: &str, ts: &str) -> Value {
        json!({
            "blockNumber": block,
            "timeStamp": ts,
            "hash": hash,
            "from": "0xfrom",
            "to": "0xto",
            "value": "1000000000000000000",
            "gasPrice": "21000000000",
            "isError": "0",
            "txreceipt_status": "1",
        })
    }

    #[test]
    fn test_to_transactions_maps_records() {
        let raw = json!({
            "status": "1",
            "message": "OK",
            "result": [record("0x1", "100", "1600000000"), record("0x2", "99", "1599999000")],
        });

        let txs = to_transactions(raw).unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].id(), "0x1");
        assert_eq!(txs[0].block_height, 100);
        assert_eq!(txs[0].timestamp.timestamp(), 1_600_000_000);
        assert_eq!(txs[0].token_type, "ETH");
        assert_eq!(txs[0].status, "1");
        assert_eq!(txs[0].value, "1000000000000000000");
        assert_eq!(txs[1].id(), "0x2");
    }

    #[test]
    fn test_bad_records_are_skipped_individually() {
        let raw = json!({
            "status": "1",
            "message": "OK",
            "result": [
                record("0x1", "100", "1600000000"),
                record("0x2", "not-a-number", "1600000000"),
                record("0x3", "100", ""),
                record("", "100", "1600000000"),
                json!({"hash": 7}),
                json!("garbage"),
                record("0x4", "101", "1600000100"),
            ],
        });

        let txs = to_transactions(raw).unwrap();
        let ids: Vec<&str> = txs.iter().map(|tx| tx.id()).collect();
        assert_eq!(ids, vec!["0x1", "0x4"]);
    }

    #[test]
    fn test_contract_creation_keeps_empty_recipient() {
        let mut creation = record("0x1", "100", "1600000000");
        creation["to"] = json!("");
        let mut null_to = record("0x2", "100", "1600000000");
        null_to["to"] = Value::Null;
        let raw = json!({"status": "1", "message": "OK", "result": [creation, null_to]});

        let txs = to_transactions(raw).unwrap();
        assert_eq!(txs.len(), 2);
        assert!(txs.iter().all(|tx| tx.is_contract_creation()));
    }

    #[test]
    fn test_status_falls_back_to_is_error() {
        let mut failed = record("0x1", "1", "1");
        failed["txreceipt_status"] = json!("");
        failed["isError"] = json!("1");
        let mut legacy = record("0x2", "1", "1");
        legacy.as_object_mut().unwrap().remove("txreceipt_status");
        let raw = json!({"status": "1", "message": "OK", "result": [failed, legacy]});

        let txs = to_transactions(raw).unwrap();
        assert_eq!(txs[0].status, "0");
        assert_eq!(txs[1].status, "1");
    }

    #[test]
    fn test_non_ok_listing_is_upstream_error() {
        let raw = json!({"status": "0", "message": "NOTOK", "result": "Invalid API Key"});
        match to_transactions(raw) {
            Err(Error::Upstream(message)) => assert_eq!(message, "NOTOK: Invalid API Key"),
            other => panic!("Expected upstream error, got {:?}", other),
        }
    }

    #[test]
    fn test_no_transactions_found_is_empty() {
        let raw = json!({"status": "0", "message": "No transactions found", "result": []});
        assert!(to_transactions(raw).unwrap().is_empty());
    }

    #[test]
    fn test_listing_rejects_non_array_result() {
        let raw = json!({"status": "1", "message": "OK", "result": {"hash": "0x1"}});
        assert!(matches!(to_transactions(raw), Err(Error::Upstream(_))));

        let raw = json!(["not", "an", "envelope"]);
        assert!(matches!(to_transactions(raw), Err(Error::Upstream(_))));
    }

    #[test]
    fn test_token_transfers_use_token_symbol() {
        let mut usdt = record("0x1", "100", "1600000000");
        usdt["tokenSymbol"] = json!("USDT");
        let raw = json!({"status": "1", "message": "OK", "result": [usdt]});

        let txs = to_token_transfers(raw).unwrap();
        assert_eq!(txs[0].token_type, "USDT");
    }

    #[test]
    fn test_to_details() {
        let raw = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {
                "from": "0xfrom",
                "to": "0xto",
                "value": "0x0",
                "gas": "0x5208",
                "gasPrice": "0x4a817c800",
                "input": "0x",
                "hash": "0xabc",
            },
        });

        let details = to_details(raw).unwrap();
        assert_eq!(details.from, "0xfrom");
        assert_eq!(details.to, "0xto");
        assert_eq!(details.gas, "0x5208");
        assert_eq!(details.gas_price, "0x4a817c800");
        assert_eq!(details.input_data, "0x");
    }

    #[test]
    fn test_to_details_failures() {
        let raw = json!({"jsonrpc": "2.0", "id": 1, "result": null});
        assert!(matches!(to_details(raw), Err(Error::NotFound(_))));

        let raw = json!({"status": "0", "message": "NOTOK", "result": "Invalid API Key"});
        match to_details(raw) {
            Err(Error::Upstream(message)) => assert_eq!(message, "Invalid API Key"),
            other => panic!("Expected upstream error, got {:?}", other),
        }

        let raw = json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32602, "message": "invalid argument"}});
        assert!(matches!(to_details(raw), Err(Error::Upstream(_))));

        let raw = json!({"jsonrpc": "2.0", "id": 1, "result": {"from": 5}});
        assert!(matches!(to_details(raw), Err(Error::Upstream(_))));
    }

    #[test]
    fn test_to_status() {
        let raw = json!({"status": "1", "message": "OK", "result": {"status": "1"}});
        let status = to_status(raw, "0xabc").unwrap();
        assert_eq!(status.tx_id, "0xabc");
        assert_eq!(status.status, "success");

        let raw = json!({"status": "1", "message": "OK", "result": {"status": ""}});
        assert_eq!(to_status(raw, "0xabc").unwrap().status, "pending");
    }

    #[test]
    fn test_to_status_failures() {
        let raw = json!({"status": "0", "message": "NOTOK", "result": []});
        match to_status(raw, "0xabc") {
            Err(Error::Upstream(message)) => assert_eq!(message, "NOTOK"),
            other => panic!("Expected upstream error, got {:?}", other),
        }

        let raw = json!({"status": "0", "message": "NOTOK", "result": "Error! Invalid transaction hash"});
        match to_status(raw, "0xabc") {
            Err(Error::Upstream(message)) => {
                assert!(message.contains("Error! Invalid transaction hash"))
            }
            other => panic!("Expected upstream error, got {:?}", other),
        }

        let raw = json!({"status": 1, "result": {"status": "1"}});
        assert!(matches!(to_status(raw, "0xabc"), Err(Error::Upstream(_))));

        let raw = json!({"status": "1", "message": "OK", "result": {}});
        assert!(matches!(to_status(raw, "0xabc"), Err(Error::Upstream(_))));
    }
}
