// Copyright (c) The Starcoin Core Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::{
    config::Config,
    error::{Error, Result},
    explorer_source::{ExplorerQuery, ExplorerSource},
    transaction_filter::TransactionFilter,
    transaction_mapper,
    types::{Transaction, TransactionDetails, TransactionStatus, NATIVE_TOKEN},
};
use std::sync::Arc;
use tracing::info;

const LATEST_BLOCK: &str = "99999999";

/// Keeps `[start_index, start_index + count)` of an already ordered list.
///
/// A missing or negative `start_index` starts at the head, a missing or
/// non-positive `count` takes everything that remains. The slice is clamped
/// to the list, so the result is empty once `start_index` passes the end.
pub fn paginate(
    transactions: Vec<Transaction>,
    start_index: Option<i64>,
    count: Option<i64>,
) -> Vec<Transaction> {
    let len = transactions.len();
    let start = start_index
        .filter(|index| *index > 0)
        .map_or(0, |index| usize::try_from(index).unwrap_or(usize::MAX))
        .min(len);
    let end = match count.filter(|count| *count > 0) {
        Some(count) => start.saturating_add(usize::try_from(count).unwrap_or(usize::MAX)),
        None => len,
    }
    .min(len);

    let mut transactions = transactions;
    transactions.truncate(end);
    transactions.drain(..start);
    transactions
}

/// Answers transaction questions for the HTTP layer by querying the explorer
/// and mapping its answers. Holds no state between calls.
pub struct TransactionGateway {
    source: Arc<dyn ExplorerSource>,
    api_key: String,
}

impl TransactionGateway {
    pub fn new(source: Arc<dyn ExplorerSource>, config: &Config) -> Self {
        Self {
            source,
            api_key: config.explorer_api_key.clone(),
        }
    }

    fn account_listing(&self, action: &str, address: &str) -> ExplorerQuery {
        ExplorerQuery::new("account", action)
            .param("address", address)
            .param("startblock", "0")
            .param("endblock", LATEST_BLOCK)
            .param("sort", "desc")
            .param("apikey", self.api_key.as_str())
    }

    fn require(name: &str, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(Error::InvalidArgument(format!("empty {}", name)));
        }
        Ok(())
    }

    /// Native transactions of `address`, newest first.
    pub async fn list_transactions(
        &self,
        address: &str,
        start_index: Option<i64>,
        count: Option<i64>,
    ) -> Result<Vec<Transaction>> {
        Self::require("address", address)?;
        info!("Listing transactions for {}", address);

        let raw = self.source.get(&self.account_listing("txlist", address)).await?;
        let transactions = transaction_mapper::to_transactions(raw)?;
        Ok(paginate(transactions, start_index, count))
    }

    /// ERC-20 transfers of `address`, newest first, tagged with the token symbol.
    pub async fn list_token_transfers(
        &self,
        address: &str,
        start_index: Option<i64>,
        count: Option<i64>,
    ) -> Result<Vec<Transaction>> {
        Self::require("address", address)?;
        info!("Listing token transfers for {}", address);

        let raw = self.source.get(&self.account_listing("tokentx", address)).await?;
        let transactions = transaction_mapper::to_token_transfers(raw)?;
        Ok(paginate(transactions, start_index, count))
    }

    pub async fn fetch_details(&self, tx_id: &str) -> Result<TransactionDetails> {
        Self::require("transaction ID", tx_id)?;
        info!("Fetching details of transaction {}", tx_id);

        let query = ExplorerQuery::new("proxy", "eth_getTransactionByHash")
            .param("txhash", tx_id)
            .param("apikey", self.api_key.as_str());
        let raw = self.source.get(&query).await?;
        transaction_mapper::to_details(raw)
    }

    pub async fn fetch_status(&self, tx_id: &str) -> Result<TransactionStatus> {
        Self::require("transaction ID", tx_id)?;
        info!("Fetching status of transaction {}", tx_id);

        let query = ExplorerQuery::new("transaction", "gettxreceiptstatus")
            .param("txhash", tx_id)
            .param("apikey", self.api_key.as_str());
        let raw = self.source.get(&query).await?;
        transaction_mapper::to_status(raw, tx_id)
    }

    /// Full history of `address` narrowed by `filter`.
    ///
    /// Token transfers are listed instead of native transactions when the
    /// filter asks for a token other than the native one.
    pub async fn fetch_filtered(
        &self,
        address: &str,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>> {
        let transactions = match filter.token_type() {
            Some(token) if token != NATIVE_TOKEN => {
                self.list_token_transfers(address, None, None).await?
            }
            _ => self.list_transactions(address, None, None).await?,
        };
        Ok(filter.apply(transactions))
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{listing, StubSource};
    use super::*;
    use crate::transaction_filter::DateRange;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn numbered(n: usize) -> Vec<Transaction> {
        (0..n)
            .map(|i| Transaction::new(format!("0x{}", i), Utc.timestamp_opt(i as i64, 0).unwrap()))
            .collect()
    }

    fn ids(transactions: &[Transaction]) -> Vec<String> {
        transactions.iter().map(|tx| tx.id().to_string()).collect()
    }

    fn gateway(source: Arc<StubSource>) -> TransactionGateway {
        let config = Config {
            explorer_api_key: "secret".to_string(),
            ..Config::localhost()
        };
        TransactionGateway::new(source, &config)
    }

    #[test]
    fn test_paginate_defaults_to_everything() {
        assert_eq!(paginate(numbered(5), None, None), numbered(5));
        assert_eq!(paginate(numbered(5), Some(-3), Some(0)), numbered(5));
        assert_eq!(paginate(numbered(5), Some(0), Some(-1)), numbered(5));
    }

    #[test]
    fn test_paginate_slices() {
        assert_eq!(ids(&paginate(numbered(5), Some(1), Some(3))), vec!["0x1", "0x2", "0x3"]);
        assert_eq!(ids(&paginate(numbered(5), Some(3), None)), vec!["0x3", "0x4"]);
        assert_eq!(ids(&paginate(numbered(5), Some(3), Some(10))), vec!["0x3", "0x4"]);
        assert_eq!(ids(&paginate(numbered(5), None, Some(2))), vec!["0x0", "0x1"]);
    }

    #[test]
    fn test_paginate_out_of_range_is_empty() {
        assert!(paginate(numbered(5), Some(5), None).is_empty());
        assert!(paginate(numbered(5), Some(50), Some(2)).is_empty());
        assert!(paginate(numbered(0), Some(0), Some(2)).is_empty());
        assert!(paginate(numbered(3), Some(i64::MAX), Some(i64::MAX)).is_empty());
    }

    #[test]
    fn test_paginate_length_matches_formula() {
        for n in 0..6usize {
            for start in 0..=n {
                for count in 1..8usize {
                    let result = paginate(numbered(n), Some(start as i64), Some(count as i64));
                    assert_eq!(result.len(), count.min(n - start));
                    assert_eq!(result, numbered(n)[start..start + result.len()].to_vec());
                }
            }
        }
    }

    #[tokio::test]
    async fn test_list_transactions_builds_query_and_paginates() {
        let source = Arc::new(StubSource::default().with(
            "txlist",
            listing(vec![("0xc", 300, None), ("0xb", 200, None), ("0xa", 100, None)]),
        ));
        let gateway = gateway(source.clone());

        let txs = gateway
            .list_transactions("0xwallet", Some(1), Some(1))
            .await
            .unwrap();
        assert_eq!(ids(&txs), vec!["0xb"]);

        let queries = source.queries.lock();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].module, "account");
        assert_eq!(queries[0].get("address"), Some("0xwallet"));
        assert_eq!(queries[0].get("sort"), Some("desc"));
        assert_eq!(queries[0].get("apikey"), Some("secret"));
    }

    #[tokio::test]
    async fn test_list_transactions_surfaces_upstream_failure() {
        let source = Arc::new(
            StubSource::default().with("txlist", json!({"status": "0", "message": "NOTOK", "result": "Max rate limit reached"})),
        );
        let err = gateway(source).list_transactions("0xwallet", None, None).await.unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));

        let source = Arc::new(StubSource::default());
        let err = gateway(source).list_transactions("0xwallet", None, None).await.unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
    }

    #[tokio::test]
    async fn test_empty_arguments_fail_before_network() {
        let source = Arc::new(StubSource::default());
        let gateway = gateway(source.clone());

        assert!(matches!(
            gateway.fetch_status("").await,
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            gateway.fetch_details("  ").await,
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            gateway.list_transactions("", None, None).await,
            Err(Error::InvalidArgument(_))
        ));
        assert!(source.queries.lock().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_status_and_details() {
        let source = Arc::new(
            StubSource::default()
                .with("gettxreceiptstatus", json!({"status": "1", "message": "OK", "result": {"status": "0"}}))
                .with("eth_getTransactionByHash", json!({"jsonrpc": "2.0", "id": 1, "result": null})),
        );
        let gateway = gateway(source.clone());

        let status = gateway.fetch_status("0xabc").await.unwrap();
        assert_eq!(status.tx_id, "0xabc");
        assert_eq!(status.status, "failed");

        let err = gateway.fetch_details("0xabc").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        let queries = source.queries.lock();
        assert_eq!(queries[0].get("txhash"), Some("0xabc"));
        assert_eq!(queries[1].module, "proxy");
    }

    #[tokio::test]
    async fn test_fetch_filtered_picks_listing_by_token() {
        let source = Arc::new(
            StubSource::default()
                .with("txlist", listing(vec![("0x2", 200, None), ("0x1", 100, None)]))
                .with(
                    "tokentx",
                    listing(vec![("0x4", 400, Some("USDT")), ("0x3", 300, Some("DAI"))]),
                ),
        );
        let gateway = gateway(source.clone());

        let native = TransactionFilter::new(
            Some(DateRange::between(
                Utc.timestamp_opt(200, 0).unwrap(),
                Utc.timestamp_opt(300, 0).unwrap(),
            )),
            None,
        );
        let txs = gateway.fetch_filtered("0xwallet", &native).await.unwrap();
        assert_eq!(ids(&txs), vec!["0x2"]);

        let usdt = TransactionFilter::new(None, Some("USDT".to_string()));
        let txs = gateway.fetch_filtered("0xwallet", &usdt).await.unwrap();
        assert_eq!(ids(&txs), vec!["0x4"]);

        let eth = TransactionFilter::new(None, Some("ETH".to_string()));
        let txs = gateway.fetch_filtered("0xwallet", &eth).await.unwrap();
        assert_eq!(ids(&txs), vec!["0x2", "0x1"]);

        assert_eq!(source.actions(), vec!["txlist", "tokentx", "txlist"]);
    }
}
