// Copyright (c) The Starcoin Core Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::types::Transaction;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Inclusive time window; a missing bound leaves that side open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::new(Some(start), Some(end))
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// A range whose start lies after its end can never match.
    pub fn is_reversed(&self) -> bool {
        matches!((self.start, self.end), (Some(start), Some(end)) if start > end)
    }

    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| start <= *timestamp)
            && self.end.map_or(true, |end| *timestamp <= end)
    }
}

/// Predicates applied to an already fetched list of transactions
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransactionFilter {
    pub date_range: Option<DateRange>,
    pub token_type: Option<String>,
}

impl TransactionFilter {
    pub fn new(date_range: Option<DateRange>, token_type: Option<String>) -> Self {
        Self {
            date_range,
            token_type,
        }
    }

    /// Token type to filter on, ignoring an empty string.
    pub fn token_type(&self) -> Option<&str> {
        self.token_type.as_deref().filter(|token| !token.is_empty())
    }

    pub fn apply(&self, transactions: Vec<Transaction>) -> Vec<Transaction> {
        apply(transactions, self.date_range.as_ref(), self.token_type())
    }
}

pub fn is_within_date_range(transaction: &Transaction, date_range: &DateRange) -> bool {
    date_range.contains(&transaction.timestamp)
}

/// Case-sensitive, exact comparison.
pub fn matches_token_type(transaction: &Transaction, token_type: &str) -> bool {
    transaction.token_type == token_type
}

/// Narrows `transactions` by date, then by token type. Order is preserved.
pub fn apply(
    transactions: Vec<Transaction>,
    date_range: Option<&DateRange>,
    token_type: Option<&str>,
) -> Vec<Transaction> {
    let total = transactions.len();
    let mut transactions = transactions;

    if let Some(date_range) = date_range {
        transactions.retain(|tx| is_within_date_range(tx, date_range));
    }

    if let Some(token_type) = token_type.filter(|token| !token.is_empty()) {
        transactions.retain(|tx| matches_token_type(tx, token_type));
    }

    debug!(
        "Filtered transactions: kept {} of {} (date_range={:?}, token_type={:?})",
        transactions.len(),
        total,
        date_range,
        token_type
    );
    transactions
}
