// Copyright (c) The Starcoin Core Contributors
// SPDX-License-Identifier: Apache-2.0

pub mod address_book;
pub mod config;
pub mod error;
pub mod explorer_client;
pub mod explorer_source;
pub mod server;
pub mod transaction_filter;
pub mod transaction_gateway;
pub mod transaction_mapper;
pub mod types;
