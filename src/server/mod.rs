// Copyright (c) The Starcoin Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP surface of the service.

pub mod error;
pub mod favorites;
pub mod transactions;

use crate::{address_book::AddressBook, transaction_gateway::TransactionGateway};
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tracing::info;

pub const API_PREFIX: &str = "/api/v1";

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<TransactionGateway>,
    pub address_book: Arc<AddressBook>,
}

impl AppState {
    pub fn new(gateway: Arc<TransactionGateway>, address_book: Arc<AddressBook>) -> Self {
        Self {
            gateway,
            address_book,
        }
    }

    /// Every route is reachable both at the root and under [`API_PREFIX`].
    pub fn router(self) -> Router {
        let routes = Router::new()
            .route("/favorites", get(favorites::list).post(favorites::add))
            .route("/transactions", get(transactions::list))
            .route("/token-transfers", get(transactions::list_token_transfers))
            .route("/transaction-details", get(transactions::details))
            .route("/transaction-status", get(transactions::status))
            .route("/filtered-transactions", post(transactions::filtered));

        Router::new()
            .merge(routes.clone())
            .nest(API_PREFIX, routes)
            .with_state(self)
    }
}

pub async fn run_server(listen_addr: &str, state: AppState) -> Result<()> {
    let addr: SocketAddr = listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, state.router().into_make_service()).await?;
    Ok(())
}
