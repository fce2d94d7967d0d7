// Copyright (c) The Starcoin Core Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::Parser;
use ethereye::{
    address_book::AddressBook,
    config::Config,
    explorer_client::ExplorerClient,
    server::{run_server, AppState},
    transaction_gateway::TransactionGateway,
};
use std::sync::Arc;
use tracing::{info, warn, Level};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,

    /// Address to listen on, overrides LISTEN_ADDR
    #[arg(long)]
    listen_addr: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    info!("Starting Ethereye service...");

    let mut config = Config::load()?;
    if let Some(listen_addr) = args.listen_addr {
        config.listen_addr = listen_addr;
    }
    if config.explorer_api_key.is_empty() {
        warn!("ETHERSCAN_API_KEY is not set, explorer requests will be rate limited or rejected");
    }
    info!("Configuration loaded successfully");

    let address_book = Arc::new(AddressBook::new(&config.address_book_path));
    address_book.load()?;

    let explorer = Arc::new(ExplorerClient::new(&config));
    let gateway = Arc::new(TransactionGateway::new(explorer, &config));

    run_server(&config.listen_addr, AppState::new(gateway, address_book)).await?;

    info!("Stopping Ethereye service...");
    Ok(())
}
