use std::sync::Arc;

use env_logger::Env;
use log::{error, info};
use scribe::configuration::Configuration;
use scribe::storage::{Context, DatabaseStorage};
use scribe::web_interface::{AppState, WebServer};

#[tokio::main]
async fn main() {
    // RUST_LOG overrides the default level
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    println!(
        "
 ___  ___ _ __(_) |__   ___
/ __|/ __| '__| | '_ \\ / _ \\
\\__ \\ (__| |  | | |_) |  __/
|___/\\___|_|  |_|_.__/ \\___|
=============================
  A minimal blog server v{}
=============================
",
        env!("CARGO_PKG_VERSION")
    );

    let config = Configuration::load().unwrap_or_else(|e| {
        error!("Unable to load configuration: {}", e);
        std::process::exit(1);
    });

    let addr = config.socket_addr().unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });

    let storage = DatabaseStorage::open(&config.storage_db, config.max_connections)
        .await
        .unwrap_or_else(|e| {
            error!("cannot initialize database {}: {}", config.storage_db, e);
            std::process::exit(1);
        });

    if let Err(e) = storage
        .init(&Context::with_timeout(config.request_timeout()))
        .await
    {
        error!("cannot create schema in {}: {}", config.storage_db, e);
        std::process::exit(1);
    }
    info!("Using storage in: {}", config.storage_db);

    let state = AppState::new(Arc::new(storage), config.request_timeout());
    let server = WebServer::new(state);

    info!("Starting web server on host: {}, port: {}", config.host, config.port);
    if let Err(e) = server.start(addr, shutdown_signal()).await {
        error!("Web server failed: {}", e);
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Cannot listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
