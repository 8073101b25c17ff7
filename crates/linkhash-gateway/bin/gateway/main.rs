mod cli;
mod telemetry;

use std::sync::Arc;

use crate::cli::{StorageBackendArg, TransportArg, CLI};
use anyhow::Context;
use clap::Parser;
use linkhash_core::Shortener;
use linkhash_deriver::Sha256Deriver;
use linkhash_gateway::{App, AppState, UrlGrpcServer};
use linkhash_shortener::{AllocatorSettings, ShortenerService};
use linkhash_storage::{InMemoryKeyStore, PostgresKeyStore};
use tonic::transport::Server;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    telemetry::init(config.log_format)?;

    info!(
        transport = %config.transport,
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        max_attempts = config.max_attempts,
        "starting gateway server"
    );

    let settings = AllocatorSettings::builder()
        .max_attempts(config.max_attempts)
        .build();

    match config.storage {
        StorageBackendArg::InMemory => {
            let store = Arc::new(InMemoryKeyStore::new());
            let service = ShortenerService::with_settings(store, Sha256Deriver::new(), settings);
            run_server(&config, service).await?;
        }
        StorageBackendArg::Postgres => {
            let dsn = config
                .postgres_dsn
                .as_deref()
                .context("postgres dsn is required when storage backend is postgres")?;
            let store = Arc::new(
                PostgresKeyStore::connect(dsn, config.table_name.as_str())
                    .await
                    .context("failed to open postgres key store")?,
            );
            let service =
                ShortenerService::with_settings(Arc::clone(&store), Sha256Deriver::new(), settings);
            run_server(&config, service).await?;
            store.close().await;
        }
    }

    Ok(())
}

async fn run_server<S: Shortener>(config: &CLI, shortener: S) -> anyhow::Result<()> {
    let shortener: Arc<dyn Shortener> = Arc::new(shortener);

    match config.transport {
        TransportArg::Grpc => serve_grpc(config, shortener).await?,
        TransportArg::Http => serve_http(config, shortener).await?,
    }

    info!("gateway server stopped");
    Ok(())
}

async fn serve_grpc(config: &CLI, shortener: Arc<dyn Shortener>) -> anyhow::Result<()> {
    info!(listen_addr = %config.listen_addr, "serving gRPC");

    Server::builder()
        .add_service(UrlGrpcServer::new(shortener).into_service())
        .serve_with_shutdown(config.listen_addr, shutdown_signal())
        .await
        .context("gRPC server failed")
}

async fn serve_http(config: &CLI, shortener: Arc<dyn Shortener>) -> anyhow::Result<()> {
    let state = AppState::new(shortener, config.public_base_url());
    let app = App::router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "serving HTTP");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
