//! medscan-rx - medication recognition microservice
//!
//! Warms the active strategy up in the background after the listener is
//! bound; a failed warm-up is retried by the first request that needs it.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use medscan_common::config::{
    default_config_path, load_toml_config, RootFolderInitializer, RootFolderResolver,
};
use medscan_common::logging::init_tracing;
use medscan_rx::cache::{JsonFileStore, VocabularyCache};
use medscan_rx::config::{RxTomlConfig, Strategy, DEFAULT_PORT};
use medscan_rx::db::{init_database, SqliteScanStore};
use medscan_rx::recognition::{
    ConceptLinkingStrategy, DictionaryStrategy, ExtractionStrategy, RecognitionOrchestrator,
    TrademarkIndex, TrademarkResolver,
};
use medscan_rx::services::{build_http_client, NerClient, OpenFdaClient, RxClassClient};
use medscan_rx::{build_router, AppState};
use tokio::signal;
use tracing::{error, info, warn};

/// Command-line arguments for medscan-rx
#[derive(Parser, Debug)]
#[command(name = "medscan-rx")]
#[command(about = "Medication recognition microservice for MedScan")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "MEDSCAN_RX_PORT")]
    port: Option<u16>,

    /// Root folder holding caches and the scan database
    #[arg(short, long, env = "MEDSCAN_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Extraction strategy (dictionary or concept_linking)
    #[arg(short, long, env = "MEDSCAN_STRATEGY")]
    strategy: Option<Strategy>,

    /// Base URL of the medscan-ner service
    #[arg(long, env = "MEDSCAN_NER_URL")]
    ner_url: Option<String>,

    /// TOML configuration file
    #[arg(short, long, env = "MEDSCAN_RX_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(|| default_config_path("medscan-rx"));
    let (toml_config, config_source): (RxTomlConfig, _) = load_toml_config(config_path.as_deref())?;

    init_tracing(&toml_config.logging);
    config_source.log();

    info!(
        "Starting MedScan recognition (medscan-rx) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let root_folder = RootFolderResolver::new()
        .with_cli_arg(args.root_folder)
        .with_toml_value(toml_config.root_folder.clone())
        .resolve();
    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to initialize root folder")?;

    let pool = init_database(&initializer.file_path(&toml_config.database_file))
        .await
        .context("Failed to open scan database")?;
    let scan_store = Arc::new(SqliteScanStore::new(pool));

    let http_client = build_http_client(Duration::from_secs(toml_config.http_timeout_secs))?;

    let strategy_kind = args.strategy.unwrap_or(toml_config.strategy);
    let strategy: Arc<dyn ExtractionStrategy> = match strategy_kind {
        Strategy::Dictionary => {
            let store = JsonFileStore::<Vec<String>>::new(
                initializer.file_path(&toml_config.ingredient_cache_file),
            );
            info!("Ingredient cache: {}", store.path().display());
            let source = RxClassClient::new(http_client.clone(), &toml_config.ingredient_source_url);
            Arc::new(DictionaryStrategy::new(VocabularyCache::new(
                "ingredients",
                Arc::new(store),
                Arc::new(source),
            )))
        }
        Strategy::ConceptLinking => {
            let ner_url = args.ner_url.unwrap_or(toml_config.ner_url.clone());
            info!("Concept linker: {}", ner_url);
            Arc::new(ConceptLinkingStrategy::new(Arc::new(NerClient::new(
                http_client.clone(),
                ner_url,
            ))))
        }
    };
    info!("Extraction strategy: {}", strategy_kind);

    let trademark_store = JsonFileStore::<TrademarkIndex>::new(
        initializer.file_path(&toml_config.trademark_cache_file),
    );
    info!("Trademark cache: {}", trademark_store.path().display());
    let resolver = Arc::new(TrademarkResolver::new(
        Arc::new(trademark_store),
        Arc::new(OpenFdaClient::new(http_client, &toml_config.brand_source_url)),
    ));

    let orchestrator = Arc::new(RecognitionOrchestrator::new(
        Arc::clone(&strategy),
        resolver,
        scan_store.clone(),
    ));
    let app = build_router(AppState::new(orchestrator, scan_store));

    let port = args.port.or(toml_config.port).unwrap_or(DEFAULT_PORT);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("medscan-rx listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    tokio::spawn(async move {
        match strategy.warm_up().await {
            Ok(()) => info!("Extraction strategy ready"),
            Err(e) => warn!("Warm-up failed, will retry on first request: {}", e),
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received terminate signal, shutting down"),
    }
}
