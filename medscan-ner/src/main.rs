//! medscan-ner - concept linking microservice
//!
//! Loads the knowledge base in the background after the listener is bound,
//! so `/health` reports 503 until the model is ready.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use medscan_common::config::{
    default_config_path, load_toml_config, RootFolderInitializer, RootFolderResolver,
};
use medscan_common::logging::init_tracing;
use medscan_ner::config::{default_knowledge_base, NerTomlConfig, DEFAULT_PORT};
use medscan_ner::linker::{KnowledgeBase, LinkingPipeline};
use medscan_ner::{build_router, AppState, ConceptLinker};
use tokio::signal;
use tracing::{error, info};

/// Command-line arguments for medscan-ner
#[derive(Parser, Debug)]
#[command(name = "medscan-ner")]
#[command(about = "Concept linking microservice for MedScan")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "MEDSCAN_NER_PORT")]
    port: Option<u16>,

    /// Root folder holding the knowledge base
    #[arg(short, long, env = "MEDSCAN_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Knowledge base JSON file
    #[arg(short, long, env = "MEDSCAN_KNOWLEDGE_BASE")]
    knowledge_base: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, env = "MEDSCAN_NER_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(|| default_config_path("medscan-ner"));
    let (toml_config, config_source): (NerTomlConfig, _) = load_toml_config(config_path.as_deref())?;

    init_tracing(&toml_config.logging);
    config_source.log();

    info!(
        "Starting MedScan concept linker (medscan-ner) v{} [{}] built {} ({})",
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

    let kb_path = initializer.file_path(
        args.knowledge_base
            .or(toml_config.knowledge_base.clone())
            .unwrap_or_else(default_knowledge_base),
    );
    info!("Knowledge base: {}", kb_path.display());
    info!("Linker policy: {:?}", toml_config.linker);

    let linker = Arc::new(ConceptLinker::new());
    let app = build_router(AppState::new(Arc::clone(&linker)));

    let port = args.port.or(toml_config.port).unwrap_or(DEFAULT_PORT);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("medscan-ner listening on http://{}", addr);
    info!("Readiness check: http://{}/health", addr);

    let linker_config = toml_config.linker.clone();
    tokio::spawn(async move {
        let result = linker
            .initialize(move || {
                let kb = KnowledgeBase::load(&kb_path)?;
                info!(concepts = kb.len(), "Knowledge base loaded");
                LinkingPipeline::from_knowledge_base(kb, linker_config)
            })
            .await;
        if let Err(e) = result {
            error!("Concept linker unavailable: {}", e);
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
