// ABOUTME: Server binary wiring configuration, logging, entry store, knowledge base, and LLM provider
// ABOUTME: Serves the MindMate HTTP API until Ctrl-C
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

//! # `MindMate` Server Binary

use anyhow::{Context, Result};
use clap::Parser;
use mindmate_server::chat::{ChatPipeline, KnowledgeBase};
use mindmate_server::config::ServerConfig;
use mindmate_server::llm::{LlmProvider, OpenAiCompatibleConfig, OpenAiCompatibleProvider};
use mindmate_server::logging;
use mindmate_server::routes::{build_router, ServerResources};
use mindmate_server::services::SleepService;
use mindmate_server::store::{EntryStore, SqliteEntryStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

/// Command-line arguments; everything else comes from the environment
#[derive(Parser)]
#[command(name = "mindmate-server")]
#[command(about = "MindMate - sleep analytics and emotion-aware chat API")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    logging::init_from_env()?;
    info!("{}", config.summary());

    let store: Arc<dyn EntryStore> = Arc::new(
        SqliteEntryStore::connect(&config.database_url)
            .await
            .context("Failed to open entry store")?,
    );

    let knowledge = Arc::new(KnowledgeBase::load(&config.knowledge_base_path).await);
    if knowledge.is_empty() {
        warn!(
            path = %config.knowledge_base_path.display(),
            "Knowledge base is empty; emotional replies will carry no guidance"
        );
    }

    let provider: Arc<dyn LlmProvider> = Arc::new(
        OpenAiCompatibleProvider::new(OpenAiCompatibleConfig::from(&config.llm))
            .context("Failed to build LLM provider")?,
    );

    let resources = Arc::new(ServerResources::new(
        ChatPipeline::new(provider, knowledge, config.chat),
        SleepService::new(store, config.sleep),
    ));
    let app = build_router(resources, &config.cors_origins);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "MindMate server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("MindMate server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C; shutting down");
    }
    info!("Shutdown signal received");
}
