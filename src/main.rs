// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{debug, info};
use tunneldeck::access::AccessService;
use tunneldeck::config::Settings;
use tunneldeck::constants::TOKIO_WORKER_THREADS;
use tunneldeck::dns::DnsService;
use tunneldeck::http_api::{router, AppState};
use tunneldeck::provider::{CloudflareClient, Provider};
use tunneldeck::tunnels::TunnelService;
use tunneldeck::zones::ZoneRegistry;

/// Cloudflare tunnel, DNS and Access management service
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Bind address for the HTTP API server; overrides TUNNELDECK_LISTEN_ADDR
    #[arg(long)]
    listen: Option<String>,
}

fn main() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("tunneldeck")
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    // Initialize logging.
    //
    // Respects RUST_LOG for the filter (default "info") and RUST_LOG_FORMAT
    // for the output format ("json" or "text").
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }

    let cli = Cli::parse();

    info!("Starting tunneldeck");

    let mut settings = Settings::from_env().context("Failed to load configuration")?;
    if let Some(listen) = cli.listen {
        settings.listen_addr = listen;
    }

    let registry = Arc::new(ZoneRegistry::from_config_str(&settings.zones));
    info!(
        zones = registry.list_allowed().len(),
        "Loaded zone allow-list"
    );

    let client = CloudflareClient::new(
        &settings.api_base,
        &settings.account_id,
        &settings.api_token,
    )
    .context("Failed to build provider client")?;
    let provider: Arc<dyn Provider> = Arc::new(client);
    debug!(api_base = %settings.api_base, "Provider client ready");

    let state = AppState {
        registry: registry.clone(),
        dns: DnsService::new(registry.clone(), provider.clone()),
        tunnels: TunnelService::new(registry.clone(), provider.clone()),
        access: AccessService::new(provider),
    };

    let listener = tokio::net::TcpListener::bind(&settings.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.listen_addr))?;
    info!(addr = %settings.listen_addr, "HTTP API listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server exited with error")?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    // Exits on ctrl-c; SIGTERM is covered by the runtime's signal handling
    // in containers that forward it as an interrupt.
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}
