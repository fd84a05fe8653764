use anyhow::Context;
use clap::Parser;
use colloquy_core::{Colloquy, FileLog};
use colloquy_server::{app, init_tracing, AppState, Cli, ServerConfig};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let config = ServerConfig::load(&cli).context("failed to load configuration")?;

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    init_tracing(config.log_format);

    let storage = Arc::new(FileLog::new(&config.data_dir));
    let engine = Arc::new(Colloquy::new(config.engine.clone(), storage)?);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(
        addr = %addr,
        data_dir = %config.data_dir.display(),
        "Colloquy server listening"
    );

    axum::serve(listener, app(AppState::new(engine.clone())))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    engine.stop_dialogue().await;
    info!("Colloquy server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
