use tracing_subscriber::EnvFilter;

use carrom_core::config::CarromConfig;
use carrom_server::build_app;
use carrom_server::config::ServerConfig;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Carrom server starting");

    let config = ServerConfig::load();
    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            tracing::error!("{issue}");
        }
        std::process::exit(1);
    }

    let game = CarromConfig::load();
    let listen_addr = config.listen_addr.clone();
    let (app, _state) = build_app(config, game);

    let listener = match tokio::net::TcpListener::bind(&listen_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(addr = %listen_addr, "Failed to bind: {e}");
            std::process::exit(1);
        },
    };
    tracing::info!(addr = %listen_addr, "Listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
    tracing::info!("Carrom server stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Could not listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
