/**
 * DocNest Server Entry Point
 *
 * Loads `.env`, initializes tracing, builds the Axum app and serves it on
 * `SERVER_HOST:SERVER_PORT`.
 */

#[cfg(feature = "server")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use docnest::backend::server::{config::Settings, create_app};

    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::from_env();

    // RUST_LOG wins; otherwise DEBUG=true turns on debug output
    let default_level = settings
        .as_ref()
        .map(Settings::default_log_level)
        .unwrap_or("info");
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let settings = settings.map_err(|e| {
        tracing::error!("Invalid configuration: {}", e);
        e
    })?;
    tracing::info!(
        "Starting {} ({} environment)",
        settings.project_name,
        settings.environment
    );

    let bind = format!("{}:{}", settings.server_host, settings.server_port);
    let app = create_app(settings).await?;

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

#[cfg(not(feature = "server"))]
fn main() {
    eprintln!("Server requires the 'server' feature to be enabled.");
    eprintln!("Run with: cargo run --bin docnest-server --features server");
    std::process::exit(1);
}
