use crate::configuration;
use crate::state;
use anyhow::Result;
use std::path::Path;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub async fn run(host: Option<&str>, port: Option<u16>) -> Result<()> {
    // Load configuration
    let mut settings = configuration::Settings::new()?;

    // Initialize logging
    crate::logging::setup_logging(Some("willowd"), Path::new(&settings.logging.dir))?;

    // Override settings with CLI arguments if provided
    if let Some(host_value) = host {
        settings.server.host = host_value.to_string();
    }

    if let Some(port_value) = port {
        settings.server.port = port_value;
    }

    let addr = settings.server.socket_addr()?;
    if settings.supabase.is_none() {
        info!("supabase is not configured; /test-supabase will report an error");
    }

    let state = state::AppState::from_settings(settings);

    // Create router with CORS support
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = crate::routes::configure(state).layer(cors);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
