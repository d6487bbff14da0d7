use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use rmcp::transport::streamable_http_server::{
    StreamableHttpService, session::local::LocalSessionManager,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use damage_sim_rmcp::{
    cache::{self, ResponseCache},
    compression::RasterCodec,
    gemini::GeminiClient,
    generator::DamageSimulator,
    mcp_server::DamageSimServer,
    web_pages,
};

const SWEEP_PERIOD: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let port = env::var("MCP_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(3000);
    let bind_address = format!("0.0.0.0:{}", port);

    let secret_key = env::var("SECRET_KEY")
        .ok()
        .filter(|value| !value.trim().is_empty());
    let mcp_path = match secret_key.as_deref() {
        Some(value) => format!("/{}/mcp", value),
        None => "/mcp".to_string(),
    };
    let upload_path = match secret_key.as_deref() {
        Some(value) => format!("/{}/upload", value),
        None => "/upload".to_string(),
    };

    // Credential check happens before anything is bound or spawned.
    let model = Arc::new(GeminiClient::from_env()?);
    let response_cache = Arc::new(ResponseCache::new());
    let _sweeper = cache::spawn_sweeper(response_cache.clone(), SWEEP_PERIOD);

    let simulator = Arc::new(DamageSimulator::new(
        model,
        Arc::new(RasterCodec),
        response_cache.clone(),
    ));
    let service = StreamableHttpService::new(
        move || Ok(DamageSimServer::new(simulator.clone(), response_cache.clone())),
        LocalSessionManager::default().into(),
        Default::default(),
    );
    let router = axum::Router::new()
        .route(
            &upload_path,
            get(web_pages::upload_page)
                .post(web_pages::handle_image_upload)
                .layer(DefaultBodyLimit::max(50 * 1024 * 1024)),
        )
        .nest_service(&mcp_path, service);
    let tcp_listener = tokio::net::TcpListener::bind(&bind_address).await?;

    tracing::info!("Damage Sim MCP HTTP server started at http://{}{}", bind_address, mcp_path);

    let _ = axum::serve(tcp_listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await;
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact(),
        )
        .init();
}
