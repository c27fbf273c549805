mod baas;
mod config;
mod pages;
mod routes;
mod services;
mod state;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env().expect("invalid configuration");
    if config.baas.service_key.is_none() {
        tracing::warn!("BAAS_SERVICE_KEY not set; /api/issues reads use the anon key");
    }

    let backend = baas::BaasClient::new(config.baas.clone()).expect("backend client init failed");
    let views = pages::Views::new().expect("template init failed");
    let port = config.port;

    tracing::info!(backend = backend.base_url(), table = %config.issues_table, "backend configured");
    let state = state::AppState::new(Arc::new(backend), Arc::new(views), Arc::new(config));

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "issue tracker listening");
    axum::serve(listener, app).await.expect("server failed");
}
