use std::sync::Arc;

use anyhow::{Context, Result};
use axum::serve;
use chatbridge_core::Catalog;
use chatbridge_gateway::{
    auth::GoogleTokenProvider,
    config::GatewayConfig,
    email::MailNotifier,
    graph::GraphChannel,
    http::{AppState, build_router},
    nlu::DialogflowClient,
    telemetry::init_telemetry,
};
use chatbridge_session::shared_memory_store;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_telemetry("chatbridge-gateway")?;

    let config = GatewayConfig::from_env()?;
    let catalog = match &config.catalog_path {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("load catalog {}", path.display()))?,
        None => Catalog::builtin().context("parse embedded catalog")?,
    };

    let http = reqwest::Client::new();
    let tokens = GoogleTokenProvider::new(
        &config.nlu_client_email,
        &config.nlu_private_key,
        &config.oauth_token_url,
    )?;
    let channel = Arc::new(GraphChannel::new(
        http.clone(),
        &config.graph_api_base,
        &config.page_access_token,
    ));
    let nlu = Arc::new(DialogflowClient::new(
        http.clone(),
        &config.nlu_api_base,
        &config.nlu_project_id,
        &config.nlu_language_code,
        tokens,
    ));
    let notifier = Arc::new(MailNotifier::new(
        http,
        &config.email_api_base,
        &config.email_api_key,
        &config.email_from,
        &config.email_to,
    ));

    let addr = config.addr;
    let state = Arc::new(AppState {
        catalog,
        sessions: shared_memory_store(),
        channel,
        nlu,
        notifier,
        config,
    });
    let router = build_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!("chatbridge-gateway listening on {addr}");
    serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
