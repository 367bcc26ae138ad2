// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use axum::{
    extract::Json,
    http::{header, Method},
    middleware,
    response::IntoResponse,
    routing::get,
    Router,
};
use openkitx403::{
    require_wallet_auth,
    server::{AllowList, OpenKit403Server, ServerConfig, VerifiedWallet},
    version,
};
use serde_json::{json, Value};
use std::{env, net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before reading configuration
    dotenv::dotenv().ok();

    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    info!("Starting {}", version::get_version_string());

    let config = ServerConfig::from_env();
    config.validate().map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    let mut server = OpenKit403Server::new(config);

    // Comma-separated wallet addresses; unset means every signed wallet is admitted
    if let Ok(list) = env::var("OPENKITX403_ALLOWED_WALLETS") {
        let gate = AllowList::new(
            list.split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string),
        );
        info!("Token gate enabled with {} allowed wallets", gate.len());
        server = server.with_token_gate(Arc::new(gate));
    }
    let server = Arc::new(server);

    let protected = Router::new()
        .route("/protected", get(protected_handler).post(protected_post_handler))
        .layer(middleware::from_fn_with_state(
            server.clone(),
            require_wallet_auth,
        ));

    let app = Router::new()
        .route("/health", get(health_handler))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
                .expose_headers([header::WWW_AUTHENTICATE]),
        );

    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Protected API listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": version::get_version_info(),
    }))
}

async fn protected_handler(wallet: VerifiedWallet) -> impl IntoResponse {
    Json(json!({
        "message": "Authenticated",
        "address": wallet.address,
    }))
}

async fn protected_post_handler(
    wallet: VerifiedWallet,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    Json(json!({
        "message": "Authenticated",
        "address": wallet.address,
        "received": payload,
    }))
}
