// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! End-to-end challenge/response against a live axum server

use axum::{http::StatusCode, middleware, routing::get, Router};
use openkitx403::client::{AuthRequest, OpenKit403Client};
use openkitx403::crypto::Keypair;
use openkitx403::protocol::WwwAuthenticate;
use openkitx403::server::{
    require_wallet_auth, AllowList, AuthErrorResponse, OpenKit403Server, ServerConfig,
    VerifiedWallet,
};
use std::sync::Arc;

async fn spawn_app(server: OpenKit403Server) -> String {
    let server = Arc::new(server);
    let app = Router::new()
        .route(
            "/protected",
            get(|wallet: VerifiedWallet| async move { wallet.address }).post(
                |wallet: VerifiedWallet, body: String| async move {
                    format!("{}:{}", wallet.address, body)
                },
            ),
        )
        .layer(middleware::from_fn_with_state(server, require_wallet_auth))
        .route("/public", get(|| async { "public" }))
        .route(
            "/forbidden",
            get(|| async { (StatusCode::FORBIDDEN, "plain forbidden") }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_authenticate_get_protected_resource() {
    let base = spawn_app(OpenKit403Server::new(ServerConfig::default())).await;
    let client = OpenKit403Client::new(Keypair::generate());

    let response = client
        .authenticate(AuthRequest::get(format!("{}/protected", base)))
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), client.address());
}

#[tokio::test]
async fn test_authenticate_post_keeps_body_on_retry() {
    let base = spawn_app(OpenKit403Server::new(ServerConfig::default())).await;
    let client = OpenKit403Client::new(Keypair::generate());

    let response = client
        .authenticate(
            AuthRequest::post(format!("{}/protected", base), "hello")
                .header("Content-Type", "text/plain"),
        )
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.text().await.unwrap(),
        format!("{}:hello", client.address())
    );
}

#[tokio::test]
async fn test_public_resource_passes_through() {
    let base = spawn_app(OpenKit403Server::new(ServerConfig::default())).await;
    let client = OpenKit403Client::new(Keypair::generate());

    let response = client
        .authenticate(AuthRequest::get(format!("{}/public", base)))
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), "public");
}

#[tokio::test]
async fn test_forbidden_without_challenge_is_returned_untouched() {
    let base = spawn_app(OpenKit403Server::new(ServerConfig::default())).await;
    let client = OpenKit403Client::new(Keypair::generate());

    let response = client
        .authenticate(AuthRequest::get(format!("{}/forbidden", base)))
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 403);
    assert!(response.headers().get("www-authenticate").is_none());
    assert_eq!(response.text().await.unwrap(), "plain forbidden");
}

#[tokio::test]
async fn test_token_gate_denial_is_reported_after_retry() {
    let gate = AllowList::new(["SomeOtherWallet111111111111111111111111111"]);
    let server = OpenKit403Server::new(ServerConfig::default()).with_token_gate(Arc::new(gate));
    let base = spawn_app(server).await;
    let client = OpenKit403Client::new(Keypair::generate());

    let response = client
        .authenticate(AuthRequest::get(format!("{}/protected", base)))
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 403);
    let challenge = response
        .headers()
        .get("www-authenticate")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap();
    assert!(WwwAuthenticate::parse(&challenge).is_ok());

    let body: AuthErrorResponse = response.json().await.unwrap();
    assert_eq!(body.error, "token_gate_denied");
}

#[tokio::test]
async fn test_allowed_wallet_passes_token_gate() {
    let keypair = Keypair::generate();
    let gate = AllowList::new([keypair.address()]);
    let server = OpenKit403Server::new(ServerConfig::default()).with_token_gate(Arc::new(gate));
    let base = spawn_app(server).await;
    let client = OpenKit403Client::new(keypair);

    let response = client
        .authenticate(AuthRequest::get(format!("{}/protected", base)))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
}
