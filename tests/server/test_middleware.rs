// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! axum middleware behaviour, driven through `tower::ServiceExt::oneshot`

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    middleware,
    response::Response,
    routing::get,
    Router,
};
use openkitx403::client::OpenKit403Client;
use openkitx403::crypto::Keypair;
use openkitx403::protocol::{Challenge, WwwAuthenticate};
use openkitx403::server::{
    require_wallet_auth, AuthErrorResponse, OpenKit403Server, ServerConfig, VerifiedWallet,
};
use std::sync::Arc;
use tower::ServiceExt;

fn app(config: ServerConfig) -> Router {
    let server = Arc::new(OpenKit403Server::new(config));
    Router::new()
        .route(
            "/protected",
            get(|wallet: VerifiedWallet| async move { wallet.address }),
        )
        .layer(middleware::from_fn_with_state(server, require_wallet_auth))
}

fn challenge_of(response: &Response) -> WwwAuthenticate {
    let value = response
        .headers()
        .get(header::WWW_AUTHENTICATE)
        .expect("challenge header")
        .to_str()
        .unwrap();
    WwwAuthenticate::parse(value).unwrap()
}

async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn error_code(response: Response) -> String {
    let body: AuthErrorResponse = serde_json::from_str(&body_string(response).await).unwrap();
    body.error
}

fn get_request(path: &str, authorization: Option<&str>, user_agent: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    if let Some(value) = user_agent {
        builder = builder.header(header::USER_AGENT, value);
    }
    builder.body(Body::empty()).unwrap()
}

/// Fetch a challenge for GET /protected and answer it with `client`
async fn signed_header(app: &Router, client: &OpenKit403Client, user_agent: Option<&str>) -> String {
    let response = app
        .clone()
        .oneshot(get_request("/protected", None, user_agent))
        .await
        .unwrap();
    let challenge = challenge_of(&response);
    client
        .sign_challenge(&challenge.challenge, "GET", "/protected")
        .unwrap()
}

#[tokio::test]
async fn test_missing_authorization_gets_challenge() {
    let app = app(ServerConfig::default());

    let response = app
        .oneshot(get_request("/protected", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let www = challenge_of(&response);
    assert_eq!(www.realm, "openkitx403");
    assert_eq!(www.version, "1");

    let challenge = Challenge::decode(&www.challenge).unwrap();
    assert_eq!(challenge.method, "GET");
    assert_eq!(challenge.path, "/protected");
    assert_eq!(challenge.aud, "http://localhost:3000");

    assert_eq!(error_code(response).await, "wallet_auth_required");
}

#[tokio::test]
async fn test_other_scheme_gets_challenge() {
    let app = app(ServerConfig::default());

    let response = app
        .oneshot(get_request("/protected", Some("Bearer abc.def"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    challenge_of(&response);
}

#[tokio::test]
async fn test_signed_request_is_admitted() {
    let app = app(ServerConfig::default());
    let client = OpenKit403Client::new(Keypair::generate());
    let authorization = signed_header(&app, &client, None).await;

    let response = app
        .oneshot(get_request("/protected", Some(&authorization), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, client.address());
}

#[tokio::test]
async fn test_replayed_authorization_is_rejected() {
    let app = app(ServerConfig::default());
    let client = OpenKit403Client::new(Keypair::generate());
    let authorization = signed_header(&app, &client, None).await;

    let first = app
        .clone()
        .oneshot(get_request("/protected", Some(&authorization), None))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .oneshot(get_request("/protected", Some(&authorization), None))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::FORBIDDEN);
    challenge_of(&second);
    assert_eq!(error_code(second).await, "replay_detected");
}

#[tokio::test]
async fn test_signature_from_wrong_wallet_is_rejected() {
    let app = app(ServerConfig::default());
    let signer = OpenKit403Client::new(Keypair::generate());
    let impostor = Keypair::generate();

    let authorization = signed_header(&app, &signer, None).await;
    let forged = authorization.replace(signer.address(), &impostor.address());

    let response = app
        .oneshot(get_request("/protected", Some(&forged), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(response).await, "invalid_signature");
}

#[tokio::test]
async fn test_user_agent_binding() {
    let mut config = ServerConfig::default();
    config.ua_binding = true;
    let app = app(config);
    let client = OpenKit403Client::new(Keypair::generate());

    let authorization = signed_header(&app, &client, Some("wallet-app/1.0")).await;

    let response = app
        .clone()
        .oneshot(get_request(
            "/protected",
            Some(&authorization),
            Some("curl/8.0"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(response).await, "binding_mismatch");

    let authorization = signed_header(&app, &client, Some("wallet-app/1.0")).await;
    let response = app
        .oneshot(get_request(
            "/protected",
            Some(&authorization),
            Some("wallet-app/1.0"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_challenge_issuance_is_rate_limited() {
    let mut config = ServerConfig::default();
    config.challenges_per_minute = 1;
    let app = app(config);

    let first = app
        .clone()
        .oneshot(get_request("/protected", None, None))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::FORBIDDEN);

    let second = app
        .oneshot(get_request("/protected", None, None))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(second.headers().contains_key(header::RETRY_AFTER));
    assert!(second.headers().get(header::WWW_AUTHENTICATE).is_none());
    assert_eq!(error_code(second).await, "rate_limited");
}

#[tokio::test]
async fn test_nested_router_binds_full_path() {
    let server = Arc::new(OpenKit403Server::new(ServerConfig::default()));
    let protected = Router::new()
        .route(
            "/protected",
            get(|wallet: VerifiedWallet| async move { wallet.address }),
        )
        .layer(middleware::from_fn_with_state(server, require_wallet_auth));
    let app = Router::new().nest("/api", protected);
    let client = OpenKit403Client::new(Keypair::generate());

    let response = app
        .clone()
        .oneshot(get_request("/api/protected", None, None))
        .await
        .unwrap();
    let www = challenge_of(&response);
    assert_eq!(Challenge::decode(&www.challenge).unwrap().path, "/api/protected");

    let authorization = client
        .sign_challenge(&www.challenge, "GET", "/api/protected")
        .unwrap();
    let response = app
        .oneshot(get_request("/api/protected", Some(&authorization), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, client.address());
}
