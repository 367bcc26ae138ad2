// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use clap::Args;
use std::path::PathBuf;

use super::keys::load_keypair;
use crate::client::{AuthRequest, ClientConfig, OpenKit403Client};

/// Arguments for request command
#[derive(Args, Debug)]
pub struct RequestArgs {
    /// URL of the protected resource
    pub url: String,

    /// Keypair file
    #[arg(long, short, env = "OPENKITX403_KEYPAIR")]
    pub keypair: PathBuf,

    /// HTTP method
    #[arg(long, short = 'X', default_value = "GET")]
    pub method: String,

    /// Request body
    #[arg(long, short)]
    pub data: Option<String>,

    /// Extra header as `Name: value` (repeatable)
    #[arg(long = "header", short = 'H')]
    pub headers: Vec<String>,
}

fn parse_header(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| anyhow!("Header must be 'Name: value', got '{}'", raw))?;
    Ok((name.trim().to_string(), value.trim().to_string()))
}

/// Perform the request and print status and body
pub async fn request(args: RequestArgs) -> Result<()> {
    dotenv::dotenv().ok();

    let config = ClientConfig::from_env();
    config.validate().map_err(|e| anyhow!(e))?;
    let client = OpenKit403Client::with_config(load_keypair(&args.keypair)?, config);

    let mut req = AuthRequest::new(&args.method, &args.url);
    for raw in &args.headers {
        let (name, value) = parse_header(raw)?;
        req = req.header(name, value);
    }
    if let Some(data) = args.data {
        req = req.body(data);
    }

    println!("🔑 Wallet: {}", client.address());
    let response = client.authenticate(req).await?;
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    println!("{}", status);
    println!("{}", body);

    if !status.is_success() {
        return Err(anyhow!("Request failed with status {}", status));
    }
    Ok(())
}
