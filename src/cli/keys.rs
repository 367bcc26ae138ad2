// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::client::OpenKit403Client;
use crate::crypto::Keypair;

/// Arguments for keygen command
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Output file (Solana JSON keypair format)
    #[arg(long, short)]
    pub out: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for address command
#[derive(Args, Debug)]
pub struct AddressArgs {
    /// Keypair file (can also be set via OPENKITX403_KEYPAIR env var)
    #[arg(long, short, env = "OPENKITX403_KEYPAIR")]
    pub keypair: PathBuf,
}

/// Arguments for sign command
#[derive(Args, Debug)]
pub struct SignArgs {
    /// Keypair file
    #[arg(long, short, env = "OPENKITX403_KEYPAIR")]
    pub keypair: PathBuf,

    /// base64url challenge from the WWW-Authenticate header
    #[arg(long)]
    pub challenge: String,

    /// HTTP method of the request being authorized
    #[arg(long, default_value = "GET")]
    pub method: String,

    /// Path of the request being authorized
    #[arg(long)]
    pub path: String,
}

pub(crate) fn load_keypair(path: &Path) -> Result<Keypair> {
    Keypair::read_from_file(path)
        .with_context(|| format!("Failed to load keypair from {}", path.display()))
}

/// Generate a keypair file and print its address
pub fn keygen(args: KeygenArgs) -> Result<()> {
    if args.out.exists() && !args.force {
        return Err(anyhow!(
            "{} already exists (use --force to overwrite)",
            args.out.display()
        ));
    }

    let keypair = Keypair::generate();
    keypair
        .write_to_file(&args.out)
        .with_context(|| format!("Failed to write {}", args.out.display()))?;

    info!("Generated keypair at {}", args.out.display());
    println!("{}", keypair.address());
    Ok(())
}

pub fn address(args: AddressArgs) -> Result<()> {
    let keypair = load_keypair(&args.keypair)?;
    println!("{}", keypair.address());
    Ok(())
}

/// Sign a challenge offline and print the header value
pub fn sign(args: SignArgs) -> Result<()> {
    let client = OpenKit403Client::new(load_keypair(&args.keypair)?);
    let header = client.sign_challenge(&args.challenge, &args.method, &args.path)?;
    println!("{}", header);
    Ok(())
}
