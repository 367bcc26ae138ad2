// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod keys;
pub mod request;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// OpenKitx403 wallet authentication CLI
#[derive(Parser, Debug)]
#[command(name = "openkitx403-cli")]
#[command(version)]
#[command(about = "Wallet keypair and authenticated request tools for OpenKitx403", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a new Solana keypair file
    Keygen(keys::KeygenArgs),

    /// Print the wallet address of a keypair file
    Address(keys::AddressArgs),

    /// Answer a challenge and print the Authorization header
    Sign(keys::SignArgs),

    /// Perform a wallet-authenticated HTTP request
    Request(request::RequestArgs),
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Keygen(args) => keys::keygen(args),
        Commands::Address(args) => keys::address(args),
        Commands::Sign(args) => keys::sign(args),
        Commands::Request(args) => request::request(args).await,
    }
}
