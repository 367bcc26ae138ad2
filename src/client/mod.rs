// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Client side of the OpenKitx403 handshake
//!
//! ```no_run
//! use openkitx403::client::{AuthRequest, OpenKit403Client};
//! use openkitx403::crypto::Keypair;
//!
//! # async fn run() -> Result<(), openkitx403::client::ClientError> {
//! let client = OpenKit403Client::new(Keypair::generate());
//! let response = client
//!     .authenticate(AuthRequest::get("http://localhost:3000/protected"))
//!     .await?;
//! println!("{} -> {}", client.address(), response.status());
//! # Ok(())
//! # }
//! ```

#[allow(clippy::module_inception)]
pub mod client;
pub mod config;
pub mod error;

pub use client::{AuthRequest, OpenKit403Client};
pub use config::ClientConfig;
pub use error::ClientError;
