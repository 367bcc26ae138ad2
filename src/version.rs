// Version information for openkitx403

use crate::protocol::{ALGORITHM, PROTOCOL_VERSION, SCHEME};

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-wallet-auth-2026-10-16";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Build date
pub const BUILD_DATE: &str = "2026-10-16";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "ed25519-solana",
    "challenge-response",
    "method-path-binding",
    "user-agent-binding",
    "origin-binding",
    "replay-protection",
    "token-gating",
    "challenge-rate-limiting",
    "axum-middleware",
    "solana-keypair-files",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("openkitx403 {} ({})", VERSION_NUMBER, BUILD_DATE)
}

/// Get full version info for API responses
pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "version": VERSION_NUMBER,
        "build": VERSION,
        "date": BUILD_DATE,
        "scheme": SCHEME,
        "protocol": PROTOCOL_VERSION,
        "algorithm": ALGORITHM,
        "features": FEATURES,
    })
}
