//! # Social Telemetry
//!
//! Logging bootstrap for the social consensus node.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use social_telemetry::{init_tracing, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_tracing(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `social-chain` | Service name in logs |
//! | `SC_LOG_LEVEL` | `info` | Log level filter |
//! | `SC_JSON_LOGS` | `false` | JSON log lines |
//! | `SC_NETWORK` | `main` | Network name |

mod config;
mod logging;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::init_tracing;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("A global subscriber is already installed: {0}")]
    AlreadyInitialized(String),
}

/// Install test logging once per binary; later calls are no-ops.
pub fn init_test_tracing() {
    let _ = init_tracing(&TelemetryConfig::for_tests());
}
