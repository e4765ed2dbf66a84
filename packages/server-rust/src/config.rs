//! Command-line and environment configuration.
//!
//! Every flag can also be supplied through a `PLACEMENT_*` environment
//! variable; explicit flags win.

use std::net::SocketAddr;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::network::config::DEFAULT_MAX_BODY_BYTES;
use crate::network::NetworkConfig;
use crate::storage::DatabaseConfig;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Placement tracker HTTP server.
#[derive(Debug, Parser)]
#[command(name = "placement-server", version, about)]
pub struct Cli {
    /// Address to bind.
    #[arg(long, env = "PLACEMENT_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on. 0 picks a free port.
    #[arg(long, env = "PLACEMENT_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Database URI, e.g. `memory://placement`.
    #[arg(long, env = "PLACEMENT_DATABASE_URI", default_value = "memory://placement")]
    pub database_uri: String,

    /// Comma-separated allowed CORS origins; `*` allows any.
    #[arg(long, env = "PLACEMENT_CORS_ORIGINS", value_delimiter = ',', default_value = "*")]
    pub cors_origins: Vec<String>,

    /// Per-request timeout in seconds.
    #[arg(long, env = "PLACEMENT_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Largest accepted JSON request body, in bytes.
    #[arg(long, env = "PLACEMENT_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Serve Prometheus metrics on this address.
    #[arg(long, env = "PLACEMENT_METRICS_ADDR")]
    pub metrics_addr: Option<SocketAddr>,

    /// Log output format.
    #[arg(long, env = "PLACEMENT_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub network: NetworkConfig,
    pub database: DatabaseConfig,
    pub metrics_addr: Option<SocketAddr>,
    pub log_format: LogFormat,
}

impl From<Cli> for ServerConfig {
    fn from(cli: Cli) -> Self {
        Self {
            network: NetworkConfig {
                host: cli.host,
                port: cli.port,
                cors_origins: cli.cors_origins,
                request_timeout: Duration::from_secs(cli.request_timeout_secs),
                max_body_bytes: cli.max_body_bytes,
            },
            database: DatabaseConfig {
                uri: cli.database_uri,
            },
            metrics_addr: cli.metrics_addr,
            log_format: cli.log_format,
        }
    }
}
