//! Placement tracker server: HTTP API over a document store.

pub mod config;
pub mod network;
pub mod storage;
pub mod telemetry;

pub use config::{Cli, LogFormat, ServerConfig};
pub use network::{NetworkConfig, NetworkModule};
pub use storage::{connect, DatabaseConfig, MemoryDocumentStore};
