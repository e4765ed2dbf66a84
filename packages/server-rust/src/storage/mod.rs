//! Document storage backends for the placement server.
//!
//! - [`MemoryDocumentStore`]: concurrent in-memory store
//! - [`matcher`]: filter, sort, and projection evaluation over JSON documents
//! - [`connect`](connect::connect): opens a store from a database URI

pub mod connect;
pub mod matcher;
pub mod memory;

pub use connect::{connect, DatabaseConfig};
pub use memory::MemoryDocumentStore;
