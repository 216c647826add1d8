//! Core types for the vecmend reconciliation tool
//!
//! This crate provides the foundational pieces shared by the storage and
//! reconciler crates:
//!
//! - **Schema**: typed view of collection schema documents, the
//!   Legacy/Current classifier, and correlation-key extraction
//! - **Configuration**: environment-backed configuration built once at startup
//! - **Error handling**: unified error types
//!

pub mod config;
pub mod error;
pub mod schema;

// Re-export main types for convenience
pub use config::{Config, RegistryConfig, WeaviateConfig};
pub use error::{Error, Result};
pub use schema::{
    is_managed_collection, CollectionSchema, CorrelationKey, PropertySchema, SchemaFormat,
};

/// Version of the core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
