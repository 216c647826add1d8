#![deny(warnings)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! Storage backends for vecmend
//!
//! Two independent read/write paths: the vector-index service (HTTP+JSON
//! schema API) and the dataset registry (read-only PostgreSQL). Both are
//! exposed as traits so the reconciliation logic can be exercised against
//! the in-memory mocks in [`mock`].

pub mod mock;
mod postgres;
mod weaviate;

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use vecmend_core::{
    config::{RegistryConfig, WeaviateConfig},
    error::Result,
    schema::CollectionSchema,
};

pub use mock::{MockRegistry, MockVectorStore};

// ==== Traits ====

/// Client for the vector-index service schema API
#[async_trait]
pub trait VectorIndexStore: Send + Sync {
    /// Readiness probe; `false` when the service is unreachable
    async fn ready(&self) -> bool;

    /// Full schema listing, in service order
    async fn list_collections(&self) -> Result<Vec<CollectionSchema>>;

    /// Fetch one collection's current schema
    async fn get_collection(&self, name: &str) -> Result<CollectionSchema>;

    /// Create a collection from the given schema
    async fn create_collection(&self, schema: &CollectionSchema) -> Result<()>;

    /// Delete a collection by name
    async fn delete_collection(&self, name: &str) -> Result<()>;

    /// Best-effort approximate object count; `0` when the query fails
    async fn object_count(&self, name: &str) -> u64;
}

/// Read-only view of the dataset registry.
///
/// This tool never creates, updates, or deletes dataset records.
#[async_trait]
pub trait DatasetRegistry: Send + Sync {
    /// The full set of dataset ids
    async fn dataset_ids(&self) -> Result<HashSet<String>>;

    /// Batch lookup of human-readable names for a set of ids.
    ///
    /// The mapping may be partial; missing ids are the report layer's
    /// problem, not this one's.
    async fn dataset_names(&self, ids: &[String]) -> Result<HashMap<String, String>>;
}

// ==== Factories ====

/// Creates the vector-index store client from configuration
pub fn create_vector_store(config: &WeaviateConfig) -> Result<Arc<dyn VectorIndexStore>> {
    Ok(Arc::new(weaviate::WeaviateClient::new(config)?))
}

/// Creates the dataset registry client from configuration.
///
/// The connection pool is lazy: an unreachable store surfaces as a failed
/// query, which callers degrade to an empty result, instead of failing
/// construction.
pub fn create_dataset_registry(config: &RegistryConfig) -> Result<Arc<dyn DatasetRegistry>> {
    Ok(Arc::new(postgres::PostgresRegistry::connect_lazy(config)?))
}
