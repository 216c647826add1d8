//! Read-only PostgreSQL client for the dataset registry

use crate::DatasetRegistry;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use uuid::Uuid;
use vecmend_core::{
    config::RegistryConfig,
    error::{Error, Result},
};

pub(crate) struct PostgresRegistry {
    pool: PgPool,
}

impl PostgresRegistry {
    /// Build a lazy pool; connectivity problems surface on the first query.
    pub(crate) fn connect_lazy(config: &RegistryConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(10))
            .connect_lazy(&config.connection_url())
            .map_err(|e| Error::registry(format!("Invalid registry connection settings: {e}")))?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl DatasetRegistry for PostgresRegistry {
    async fn dataset_ids(&self) -> Result<HashSet<String>> {
        let ids: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM datasets")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::registry(format!("Dataset id query failed: {e}")))?;

        Ok(ids.into_iter().map(|id| id.to_string()).collect())
    }

    async fn dataset_names(&self, ids: &[String]) -> Result<HashMap<String, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        // Ids that do not parse as UUIDs cannot match a registry row anyway.
        let uuids: Vec<Uuid> = ids
            .iter()
            .filter_map(|id| Uuid::parse_str(id).ok())
            .collect();
        if uuids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(Uuid, String)> =
            sqlx::query_as("SELECT id, name FROM datasets WHERE id = ANY($1)")
                .bind(&uuids)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| Error::registry(format!("Dataset name query failed: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| (id.to_string(), name))
            .collect())
    }
}
