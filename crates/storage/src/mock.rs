//! In-memory implementations of the storage traits for testing
//!
//! These mocks are deliberately simple: collections live in a `Vec` so the
//! listing order is deterministic, and every call is recorded as an
//! `op:target` string so tests can assert on exactly which operations were
//! issued (or not issued).

use crate::{DatasetRegistry, VectorIndexStore};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use vecmend_core::{
    error::{Error, Result},
    schema::CollectionSchema,
};

/// Programmable in-memory vector-index store
#[derive(Default)]
pub struct MockVectorStore {
    state: Mutex<MockStoreState>,
}

#[derive(Default)]
struct MockStoreState {
    collections: Vec<CollectionSchema>,
    calls: Vec<String>,
    counts: HashMap<String, u64>,
    fail_listing: bool,
    not_ready: bool,
    fail_fetch: HashSet<String>,
    fail_delete: HashSet<String>,
    fail_create: HashSet<String>,
}

impl MockVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a collection; listing order follows insertion order
    pub fn with_collection(self, schema: CollectionSchema) -> Self {
        self.lock().collections.push(schema);
        self
    }

    /// Fix the approximate object count reported for a collection
    pub fn with_object_count(self, name: &str, count: u64) -> Self {
        self.lock().counts.insert(name.to_string(), count);
        self
    }

    /// Make the schema listing fail with a connectivity error
    pub fn failing_listing(self) -> Self {
        self.lock().fail_listing = true;
        self
    }

    /// Make the readiness probe report unreachable
    pub fn not_ready(self) -> Self {
        self.lock().not_ready = true;
        self
    }

    /// Make single-schema fetches for `name` fail
    pub fn failing_fetch(self, name: &str) -> Self {
        self.lock().fail_fetch.insert(name.to_string());
        self
    }

    /// Make deletion of `name` fail
    pub fn failing_delete(self, name: &str) -> Self {
        self.lock().fail_delete.insert(name.to_string());
        self
    }

    /// Make creation of `name` fail
    pub fn failing_create(self, name: &str) -> Self {
        self.lock().fail_create.insert(name.to_string());
        self
    }

    /// Names of all collections currently present, in listing order
    pub fn collection_names(&self) -> Vec<String> {
        self.lock()
            .collections
            .iter()
            .map(|c| c.class.clone())
            .collect()
    }

    /// Snapshot of one collection's schema, if present
    pub fn collection(&self, name: &str) -> Option<CollectionSchema> {
        self.lock()
            .collections
            .iter()
            .find(|c| c.class == name)
            .cloned()
    }

    /// Every call issued against the store, in order
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockStoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl VectorIndexStore for MockVectorStore {
    async fn ready(&self) -> bool {
        !self.lock().not_ready
    }

    async fn list_collections(&self) -> Result<Vec<CollectionSchema>> {
        let mut state = self.lock();
        state.calls.push("list".to_string());
        if state.fail_listing {
            return Err(Error::connectivity("mock: schema listing unavailable"));
        }
        Ok(state.collections.clone())
    }

    async fn get_collection(&self, name: &str) -> Result<CollectionSchema> {
        let mut state = self.lock();
        state.calls.push(format!("get:{name}"));
        if state.fail_fetch.contains(name) {
            return Err(Error::connectivity(format!("mock: fetch failed for {name}")));
        }
        state
            .collections
            .iter()
            .find(|c| c.class == name)
            .cloned()
            .ok_or_else(|| Error::schema(format!("mock: no such collection {name}")))
    }

    async fn create_collection(&self, schema: &CollectionSchema) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(format!("create:{}", schema.class));
        if state.fail_create.contains(&schema.class) {
            return Err(Error::connectivity(format!(
                "mock: create failed for {}",
                schema.class
            )));
        }
        state.collections.push(schema.clone());
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(format!("delete:{name}"));
        if state.fail_delete.contains(name) {
            return Err(Error::connectivity(format!(
                "mock: delete failed for {name}"
            )));
        }
        state.collections.retain(|c| c.class != name);
        Ok(())
    }

    async fn object_count(&self, name: &str) -> u64 {
        let mut state = self.lock();
        state.calls.push(format!("count:{name}"));
        state.counts.get(name).copied().unwrap_or(0)
    }
}

/// In-memory dataset registry
#[derive(Default)]
pub struct MockRegistry {
    ids: HashSet<String>,
    names: HashMap<String, String>,
    unavailable: bool,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a dataset record
    pub fn with_dataset(mut self, id: &str, name: &str) -> Self {
        self.ids.insert(id.to_string());
        self.names.insert(id.to_string(), name.to_string());
        self
    }

    /// Make every query fail, as if the store were unreachable
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }
}

#[async_trait]
impl DatasetRegistry for MockRegistry {
    async fn dataset_ids(&self) -> Result<HashSet<String>> {
        if self.unavailable {
            return Err(Error::registry("mock: registry offline"));
        }
        Ok(self.ids.clone())
    }

    async fn dataset_names(&self, ids: &[String]) -> Result<HashMap<String, String>> {
        if self.unavailable {
            return Err(Error::registry("mock: registry offline"));
        }
        Ok(ids
            .iter()
            .filter_map(|id| self.names.get(id).map(|name| (id.clone(), name.clone())))
            .collect())
    }
}
