//! Typed view of vector-index collection schema documents
//!
//! The remote service returns schemas as free-form JSON. This module pins the
//! handful of top-level keys the tool cares about (`class`, `properties`,
//! `vectorConfig`, `vectorIndexConfig`) while carrying every other key
//! untouched, so the Legacy/Current distinction is a total function over a
//! closed set of shapes rather than ad-hoc key traversal.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

/// Fixed prefix of managed collection names
pub const COLLECTION_PREFIX: &str = "Vector_index_";

/// Fixed suffix of managed collection names
pub const COLLECTION_SUFFIX: &str = "_Node";

/// Sentinel rendered for collections whose name cannot be correlated
pub const UNKNOWN_KEY: &str = "unknown";

/// Marker left in property descriptions by the service's auto-schema feature
const AUTO_SCHEMA_MARKER: &str = "auto-schema feature on";

/// Schema dialect of a managed collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    /// Named default vector configuration present (`vectorConfig`)
    Current,
    /// Only the obsolete top-level `vectorIndexConfig` present
    Legacy,
}

/// One property of a collection schema.
///
/// Only `name` and `description` are interpreted; everything else rides along
/// in `rest` and is reproduced verbatim on recreation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertySchema {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl PropertySchema {
    /// Copy of this property with any auto-generated description removed.
    ///
    /// The service re-attaches fresh auto-text on recreation; carrying the old
    /// text forward would accumulate inconsistent commentary across repeated
    /// rebuilds.
    pub fn without_description(&self) -> Self {
        Self {
            name: self.name.clone(),
            description: None,
            rest: self.rest.clone(),
        }
    }
}

/// Immutable snapshot of one collection's schema document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionSchema {
    /// Collection (class) name
    pub class: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertySchema>,

    /// Named vector configuration block, present on current-format schemas
    #[serde(
        rename = "vectorConfig",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub vector_config: Option<Value>,

    /// Obsolete top-level index configuration, present on legacy schemas
    #[serde(
        rename = "vectorIndexConfig",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub vector_index_config: Option<Value>,

    /// Every other top-level key, preserved as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CollectionSchema {
    /// Classify the schema dialect.
    ///
    /// A `vectorConfig` key wins regardless of what else is present. A schema
    /// with neither key has nothing to repair and is grouped with `Current`.
    pub fn format(&self) -> SchemaFormat {
        if self.vector_config.is_none() && self.vector_index_config.is_some() {
            SchemaFormat::Legacy
        } else {
            SchemaFormat::Current
        }
    }

    /// Build the replacement schema used when rebuilding this collection.
    ///
    /// Carries the property list (minus auto-generated descriptions) and
    /// attaches the fixed default vector configuration. Unrecognized
    /// top-level keys from the old document are deliberately dropped; the
    /// service fills them with its own defaults on creation.
    pub fn to_current_format(&self) -> CollectionSchema {
        CollectionSchema {
            class: self.class.clone(),
            properties: self
                .properties
                .iter()
                .map(PropertySchema::without_description)
                .collect(),
            vector_config: Some(default_vector_config()),
            vector_index_config: None,
            extra: Map::new(),
        }
    }

    /// Best-effort creation timestamp recovered from auto-schema property
    /// descriptions. Informational only.
    pub fn created_at(&self) -> Option<String> {
        self.properties.iter().find_map(|prop| {
            prop.description
                .as_deref()?
                .split_once(AUTO_SCHEMA_MARKER)
                .map(|(_, tail)| tail.trim().to_string())
        })
    }
}

/// Whether a collection name matches the managed naming pattern
/// `Vector_index_<id>_Node`.
pub fn is_managed_collection(name: &str) -> bool {
    name.starts_with(COLLECTION_PREFIX) && name.ends_with(COLLECTION_SUFFIX)
}

/// Dataset identifier reconstructed from a managed collection name.
///
/// Collection names encode a dataset UUID with hyphens replaced by
/// underscores at creation time; extraction strips the fixed prefix and
/// suffix and re-joins the first five underscore-delimited segments with
/// hyphens. Names with fewer segments degrade to [`CorrelationKey::Unknown`]
/// instead of failing, so downstream logic treats unresolvable collections
/// uniformly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CorrelationKey {
    Id(String),
    Unknown,
}

impl CorrelationKey {
    /// Derive the key from a collection name. Pure and total.
    pub fn from_collection_name(name: &str) -> Self {
        let stripped = name.strip_prefix(COLLECTION_PREFIX).unwrap_or(name);
        let stripped = stripped.strip_suffix(COLLECTION_SUFFIX).unwrap_or(stripped);

        let segments: Vec<&str> = stripped.split('_').collect();
        if segments.len() >= 5 {
            CorrelationKey::Id(segments[..5].join("-"))
        } else {
            CorrelationKey::Unknown
        }
    }

    /// Dataset id, or `None` for unresolvable names
    pub fn id(&self) -> Option<&str> {
        match self {
            CorrelationKey::Id(id) => Some(id),
            CorrelationKey::Unknown => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CorrelationKey::Id(id) => id,
            CorrelationKey::Unknown => UNKNOWN_KEY,
        }
    }
}

impl fmt::Display for CorrelationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed named default vector configuration attached to rebuilt
/// collections. Index tuning constants are configuration, not inferred from
/// the old schema; vectorization stays external (no built-in vectorizer).
pub fn default_vector_config() -> Value {
    json!({
        "default": {
            "vectorIndexType": "hnsw",
            "vectorIndexConfig": {
                "distance": "cosine",
                "ef": -1,
                "efConstruction": 128,
                "maxConnections": 32,
                "cleanupIntervalSeconds": 300,
                "flatSearchCutoff": 40000
            },
            "vectorizer": {"none": {}}
        }
    })
}
