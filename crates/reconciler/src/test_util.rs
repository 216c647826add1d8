//! Shared schema builders for unit tests

use vecmend_core::schema::CollectionSchema;

pub(crate) fn legacy_schema(name: &str) -> CollectionSchema {
    serde_json::from_value(serde_json::json!({
        "class": name,
        "vectorIndexConfig": {"distance": "cosine"},
        "properties": [
            {
                "name": "text",
                "dataType": ["text"],
                "description": "This property was generated by Weaviate's auto-schema feature on Mon Oct  2 10:00:00 2023"
            },
            {"name": "doc_id", "dataType": ["text"]}
        ]
    }))
    .expect("legacy test schema")
}

pub(crate) fn current_schema(name: &str) -> CollectionSchema {
    serde_json::from_value(serde_json::json!({
        "class": name,
        "vectorConfig": {"default": {"vectorIndexType": "hnsw"}},
        "properties": [{"name": "text", "dataType": ["text"]}]
    }))
    .expect("current test schema")
}

pub(crate) fn plain_schema(name: &str) -> CollectionSchema {
    serde_json::from_value(serde_json::json!({"class": name})).expect("plain test schema")
}
