//! HTTP client for the vector-index service schema API

use crate::VectorIndexStore;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;
use vecmend_core::{
    config::WeaviateConfig,
    error::{Error, Result},
    schema::CollectionSchema,
};

/// Fixed timeout for schema and aggregate requests
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shorter timeout for the readiness probe
const READY_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) struct WeaviateClient {
    http: reqwest::Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct SchemaListing {
    #[serde(default)]
    classes: Vec<CollectionSchema>,
}

impl WeaviateClient {
    pub(crate) fn new(config: &WeaviateConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(api_key) = &config.api_key {
            let value = HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| Error::config(format!("Invalid API key: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::connectivity(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint)
    }
}

#[async_trait]
impl VectorIndexStore for WeaviateClient {
    async fn ready(&self) -> bool {
        let request = self
            .http
            .get(self.url("/v1/.well-known/ready"))
            .timeout(READY_TIMEOUT);
        match request.send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("Readiness probe failed: {e}");
                false
            }
        }
    }

    async fn list_collections(&self) -> Result<Vec<CollectionSchema>> {
        let resp = self
            .http
            .get(self.url("/v1/schema"))
            .send()
            .await
            .map_err(|e| Error::connectivity(format!("Schema listing request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(Error::connectivity(format!(
                "Schema listing returned {}",
                resp.status()
            )));
        }

        let listing: SchemaListing = resp
            .json()
            .await
            .map_err(|e| Error::schema(format!("Malformed schema listing: {e}")))?;
        Ok(listing.classes)
    }

    async fn get_collection(&self, name: &str) -> Result<CollectionSchema> {
        let resp = self
            .http
            .get(self.url(&format!("/v1/schema/{name}")))
            .send()
            .await
            .map_err(|e| Error::connectivity(format!("Schema fetch for {name} failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(Error::connectivity(format!(
                "Schema fetch for {name} returned {}",
                resp.status()
            )));
        }

        resp.json()
            .await
            .map_err(|e| Error::schema(format!("Malformed schema for {name}: {e}")))
    }

    async fn create_collection(&self, schema: &CollectionSchema) -> Result<()> {
        let resp = self
            .http
            .post(self.url("/v1/schema"))
            .json(schema)
            .send()
            .await
            .map_err(|e| {
                Error::connectivity(format!("Create request for {} failed: {e}", schema.class))
            })?;

        let status = resp.status();
        if !status.is_success() {
            // The service reports schema validation problems in the body.
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::connectivity(format!(
                "Create for {} returned {status}: {body}",
                schema.class
            )));
        }
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        let resp = self
            .http
            .delete(self.url(&format!("/v1/schema/{name}")))
            .send()
            .await
            .map_err(|e| Error::connectivity(format!("Delete request for {name} failed: {e}")))?;

        // 200 and 204 both count as deleted.
        if !resp.status().is_success() {
            return Err(Error::connectivity(format!(
                "Delete for {name} returned {}",
                resp.status()
            )));
        }
        Ok(())
    }

    async fn object_count(&self, name: &str) -> u64 {
        let body = json!({
            "query": format!("{{ Aggregate {{ {name} {{ meta {{ count }} }} }} }}")
        });

        let resp = match self.http.post(self.url("/v1/graphql")).json(&body).send().await {
            Ok(resp) => resp,
            Err(e) => {
                debug!("Aggregate count for {name} failed: {e}");
                return 0;
            }
        };
        if !resp.status().is_success() {
            debug!("Aggregate count for {name} returned {}", resp.status());
            return 0;
        }

        match resp.json::<Value>().await {
            Ok(body) => parse_aggregate_count(&body, name).unwrap_or(0),
            Err(e) => {
                debug!("Malformed aggregate response for {name}: {e}");
                0
            }
        }
    }
}

/// Pull `data.Aggregate.<class>[0].meta.count` out of a GraphQL response
fn parse_aggregate_count(body: &Value, class: &str) -> Option<u64> {
    body.get("data")?
        .get("Aggregate")?
        .get(class)?
        .get(0)?
        .get("meta")?
        .get("count")?
        .as_u64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn aggregate_count_is_parsed_from_graphql_shape() {
        let body = json!({
            "data": {
                "Aggregate": {
                    "Vector_index_a_b_c_d_e_Node": [
                        {"meta": {"count": 1234}}
                    ]
                }
            }
        });
        assert_eq!(
            parse_aggregate_count(&body, "Vector_index_a_b_c_d_e_Node"),
            Some(1234)
        );
    }

    #[test]
    fn aggregate_count_is_none_for_other_classes_or_shapes() {
        let body = json!({
            "data": {"Aggregate": {"Other": [{"meta": {"count": 5}}]}}
        });
        assert_eq!(parse_aggregate_count(&body, "Missing"), None);
        assert_eq!(parse_aggregate_count(&json!({"errors": []}), "Missing"), None);
    }

    #[test]
    fn schema_listing_deserializes_classes() {
        let listing: SchemaListing = serde_json::from_value(json!({
            "classes": [
                {"class": "Vector_index_a_b_c_d_e_Node", "vectorIndexConfig": {}},
                {"class": "Article"}
            ]
        }))
        .unwrap();
        assert_eq!(listing.classes.len(), 2);
        assert_eq!(listing.classes[0].class, "Vector_index_a_b_c_d_e_Node");
    }

    #[test]
    fn schema_listing_tolerates_missing_classes_key() {
        let listing: SchemaListing = serde_json::from_value(json!({})).unwrap();
        assert!(listing.classes.is_empty());
    }
}
