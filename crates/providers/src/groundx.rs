//! GroundX retrieval-index adapter.
//!
//! Maps the four `IndexClient` operations onto the GroundX REST API:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | `search` | `POST {base}/v1/search/{bucketId}` |
//! | `ingest` | `POST {base}/v1/ingest/documents/remote` |
//! | `list_buckets` | `GET {base}/v1/bucket` |
//! | `create_bucket` | `POST {base}/v1/bucket` |
//!
//! GroundX wire shapes (`searchData`, `suggestedText`, `bucketId`, ...) are
//! private to this module.

use async_trait::async_trait;
use groundrag_config::GroundXConfig;
use groundrag_core::error::IndexError;
use groundrag_core::index::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Client for the GroundX REST API.
pub struct GroundXClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GroundXClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    pub fn from_config(config: &GroundXConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            config.api_url.clone(),
            config.api_key.clone().unwrap_or_default(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path)
    }

    /// Send a request and decode a JSON body, classifying every failure.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, IndexError> {
        let response = request
            .header("X-API-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| IndexError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| IndexError::Network(e.to_string()))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), body = %body, "GroundX returned error");
            return Err(IndexError::Api {
                status_code: status.as_u16(),
                message: body,
            });
        }

        serde_json::from_str(&body).map_err(|e| IndexError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl IndexClient for GroundXClient {
    fn name(&self) -> &str {
        "groundx"
    }

    async fn search(&self, bucket: BucketId, query: &str) -> Result<SearchResponse, IndexError> {
        debug!(bucket = %bucket, query_len = query.len(), "Searching bucket");
        let request = self
            .client
            .post(self.url(&format!("search/{bucket}")))
            .json(&serde_json::json!({ "query": query }));

        let envelope: SearchEnvelope = self.send_json(request).await?;
        Ok(envelope.search.into())
    }

    async fn ingest(
        &self,
        bucket: BucketId,
        file: &FileDescriptor,
    ) -> Result<IngestResponse, IndexError> {
        debug!(bucket = %bucket, file = %file.file_name, "Ingesting remote document");
        let body = IngestRequest {
            documents: vec![RemoteDocument {
                bucket_id: bucket.0,
                file_name: &file.file_name,
                file_type: &file.file_type,
                source_url: &file.source_url,
                search_data: &file.metadata,
            }],
        };
        let request = self
            .client
            .post(self.url("ingest/documents/remote"))
            .json(&body);

        let envelope: IngestEnvelope = self.send_json(request).await?;
        Ok(IngestResponse {
            status: envelope
                .ingest
                .status
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "unknown".into()),
            process_id: envelope.ingest.process_id,
        })
    }

    async fn list_buckets(&self) -> Result<Vec<Bucket>, IndexError> {
        let request = self.client.get(self.url("bucket"));
        let envelope: BucketListEnvelope = self.send_json(request).await?;
        Ok(envelope.buckets.into_iter().map(Bucket::from).collect())
    }

    async fn create_bucket(&self, name: &str) -> Result<Bucket, IndexError> {
        let request = self
            .client
            .post(self.url("bucket"))
            .json(&serde_json::json!({ "name": name }));
        let envelope: BucketEnvelope = self.send_json(request).await?;
        Ok(envelope.bucket.into())
    }
}

// --- GroundX API types (internal) ---

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    search: ApiSearch,
}

#[derive(Debug, Deserialize)]
struct ApiSearch {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    results: Vec<ApiSearchResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSearchResult {
    #[serde(default)]
    score: f64,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    suggested_text: Option<String>,
    #[serde(default)]
    search_data: Option<serde_json::Map<String, serde_json::Value>>,
}

impl From<ApiSearch> for SearchResponse {
    fn from(api: ApiSearch) -> Self {
        SearchResponse {
            text: api.text,
            results: api
                .results
                .into_iter()
                .map(|r| SearchResult {
                    score: r.score,
                    text: r.text.unwrap_or_default(),
                    suggested_text: r.suggested_text,
                    metadata: r.search_data.unwrap_or_default(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct IngestRequest<'a> {
    documents: Vec<RemoteDocument<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RemoteDocument<'a> {
    bucket_id: u64,
    file_name: &'a str,
    file_type: &'a str,
    source_url: &'a str,
    search_data: &'a serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct IngestEnvelope {
    ingest: ApiIngest,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiIngest {
    #[serde(default)]
    process_id: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BucketListEnvelope {
    #[serde(default)]
    buckets: Vec<ApiBucket>,
}

#[derive(Debug, Deserialize)]
struct BucketEnvelope {
    bucket: ApiBucket,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiBucket {
    bucket_id: u64,
    name: String,
}

impl From<ApiBucket> for Bucket {
    fn from(api: ApiBucket) -> Self {
        Bucket {
            id: BucketId(api.bucket_id),
            name: api.name,
        }
    }
}
