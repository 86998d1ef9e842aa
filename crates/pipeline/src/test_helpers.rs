//! Scripted index and provider fakes for pipeline tests.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use groundrag_core::error::{AnswerFailure, IndexError};
use groundrag_core::index::{
    Bucket, BucketId, FileDescriptor, IndexClient, IngestResponse, SearchResponse,
};
use groundrag_core::message::Turn;
use groundrag_core::provider::Provider;

/// An index whose answers are queued up front. Every call is recorded.
#[derive(Default)]
pub struct ScriptedIndex {
    searches: Mutex<VecDeque<Result<SearchResponse, IndexError>>>,
    buckets: Mutex<Vec<Bucket>>,
    failing_urls: HashSet<String>,
    fail_listing: bool,
    fail_creation: bool,
    pub queries: Mutex<Vec<(BucketId, String)>>,
    pub ingested: Mutex<Vec<(BucketId, FileDescriptor)>>,
    pub created: Mutex<Vec<String>>,
}

impl ScriptedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(self, response: Result<SearchResponse, IndexError>) -> Self {
        self.searches.lock().unwrap().push_back(response);
        self
    }

    pub fn with_bucket(self, id: u64, name: &str) -> Self {
        self.buckets.lock().unwrap().push(Bucket {
            id: BucketId(id),
            name: name.into(),
        });
        self
    }

    pub fn failing_ingest_for(mut self, url: &str) -> Self {
        self.failing_urls.insert(url.into());
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn failing_creation(mut self) -> Self {
        self.fail_creation = true;
        self
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl IndexClient for ScriptedIndex {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn search(&self, bucket: BucketId, query: &str) -> Result<SearchResponse, IndexError> {
        self.queries.lock().unwrap().push((bucket, query.to_string()));
        self.searches
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(SearchResponse::default()))
    }

    async fn ingest(
        &self,
        bucket: BucketId,
        file: &FileDescriptor,
    ) -> Result<IngestResponse, IndexError> {
        self.ingested.lock().unwrap().push((bucket, file.clone()));
        if self.failing_urls.contains(&file.source_url) {
            return Err(IndexError::Api {
                status_code: 422,
                message: "unsupported content".into(),
            });
        }
        Ok(IngestResponse {
            status: "queued".into(),
            process_id: Some(format!("proc-{}", self.ingested.lock().unwrap().len())),
        })
    }

    async fn list_buckets(&self) -> Result<Vec<Bucket>, IndexError> {
        if self.fail_listing {
            return Err(IndexError::Network("connection refused".into()));
        }
        Ok(self.buckets.lock().unwrap().clone())
    }

    async fn create_bucket(&self, name: &str) -> Result<Bucket, IndexError> {
        self.created.lock().unwrap().push(name.to_string());
        if self.fail_creation {
            return Err(IndexError::Api {
                status_code: 403,
                message: "forbidden".into(),
            });
        }
        let bucket = Bucket {
            id: BucketId(900 + self.created.lock().unwrap().len() as u64),
            name: name.into(),
        };
        self.buckets.lock().unwrap().push(bucket.clone());
        Ok(bucket)
    }
}

/// A provider that replays queued answers and records every turn it sees.
#[derive(Default)]
pub struct ScriptedProvider {
    answers: Mutex<VecDeque<Result<String, AnswerFailure>>>,
    pub turns: Mutex<Vec<Turn>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answer(self, answer: &str) -> Self {
        self.answers.lock().unwrap().push_back(Ok(answer.into()));
        self
    }

    pub fn with_failure(self, failure: AnswerFailure) -> Self {
        self.answers.lock().unwrap().push_back(Err(failure));
        self
    }

    pub fn call_count(&self) -> usize {
        self.turns.lock().unwrap().len()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, turn: &Turn) -> Result<String, AnswerFailure> {
        self.turns.lock().unwrap().push(turn.clone());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("I don't know.".into()))
    }
}
