//! Mock extraction and generation backends.
//!
//! Both record every call so tests can assert on what the pipeline sent
//! without touching the network.

use crate::error::GenerationError;
use crate::generators::{Generated, TextGenerator};
use crate::models::{ExtractionResult, LocationTrend, PropertyRecord};
use crate::scrapers::ExtractionClient;
use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex};

/// Arguments captured from an extract call
#[derive(Debug, Clone)]
pub struct ExtractCall {
    pub urls: Vec<String>,
    pub prompt: String,
    pub schema: serde_json::Value,
}

/// Extraction backend that replays queued envelopes.
///
/// Once the queue is empty every call reports an unavailable extraction.
#[derive(Clone, Default)]
pub struct MockExtractor {
    results: Arc<Mutex<Vec<ExtractionResult>>>,
    calls: Arc<Mutex<Vec<ExtractCall>>>,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_result(self, result: ExtractionResult) -> Self {
        self.results.lock().unwrap().push(result);
        self
    }

    /// Queue a successful listing extraction
    pub fn with_properties(self, properties: &[PropertyRecord]) -> Self {
        self.with_result(ExtractionResult::completed(json!({ "properties": properties })))
    }

    /// Queue a successful trend extraction
    pub fn with_trends(self, trends: &[LocationTrend]) -> Self {
        self.with_result(ExtractionResult::completed(json!({ "locations": trends })))
    }

    /// Queue a failed extraction
    pub fn with_failure(self) -> Self {
        self.with_result(ExtractionResult::unavailable("failed"))
    }

    pub fn calls(&self) -> Vec<ExtractCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ExtractionClient for MockExtractor {
    async fn extract(
        &self,
        urls: &[String],
        prompt: &str,
        schema: &serde_json::Value,
    ) -> ExtractionResult {
        self.calls.lock().unwrap().push(ExtractCall {
            urls: urls.to_vec(),
            prompt: prompt.to_string(),
            schema: schema.clone(),
        });

        let mut results = self.results.lock().unwrap();
        if results.is_empty() {
            ExtractionResult::unavailable("failed")
        } else {
            results.remove(0)
        }
    }

    fn source_name(&self) -> &'static str {
        "Mock"
    }
}

/// Text generator that replays queued responses and records instructions
#[derive(Clone, Default)]
pub struct MockGenerator {
    responses: Arc<Mutex<Vec<String>>>,
    calls: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text response to the queue
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(response.into());
        self
    }

    /// Make every call fail as if the model endpoint were down
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Get all instructions that were sent
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_instruction(&self) -> Option<String> {
        self.calls.lock().unwrap().last().cloned()
    }

    /// Check if an instruction containing the given text was sent
    pub fn was_called_with(&self, text: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|c| c.contains(text))
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn run(&self, instruction: &str) -> Result<Generated, GenerationError> {
        self.calls.lock().unwrap().push(instruction.to_string());

        if self.fail {
            return Err(GenerationError::Network("mock generator is down".to_string()));
        }

        let mut responses = self.responses.lock().unwrap();
        let content = if responses.is_empty() {
            "Mock narrative".to_string()
        } else {
            responses.remove(0)
        };

        Ok(Generated { content })
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
