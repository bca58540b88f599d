use crate::config::Config;
use crate::models::ExtractionResult;
use crate::scrapers::traits::ExtractionClient;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.firecrawl.dev";

/// Firecrawl `/v1/extract` client.
///
/// Extraction runs as a job on Firecrawl's side: we submit once, then follow
/// the job until it settles. A failed job is reported, never resubmitted.
pub struct FirecrawlExtractor {
    client: Client,
    api_key: String,
    base_url: String,
    poll_interval: Duration,
    max_polls: u32,
}

/// Outcome of submitting an extraction job
#[derive(Debug)]
enum Submission {
    Job(String),
    Settled(ExtractionResult),
}

impl FirecrawlExtractor {
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_settings(
            config.firecrawl_api_key.clone(),
            config.firecrawl_base_url.clone(),
            config.http_timeout,
            config.extract_poll_interval,
            config.extract_max_polls,
        )
    }

    pub fn with_settings(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
        poll_interval: Duration,
        max_polls: u32,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            poll_interval,
            max_polls,
        })
    }

    async fn submit(&self, urls: &[String], prompt: &str, schema: &Value) -> Result<Submission> {
        let url = format!("{}/v1/extract", self.base_url);
        debug!(%url, url_count = urls.len(), "Submitting extraction job");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "urls": urls,
                "prompt": prompt,
                "schema": schema,
            }))
            .send()
            .await
            .context("Failed to reach Firecrawl")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(%status, %body, "Firecrawl rejected extraction job");
            anyhow::bail!("Firecrawl returned status: {}", status);
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to read Firecrawl response body")?;

        Ok(submission_from(body))
    }

    async fn poll(&self, job_id: &str) -> Result<ExtractionResult> {
        let url = format!("{}/v1/extract/{}", self.base_url, job_id);

        for attempt in 1..=self.max_polls {
            let response = self
                .client
                .get(&url)
                .bearer_auth(&self.api_key)
                .send()
                .await
                .context("Failed to fetch extraction job status")?;

            if !response.status().is_success() {
                anyhow::bail!("Firecrawl job status returned: {}", response.status());
            }

            let body: Value = response
                .json()
                .await
                .context("Failed to read job status body")?;

            match settle(body) {
                Some(envelope) => {
                    if !envelope.success {
                        warn!(job_id, status = %envelope.status, "Extraction job did not complete");
                    }
                    return Ok(envelope);
                }
                None => {
                    debug!(job_id, attempt, "Extraction job still running");
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }

        warn!(job_id, polls = self.max_polls, "Gave up waiting for extraction job");
        Ok(ExtractionResult::unavailable("timeout"))
    }

    async fn run(&self, urls: &[String], prompt: &str, schema: &Value) -> Result<ExtractionResult> {
        match self.submit(urls, prompt, schema).await? {
            Submission::Settled(envelope) => Ok(envelope),
            Submission::Job(id) => {
                info!(job_id = %id, "Extraction job accepted");
                self.poll(&id).await
            }
        }
    }
}

#[async_trait]
impl ExtractionClient for FirecrawlExtractor {
    async fn extract(&self, urls: &[String], prompt: &str, schema: &Value) -> ExtractionResult {
        if urls.is_empty() {
            warn!("No URLs to extract from");
            return ExtractionResult::unavailable("no-urls");
        }

        match self.run(urls, prompt, schema).await {
            Ok(envelope) => {
                debug!(
                    success = envelope.success,
                    status = %envelope.status,
                    "Extraction finished"
                );
                envelope
            }
            Err(e) => {
                warn!(error = %e, "Extraction unavailable");
                ExtractionResult::unavailable("failed")
            }
        }
    }

    fn source_name(&self) -> &'static str {
        "Firecrawl"
    }
}

/// A submission answered with data has already settled; otherwise the body
/// should carry a job id to follow
fn submission_from(body: Value) -> Submission {
    let job_id = body.get("id").and_then(Value::as_str).map(str::to_string);
    match job_id {
        Some(id) if body.get("data").is_none() => Submission::Job(id),
        _ => Submission::Settled(envelope_from_value(body)),
    }
}

/// The final envelope for a job status body, or `None` while it is running
fn settle(body: Value) -> Option<ExtractionResult> {
    let status = body.get("status").and_then(Value::as_str).unwrap_or_default();

    match status {
        "completed" => Some(envelope_from_value(body)),
        "failed" | "cancelled" => {
            let mut envelope = envelope_from_value(body);
            envelope.success = false;
            Some(envelope)
        }
        _ if body.get("success").and_then(Value::as_bool) == Some(false) => {
            Some(envelope_from_value(body))
        }
        _ => None,
    }
}

/// Read an envelope leniently: missing or mistyped keys fall back to "no data"
pub(crate) fn envelope_from_value(body: Value) -> ExtractionResult {
    let success = body.get("success").and_then(Value::as_bool).unwrap_or(false);
    let status = body
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let expires_at = body
        .get("expiresAt")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|d| d.with_timezone(&Utc));
    let data = match body {
        Value::Object(mut map) => map.remove("data").unwrap_or(Value::Null),
        _ => Value::Null,
    };

    ExtractionResult {
        success,
        data,
        status,
        expires_at,
    }
}
