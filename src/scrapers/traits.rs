use crate::models::ExtractionResult;
use async_trait::async_trait;

/// Common trait for structured-extraction backends.
///
/// Implementations make a single attempt and never return an error: any
/// failure is reported as an envelope with `success == false`.
#[async_trait]
pub trait ExtractionClient: Send + Sync {
    /// Extract schema-shaped data from `urls` following `prompt`
    async fn extract(
        &self,
        urls: &[String],
        prompt: &str,
        schema: &serde_json::Value,
    ) -> ExtractionResult;

    /// Get the name of the extraction backend
    fn source_name(&self) -> &'static str;
}
