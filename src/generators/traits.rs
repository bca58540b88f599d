use crate::error::GenerationError;
use async_trait::async_trait;

/// Output of one generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub content: String,
}

/// Single-turn text generation.
///
/// No conversation state is kept between calls.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn run(&self, instruction: &str) -> Result<Generated, GenerationError>;

    /// Get the model identifier used for generation
    fn model_name(&self) -> &str;
}
