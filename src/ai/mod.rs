//! Generation client boundary
//!
//! Both the caption and mood services hand one or more image files plus a
//! natural-language instruction to a multimodal model and get free text back.
//! [`GenerationService`] is that seam; OpenAI is the production provider.

pub mod mock;
pub mod openai;

pub use mock::MockGenerationClient;
pub use openai::OpenAiGenerationClient;

use crate::Result;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Describe `image_paths` following `instructions` using `model`.
    async fn generate(&self, image_paths: &[&Path], instructions: &str, model: &str)
        -> Result<String>;
}
