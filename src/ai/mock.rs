use super::GenerationService;
use crate::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// The arguments of the most recent `generate` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub image_paths: Vec<PathBuf>,
    pub instructions: String,
    pub model: String,
}

/// Scripted [`GenerationService`] for tests.
///
/// Outcomes are replayed in order and cycle once exhausted. Clones share
/// state, so a clone kept by the test can observe calls made through the
/// service under test.
#[derive(Clone)]
pub struct MockGenerationClient {
    outcomes: Arc<Mutex<Vec<std::result::Result<String, String>>>>,
    call_count: Arc<Mutex<usize>>,
    last_request: Arc<Mutex<Option<RecordedRequest>>>,
}

impl MockGenerationClient {
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.outcomes.lock().unwrap().push(Ok(response.into()));
        self
    }

    /// Queue a call that fails with [`Error::AiProvider`].
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.outcomes.lock().unwrap().push(Err(message.into()));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

impl Default for MockGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationService for MockGenerationClient {
    async fn generate(
        &self,
        image_paths: &[&Path],
        instructions: &str,
        model: &str,
    ) -> Result<String> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        *self.last_request.lock().unwrap() = Some(RecordedRequest {
            image_paths: image_paths.iter().map(|p| p.to_path_buf()).collect(),
            instructions: instructions.to_string(),
            model: model.to_string(),
        });

        let outcomes = self.outcomes.lock().unwrap();
        if outcomes.is_empty() {
            return Ok(format!("Mock description from {}", model));
        }

        let index = (*count - 1) % outcomes.len();
        outcomes[index].clone().map_err(Error::AiProvider)
    }
}
