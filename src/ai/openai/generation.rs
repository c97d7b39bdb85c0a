use super::client::OpenAiHttpClient;
use super::types::{ChatCompletionRequest, ChatMessage, ChatMessageContent, MessagePart};
use crate::ai::GenerationService;
use crate::image::ImageKind;
use crate::{Error, Result};
use async_trait::async_trait;
use base64::Engine as _;
use std::path::Path;
use std::time::Duration;

const MAX_COMPLETION_TOKENS: u32 = 1000;

/// OpenAI vision implementation of [`GenerationService`].
pub struct OpenAiGenerationClient {
    http: OpenAiHttpClient,
}

impl OpenAiGenerationClient {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, base_url, timeout, reqwest::Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        base_url: String,
        timeout: Duration,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(api_key, base_url, timeout, client),
        }
    }

    async fn image_data_url(path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path).await?;
        let kind = ImageKind::detect(&bytes)?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
        Ok(format!("data:{};base64,{}", kind.mime_type(), encoded))
    }
}

#[async_trait]
impl GenerationService for OpenAiGenerationClient {
    async fn generate(
        &self,
        image_paths: &[&Path],
        instructions: &str,
        model: &str,
    ) -> Result<String> {
        tracing::debug!(
            "Requesting {} description for {} image(s)",
            model,
            image_paths.len()
        );

        let mut parts = vec![MessagePart::text(instructions)];
        for path in image_paths {
            parts.push(MessagePart::image(Self::image_data_url(path).await?));
        }

        let request = ChatCompletionRequest {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Some(ChatMessageContent::Parts(parts)),
            }],
            max_completion_tokens: MAX_COMPLETION_TOKENS,
        };

        let response = self.http.chat_completion(&request).await?;

        response
            .choices
            .first()
            .and_then(|choice| match &choice.message.content {
                Some(ChatMessageContent::Text(text)) => Some(text.clone()),
                _ => None,
            })
            .ok_or_else(|| Error::AiProvider("No response from OpenAI chat API".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::openai::client::CHAT_COMPLETIONS_PATH;
    use crate::image::fixtures::PNG_BYTES;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL: &str = "gpt-4o-mini";

    fn make_client(server: &MockServer) -> OpenAiGenerationClient {
        OpenAiGenerationClient::new(
            "test-key".to_string(),
            server.uri(),
            Duration::from_secs(5),
        )
    }

    fn png_file() -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(PNG_BYTES).unwrap();
        file
    }

    fn completion(content: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        }))
    }

    #[tokio::test]
    async fn test_generate_returns_first_choice_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(CHAT_COMPLETIONS_PATH))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(completion(serde_json::json!("Serving looks ✨ #ootd")))
            .mount(&server)
            .await;

        let image = png_file();
        let text = make_client(&server)
            .generate(&[image.path()], "Write a caption", MODEL)
            .await
            .unwrap();

        assert_eq!(text, "Serving looks ✨ #ootd");
    }

    #[tokio::test]
    async fn test_generate_sends_model_instructions_and_image_data_url() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(CHAT_COMPLETIONS_PATH))
            .and(body_string_contains("\"model\":\"custom-vision\""))
            .and(body_string_contains("Score this outfit"))
            .and(body_string_contains("data:image/png;base64,"))
            .respond_with(completion(serde_json::json!("ok")))
            .expect(1)
            .mount(&server)
            .await;

        let image = png_file();
        make_client(&server)
            .generate(&[image.path()], "Score this outfit", "custom-vision")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_api_error_returns_ai_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(CHAT_COMPLETIONS_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let image = png_file();
        let err = make_client(&server)
            .generate(&[image.path()], "caption", MODEL)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::AiProvider(msg) if msg.contains("401")));
    }

    #[tokio::test]
    async fn test_empty_choices_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(CHAT_COMPLETIONS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": []
            })))
            .mount(&server)
            .await;

        let image = png_file();
        let err = make_client(&server)
            .generate(&[image.path()], "caption", MODEL)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::AiProvider(_)));
    }

    #[tokio::test]
    async fn test_null_content_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(CHAT_COMPLETIONS_PATH))
            .respond_with(completion(serde_json::Value::Null))
            .mount(&server)
            .await;

        let image = png_file();
        let err = make_client(&server)
            .generate(&[image.path()], "caption", MODEL)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::AiProvider(_)));
    }

    #[tokio::test]
    async fn test_malformed_body_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(CHAT_COMPLETIONS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"choices\": ["))
            .mount(&server)
            .await;

        let image = png_file();
        let err = make_client(&server)
            .generate(&[image.path()], "caption", MODEL)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::AiProvider(_)));
    }

    #[tokio::test]
    async fn test_missing_image_file_fails_before_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(CHAT_COMPLETIONS_PATH))
            .respond_with(completion(serde_json::json!("unused")))
            .expect(0)
            .mount(&server)
            .await;

        let missing = Path::new("/nonexistent/outfit.jpg");
        let err = make_client(&server)
            .generate(&[missing], "caption", MODEL)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Io(_)));
    }
}
