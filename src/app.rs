//! Application wiring for the caption and mood tools.

use crate::ai::{GenerationService, OpenAiGenerationClient};
use crate::caption::{Caption, CaptionService};
use crate::image::StagedImage;
use crate::models::{Config, StyleDescription};
use crate::mood::{MoodAnalysis, MoodScoreService};
use crate::Result;
use tracing::info;

/// Holds both services and stages uploaded images for them.
pub struct App {
    captions: CaptionService,
    moods: MoodScoreService,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub captions: CaptionService,
    pub moods: MoodScoreService,
}

impl App {
    pub fn with_services(services: AppServices) -> Self {
        Self {
            captions: services.captions,
            moods: services.moods,
        }
    }

    /// Build OpenAI-backed services from explicit configuration.
    pub fn from_config(config: &Config) -> Self {
        // Reuse one HTTP connection pool across both services.
        let http_client = reqwest::Client::new();
        let client = || -> Box<dyn GenerationService> {
            Box::new(OpenAiGenerationClient::new_with_client(
                config.openai_api_key.clone(),
                config.openai_base_url.clone(),
                config.request_timeout,
                http_client.clone(),
            ))
        };

        info!("Caption model: {}", config.caption_model);
        info!("Mood model: {}", config.mood_model);

        Self::with_services(AppServices {
            captions: CaptionService::new(client(), config.caption_model.clone()),
            moods: MoodScoreService::new(client(), config.mood_model.clone()),
        })
    }

    /// Construct an app from environment configuration (`Config::from_env`).
    pub fn new() -> Result<Self> {
        let config = Config::from_env()?;
        Ok(Self::from_config(&config))
    }

    /// Caption an uploaded image.
    ///
    /// Errors only for a blank style description or an unusable upload; model
    /// failures are absorbed by the caption fallback.
    pub async fn caption(&self, image: Vec<u8>, style: &str) -> Result<Caption> {
        let style = StyleDescription::new(style)?;
        let staged = StagedImage::stage(image).await?;
        Ok(self.captions.generate_caption(staged.path(), &style).await)
    }

    /// Score the mood of an uploaded outfit image.
    pub async fn mood(&self, image: Vec<u8>) -> Result<MoodAnalysis> {
        let staged = StagedImage::stage(image).await?;
        Ok(self.moods.analyze_mood(staged.path()).await)
    }
}
