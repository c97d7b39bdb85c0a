//! Instagram caption generation
//!
//! Sends the outfit photo and the user's style description to the generation
//! model. Any failure is logged and answered with a canned caption built from
//! the style description, so callers always get something to post.

use crate::ai::GenerationService;
use crate::models::StyleDescription;
use crate::prompts;
use crate::random::SharedRng;
use rand::{Rng, RngCore};
use std::path::Path;
use tracing::{info, warn};

pub const FALLBACK_TEMPLATES: [&str; 5] = [
    "Living my best life in this {{style}} look! ✨ #fashion #style #ootd",
    "Channeling {{style}} vibes today! 💫 #fashionista #styleinspo #ootd",
    "This {{style}} moment is everything! 🔥 #fashion #trending #lookoftheday",
    "Feeling confident in this {{style}} ensemble! 💃 #style #fashion #outfitinspo",
    "Style is a way to say who you are without having to speak. {{style}} edition! ✨ #fashion #lifestyle #style",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptionSource {
    Model,
    /// A template caption was used; carries the failure that triggered it.
    Fallback(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    pub text: String,
    pub source: CaptionSource,
}

impl Caption {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, CaptionSource::Fallback(_))
    }
}

/// Full instruction text: influencer persona followed by the per-photo request.
pub fn caption_instructions(style: &StyleDescription) -> String {
    format!(
        "{}\n\n{}",
        prompts::CAPTION_SYSTEM.trim_end(),
        prompts::render(prompts::CAPTION_USER, &[("style", style.as_str())]).trim_end()
    )
}

/// Pick one of [`FALLBACK_TEMPLATES`] uniformly and fill in the style.
pub fn fallback_caption<R: Rng + ?Sized>(style: &StyleDescription, rng: &mut R) -> String {
    let template = FALLBACK_TEMPLATES[rng.gen_range(0..FALLBACK_TEMPLATES.len())];
    prompts::render(template, &[("style", style.as_str())])
}

pub struct CaptionService {
    generator: Box<dyn GenerationService>,
    model: String,
    rng: SharedRng,
}

impl CaptionService {
    pub fn new(generator: Box<dyn GenerationService>, model: String) -> Self {
        Self {
            generator,
            model,
            rng: SharedRng::from_entropy(),
        }
    }

    /// Replace the random source used to choose fallback templates.
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = SharedRng::new(rng);
        self
    }

    /// Caption the photo at `image_path`. Never fails.
    pub async fn generate_caption(&self, image_path: &Path, style: &StyleDescription) -> Caption {
        info!("Generating caption for style '{}' with {}", style, self.model);

        let instructions = caption_instructions(style);
        let failure = match self
            .generator
            .generate(&[image_path], &instructions, &self.model)
            .await
        {
            Ok(text) if !text.trim().is_empty() => {
                return Caption {
                    text: text.trim().to_string(),
                    source: CaptionSource::Model,
                }
            }
            Ok(_) => "model returned an empty caption".to_string(),
            Err(e) => e.to_string(),
        };

        warn!("Error generating caption, using fallback: {}", failure);
        Caption {
            text: self.rng.with(|rng| fallback_caption(style, rng)),
            source: CaptionSource::Fallback(failure),
        }
    }
}
