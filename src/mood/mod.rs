//! Outfit mood scoring
//!
//! Asks the generation model to score an outfit photo against the six mood
//! categories. A usable score map is always produced: incomplete replies are
//! backfilled, and failed calls or unparseable replies fall back to locally
//! generated scores.

pub mod fallback;
pub mod parse;

pub use fallback::generate_fallback_scores;
pub use parse::{backfill_missing, clean_response, parse_scores, ScoreParseError};

use crate::ai::GenerationService;
use crate::models::{MoodCategory, MoodScoreMap};
use crate::prompts;
use crate::random::SharedRng;
use rand::RngCore;
use std::path::Path;
use tracing::{info, warn};

/// Why locally generated scores were used instead of the model's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// The generation call itself failed.
    ClientFailure(String),
    /// The reply could not be read as a valid score object.
    ParseFailure(String),
}

/// Where the scores in a [`MoodAnalysis`] came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreSource {
    Model,
    /// Model scores with the listed categories filled with placeholders.
    Backfilled(Vec<MoodCategory>),
    Fallback(FallbackReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodAnalysis {
    pub scores: MoodScoreMap,
    pub source: ScoreSource,
}

impl MoodAnalysis {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, ScoreSource::Fallback(_))
    }
}

pub struct MoodScoreService {
    generator: Box<dyn GenerationService>,
    model: String,
    rng: SharedRng,
}

impl MoodScoreService {
    pub fn new(generator: Box<dyn GenerationService>, model: String) -> Self {
        Self {
            generator,
            model,
            rng: SharedRng::from_entropy(),
        }
    }

    /// Replace the random source used for backfill and fallback scores.
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = SharedRng::new(rng);
        self
    }

    /// Score the outfit in `image_path`. Never fails.
    pub async fn analyze_mood(&self, image_path: &Path) -> MoodAnalysis {
        info!("Analyzing outfit mood with {}", self.model);

        match self
            .generator
            .generate(&[image_path], prompts::MOOD_SYSTEM, &self.model)
            .await
        {
            Ok(raw) => self.score_response(&raw),
            Err(e) => {
                warn!("Mood analysis request failed, using fallback scores: {}", e);
                self.fallback(FallbackReason::ClientFailure(e.to_string()))
            }
        }
    }

    /// Turn a raw model reply into an analysis, falling back if unreadable.
    pub fn score_response(&self, raw: &str) -> MoodAnalysis {
        match parse_scores(clean_response(raw)) {
            Ok(mut scores) => {
                let filled = self.rng.with(|rng| backfill_missing(&mut scores, rng));
                let source = if filled.is_empty() {
                    ScoreSource::Model
                } else {
                    info!("Backfilled mood categories missing from reply: {:?}", filled);
                    ScoreSource::Backfilled(filled)
                };
                MoodAnalysis { scores, source }
            }
            Err(e) => {
                warn!("Could not parse mood scores, using fallback scores: {}", e);
                tracing::debug!("Unparseable mood reply: {}", raw);
                self.fallback(FallbackReason::ParseFailure(e.to_string()))
            }
        }
    }

    fn fallback(&self, reason: FallbackReason) -> MoodAnalysis {
        MoodAnalysis {
            scores: self.rng.with(|rng| generate_fallback_scores(rng)),
            source: ScoreSource::Fallback(reason),
        }
    }
}
