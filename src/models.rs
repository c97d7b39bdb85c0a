//! Data models and structures
//!
//! Defines the mood categories and score maps produced by mood analysis, the
//! validated style description used for captions, and runtime configuration.

use crate::{Error, Result};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Fixed set of outfit mood labels, in declaration order.
///
/// The derived `Ord` follows declaration order, which is also the tie-break
/// order used when ranking scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum MoodCategory {
    Fierce,
    Minimalist,
    Whimsical,
    Elegant,
    Casual,
    Romantic,
}

impl MoodCategory {
    pub const ALL: [MoodCategory; 6] = [
        MoodCategory::Fierce,
        MoodCategory::Minimalist,
        MoodCategory::Whimsical,
        MoodCategory::Elegant,
        MoodCategory::Casual,
        MoodCategory::Romantic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MoodCategory::Fierce => "Fierce",
            MoodCategory::Minimalist => "Minimalist",
            MoodCategory::Whimsical => "Whimsical",
            MoodCategory::Elegant => "Elegant",
            MoodCategory::Casual => "Casual",
            MoodCategory::Romantic => "Romantic",
        }
    }

    /// Exact, case-sensitive lookup by label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }

    /// Short description shown alongside results.
    pub fn description(&self) -> &'static str {
        match self {
            MoodCategory::Fierce => "Bold, confident, statement-making",
            MoodCategory::Minimalist => "Clean, simple, understated elegance",
            MoodCategory::Whimsical => "Playful, creative, artistic",
            MoodCategory::Elegant => "Sophisticated, refined, classic",
            MoodCategory::Casual => "Relaxed, comfortable, everyday",
            MoodCategory::Romantic => "Soft, feminine, dreamy",
        }
    }
}

impl fmt::Display for MoodCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mood label to confidence score (0-100).
///
/// The six [`MoodCategory`] entries are kept separately from any extra labels a
/// model may return. Extras are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoodScoreMap {
    scores: BTreeMap<MoodCategory, u8>,
    extra: BTreeMap<String, u8>,
}

impl MoodScoreMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: MoodCategory) -> Option<u8> {
        self.scores.get(&category).copied()
    }

    pub fn set(&mut self, category: MoodCategory, score: u8) {
        self.scores.insert(category, score);
    }

    /// Insert by label, routing known category names to their typed slot.
    pub fn insert_label(&mut self, label: &str, score: u8) {
        match MoodCategory::from_label(label) {
            Some(category) => self.set(category, score),
            None => {
                self.extra.insert(label.to_string(), score);
            }
        }
    }

    pub fn get_label(&self, label: &str) -> Option<u8> {
        match MoodCategory::from_label(label) {
            Some(category) => self.get(category),
            None => self.extra.get(label).copied(),
        }
    }

    /// Required categories with no score yet, in declaration order.
    pub fn missing(&self) -> Vec<MoodCategory> {
        MoodCategory::ALL
            .into_iter()
            .filter(|c| !self.scores.contains_key(c))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.scores.len() == MoodCategory::ALL.len()
    }

    pub fn len(&self) -> usize {
        self.scores.len() + self.extra.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn extras(&self) -> impl Iterator<Item = (&str, u8)> {
        self.extra.iter().map(|(label, score)| (label.as_str(), *score))
    }

    /// All entries: categories in declaration order, then extras by label.
    pub fn entries(&self) -> impl Iterator<Item = (&str, u8)> {
        self.scores
            .iter()
            .map(|(category, score)| (category.as_str(), *score))
            .chain(self.extras())
    }

    /// Entries sorted by score, highest first. Ties keep [`Self::entries`] order.
    pub fn ranked(&self) -> Vec<(&str, u8)> {
        let mut ranked: Vec<(&str, u8)> = self.entries().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// Highest-scoring entry; the first in declaration order wins a tie.
    pub fn primary_mood(&self) -> Option<(&str, u8)> {
        self.ranked().into_iter().next()
    }
}

impl Serialize for MoodScoreMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (label, score) in self.entries() {
            map.serialize_entry(label, &score)?;
        }
        map.end()
    }
}

/// User-supplied style or mood text for a caption. Never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDescription(String);

impl StyleDescription {
    pub fn new(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidInput(
                "Please enter a style description to generate a caption".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StyleDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Configuration
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub caption_model: String,
    pub mood_model: String,
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from the process environment (and `.env` if present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let openai_api_key = non_blank("OPENAI_API_KEY").ok_or_else(|| {
            Error::Config(
                "OPENAI_API_KEY not found in environment variables. Set it in your .env file or environment."
                    .to_string(),
            )
        })?;

        let request_timeout = match non_blank("REQUEST_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(Error::Config(format!(
                        "REQUEST_TIMEOUT_SECS must be a positive integer, got '{}'",
                        raw
                    )))
                }
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            openai_api_key,
            openai_base_url: non_blank("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            caption_model: non_blank("CAPTION_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            mood_model: non_blank("MOOD_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            request_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_category_serialization_uses_label() {
        let json = serde_json::to_string(&MoodCategory::Whimsical).unwrap();
        assert_eq!(json, "\"Whimsical\"");
    }

    #[test]
    fn test_from_label_is_case_sensitive() {
        assert_eq!(MoodCategory::from_label("Elegant"), Some(MoodCategory::Elegant));
        assert_eq!(MoodCategory::from_label("elegant"), None);
    }

    #[test]
    fn test_insert_label_routes_extras() {
        let mut map = MoodScoreMap::new();
        map.insert_label("Fierce", 80);
        map.insert_label("Edgy", 40);

        assert_eq!(map.get(MoodCategory::Fierce), Some(80));
        assert_eq!(map.get_label("Edgy"), Some(40));
        assert_eq!(map.len(), 2);
        assert_eq!(map.missing().len(), 5);
        assert!(!map.is_complete());
    }

    #[test]
    fn test_primary_mood_tie_breaks_by_declaration_order() {
        let mut map = MoodScoreMap::new();
        map.set(MoodCategory::Romantic, 70);
        map.set(MoodCategory::Minimalist, 70);
        map.set(MoodCategory::Casual, 10);

        assert_eq!(map.primary_mood(), Some(("Minimalist", 70)));
    }

    #[test]
    fn test_ranked_orders_highest_first() {
        let mut map = MoodScoreMap::new();
        map.set(MoodCategory::Fierce, 20);
        map.set(MoodCategory::Elegant, 90);
        map.insert_label("Grunge", 50);

        assert_eq!(
            map.ranked(),
            vec![("Elegant", 90), ("Grunge", 50), ("Fierce", 20)]
        );
    }

    #[test]
    fn test_primary_mood_of_empty_map() {
        assert_eq!(MoodScoreMap::new().primary_mood(), None);
    }

    #[test]
    fn test_score_map_serializes_flat_in_declaration_order() {
        let mut map = MoodScoreMap::new();
        map.set(MoodCategory::Romantic, 10);
        map.set(MoodCategory::Fierce, 85);
        map.insert_label("Edgy", 5);

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"Fierce":85,"Romantic":10,"Edgy":5}"#);
    }

    #[test]
    fn test_style_description_trims_and_rejects_blank() {
        let style = StyleDescription::new("  bohemian chic ").unwrap();
        assert_eq!(style.as_str(), "bohemian chic");

        let err = StyleDescription::new("   ").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_config_requires_api_key() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("OPENAI_API_KEY")));

        let err = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-test")])).unwrap();

        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.openai_base_url, DEFAULT_OPENAI_BASE_URL);
        assert_eq!(config.caption_model, DEFAULT_MODEL);
        assert_eq!(config.mood_model, DEFAULT_MODEL);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:8080/"),
            ("CAPTION_MODEL", "gpt-4o"),
            ("MOOD_MODEL", "gpt-4.1-mini"),
            ("REQUEST_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.openai_base_url, "http://localhost:8080");
        assert_eq!(config.caption_model, "gpt-4o");
        assert_eq!(config.mood_model, "gpt-4.1-mini");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_config_rejects_bad_timeout() {
        for raw in ["0", "soon", "-3"] {
            let err = Config::from_lookup(lookup_from(&[
                ("OPENAI_API_KEY", "sk-test"),
                ("REQUEST_TIMEOUT_SECS", raw),
            ]))
            .unwrap_err();
            assert!(matches!(err, Error::Config(_)));
        }
    }
}
