//! Tolerant parsing of the model's score reply.
//!
//! Models often wrap JSON in a markdown fence, so the reply is cleaned before
//! parsing. Parsed scores are validated strictly; missing categories are
//! backfilled rather than rejected.

use crate::models::{MoodCategory, MoodScoreMap};
use rand::Rng;
use serde_json::Value;
use std::ops::RangeInclusive;
use thiserror::Error;

const JSON_FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

/// Placeholder range for categories the model left out.
pub const BACKFILL_SCORES: RangeInclusive<u8> = 5..=25;

#[derive(Debug, Error)]
pub enum ScoreParseError {
    #[error("response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("expected a JSON object of scores, got {0}")]
    NotAnObject(&'static str),

    #[error("score for '{label}' must be an integer from 0 to 100, got {value}")]
    InvalidScore { label: String, value: Value },
}

/// Strip surrounding whitespace and a ```` ```json ```` ... ```` ``` ```` fence.
pub fn clean_response(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix(JSON_FENCE_OPEN) {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix(FENCE_CLOSE) {
        text = rest;
    }
    text.trim()
}

/// Parse cleaned text as a label to score object.
///
/// Every value must be a whole number in 0..=100; `85.0` counts as 85. One
/// bad value rejects the whole reply. Labels outside the six categories are
/// kept as extras.
pub fn parse_scores(cleaned: &str) -> Result<MoodScoreMap, ScoreParseError> {
    let entries = match serde_json::from_str::<Value>(cleaned)? {
        Value::Object(entries) => entries,
        other => return Err(ScoreParseError::NotAnObject(json_kind(&other))),
    };

    let mut scores = MoodScoreMap::new();
    for (label, value) in entries {
        let score = match score_value(&value) {
            Some(score) => score,
            None => return Err(ScoreParseError::InvalidScore { label, value }),
        };
        scores.insert_label(&label, score);
    }
    Ok(scores)
}

fn score_value(value: &Value) -> Option<u8> {
    if let Some(score) = value.as_u64() {
        return u8::try_from(score).ok().filter(|s| *s <= 100);
    }
    value
        .as_f64()
        .filter(|score| score.fract() == 0.0 && (0.0..=100.0).contains(score))
        .map(|score| score as u8)
}

/// Give every missing category a low placeholder score.
///
/// Returns the categories that were filled, in declaration order.
pub fn backfill_missing<R: Rng + ?Sized>(
    scores: &mut MoodScoreMap,
    rng: &mut R,
) -> Vec<MoodCategory> {
    let missing = scores.missing();
    for category in &missing {
        scores.set(*category, rng.gen_range(BACKFILL_SCORES));
    }
    missing
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
