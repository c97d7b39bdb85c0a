//! Terminal rendering of caption and mood results.

use crate::caption::Caption;
use crate::models::{MoodCategory, MoodScoreMap};
use crate::mood::{MoodAnalysis, ScoreSource};
use std::fmt::Write as _;

const BAR_WIDTH: usize = 30;

/// Coarse strength of a single score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    High,
    Medium,
    Low,
}

impl ScoreTier {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => ScoreTier::High,
            60..=79 => ScoreTier::Medium,
            _ => ScoreTier::Low,
        }
    }

    fn marker(&self) -> &'static str {
        match self {
            ScoreTier::High => "●",
            ScoreTier::Medium => "◐",
            ScoreTier::Low => "○",
        }
    }
}

/// One-line reading of the primary mood.
pub fn style_insight(mood: &str, score: u8) -> String {
    match ScoreTier::from_score(score) {
        ScoreTier::High => format!(
            "Your outfit strongly embodies the {} mood! This is a clear style statement.",
            mood
        ),
        ScoreTier::Medium => format!(
            "Your outfit has a {} vibe with some mixed elements. Great balance!",
            mood
        ),
        ScoreTier::Low => format!(
            "Your outfit has a subtle {} influence. Consider adding more elements to strengthen this mood.",
            mood
        ),
    }
}

/// Ranked bar chart; bar length is relative to the highest score.
pub fn render_mood_chart(scores: &MoodScoreMap) -> String {
    let ranked = scores.ranked();
    let max = ranked.first().map(|(_, score)| *score as usize).unwrap_or(0);
    let label_width = ranked.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for (label, score) in ranked {
        let bar = if max == 0 {
            0
        } else {
            score as usize * BAR_WIDTH / max
        };
        let _ = writeln!(
            out,
            "{} {:<width$} {:>3}% {}",
            ScoreTier::from_score(score).marker(),
            label,
            score,
            "█".repeat(bar),
            width = label_width
        );
    }
    out
}

pub fn render_mood_report(analysis: &MoodAnalysis) -> String {
    let mut out = String::from("Mood Analysis Results\n\n");
    out.push_str(&render_mood_chart(&analysis.scores));

    if let Some((mood, score)) = analysis.scores.primary_mood() {
        let _ = writeln!(out, "\nPrimary mood: {} ({}% confidence)", mood, score);
        if let Some(category) = MoodCategory::from_label(mood) {
            let _ = writeln!(out, "{}", category.description());
        }
        let _ = writeln!(out, "{}", style_insight(mood, score));
    }

    match &analysis.source {
        ScoreSource::Model => {}
        ScoreSource::Backfilled(filled) => {
            let names: Vec<&str> = filled.iter().map(|c| c.as_str()).collect();
            let _ = writeln!(out, "\nEstimated (not scored by the model): {}", names.join(", "));
        }
        ScoreSource::Fallback(_) => {
            out.push_str("\nThe AI analysis was unavailable; these scores are an estimate.\n");
        }
    }
    out
}

pub fn render_caption(caption: &Caption) -> String {
    let mut out = format!("{}\n", caption.text);
    if caption.is_fallback() {
        out.push_str("\n(AI caption unavailable; used a template caption.)\n");
    }
    out
}
