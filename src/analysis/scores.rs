//! Lighthouse score aggregation.
//!
//! Derives the overall score, qualitative ratings and insight values from
//! the four sub-scores supplied by the analyzer.

use crate::models::LighthouseScores;
use serde::Serialize;
use std::fmt;

/// One of the four Lighthouse categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Performance,
    Accessibility,
    BestPractices,
    Seo,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Performance,
        Metric::Accessibility,
        Metric::BestPractices,
        Metric::Seo,
    ];

    pub fn emoji(&self) -> &'static str {
        match self {
            Metric::Performance => "⚡",
            Metric::Accessibility => "♿",
            Metric::BestPractices => "🛡️",
            Metric::Seo => "🔍",
        }
    }

    /// Reads this metric from a score set, clamped to [0, 100].
    pub fn score(&self, scores: &LighthouseScores) -> u8 {
        let raw = match self {
            Metric::Performance => scores.performance,
            Metric::Accessibility => scores.accessibility,
            Metric::BestPractices => scores.best_practices,
            Metric::Seo => scores.seo,
        };
        raw.min(100)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Performance => write!(f, "Performance"),
            Metric::Accessibility => write!(f, "Accessibility"),
            Metric::BestPractices => write!(f, "Best Practices"),
            Metric::Seo => write!(f, "SEO"),
        }
    }
}

/// Qualitative rating of the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallRating {
    NeedsWork,
    Fair,
    Good,
    Excellent,
}

impl OverallRating {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => OverallRating::Excellent,
            70..=89 => OverallRating::Good,
            50..=69 => OverallRating::Fair,
            _ => OverallRating::NeedsWork,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            OverallRating::Excellent => "🎉",
            OverallRating::Good => "👍",
            OverallRating::Fair => "👌",
            OverallRating::NeedsWork => "👎",
        }
    }
}

impl fmt::Display for OverallRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverallRating::Excellent => write!(f, "Excellent"),
            OverallRating::Good => write!(f, "Good"),
            OverallRating::Fair => write!(f, "Fair"),
            OverallRating::NeedsWork => write!(f, "Needs Work"),
        }
    }
}

/// Coarse color band for a single sub-score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Bad,
    Warn,
    Good,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => ScoreBand::Good,
            50..=89 => ScoreBand::Warn,
            _ => ScoreBand::Bad,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            ScoreBand::Good => "🟢",
            ScoreBand::Warn => "🟡",
            ScoreBand::Bad => "🔴",
        }
    }
}

/// A single metric with its score and band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricScore {
    pub metric: Metric,
    pub score: u8,
    pub band: ScoreBand,
}

/// Everything derived from a score set for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreSummary {
    pub overall: u8,
    pub rating: OverallRating,
    pub best: u8,
    pub worst: u8,
    pub range: u8,
    pub metrics: Vec<MetricScore>,
}

impl ScoreSummary {
    pub fn from_scores(scores: &LighthouseScores) -> Self {
        let metrics: Vec<MetricScore> = Metric::ALL
            .iter()
            .map(|&metric| {
                let score = metric.score(scores);
                MetricScore {
                    metric,
                    score,
                    band: ScoreBand::from_score(score),
                }
            })
            .collect();

        let overall = overall_score(scores);
        let best = metrics.iter().map(|m| m.score).max().unwrap_or(0);
        let worst = metrics.iter().map(|m| m.score).min().unwrap_or(0);

        Self {
            overall,
            rating: OverallRating::from_score(overall),
            best,
            worst,
            range: best - worst,
            metrics,
        }
    }
}

/// Mean of the four sub-scores, rounded half away from zero.
pub fn overall_score(scores: &LighthouseScores) -> u8 {
    let sum: u32 = Metric::ALL
        .iter()
        .map(|m| u32::from(m.score(scores)))
        .sum();
    (f64::from(sum) / Metric::ALL.len() as f64).round() as u8
}
