use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Class probabilities produced by a three-way sentiment classifier.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl SentimentDistribution {
    pub fn new(positive: f64, negative: f64, neutral: f64) -> Self {
        Self { positive, negative, neutral }
    }

    /// `P(positive) - P(negative)`, clamped to [-1, 1] and rounded to 4 places.
    pub fn score(&self) -> f64 {
        round_score(self.positive - self.negative)
    }
}

/// Clamps a raw score into [-1, 1] and rounds it to 4 decimal places.
pub fn round_score(raw: f64) -> f64 {
    if raw.is_nan() {
        return 0.0;
    }
    (raw.clamp(-1.0, 1.0) * 10_000.0).round() / 10_000.0
}

#[async_trait]
pub trait SentimentModel: Send + Sync + fmt::Debug {
    /// Short model name for log lines
    fn name(&self) -> &str;

    /// Classify a piece of text into positive/negative/neutral probabilities
    async fn classify(&self, text: &str) -> Result<SentimentDistribution>;

    /// Scalar sentiment in [-1, 1], rounded to 4 decimal places
    async fn score(&self, text: &str) -> Result<f64> {
        Ok(self.classify(text).await?.score())
    }
}
