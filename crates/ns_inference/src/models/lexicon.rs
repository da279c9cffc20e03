//! Rule-based fallback that needs no network access.
//!
//! Positive and negative evidence from a financial word list become logits
//! for a three-way softmax next to a fixed neutral prior, so the output has
//! the same shape as a real classifier's.

use std::collections::{HashMap, HashSet};
use std::fmt;

use async_trait::async_trait;
use ns_core::{Result, SentimentDistribution, SentimentModel};

const NEUTRAL_PRIOR: f64 = 1.0;

const POSITIVE: &[(&str, f64)] = &[
    ("bullish", 0.8),
    ("surge", 0.7),
    ("rally", 0.7),
    ("soar", 0.8),
    ("jump", 0.6),
    ("gain", 0.5),
    ("profit", 0.6),
    ("growth", 0.6),
    ("rise", 0.5),
    ("increase", 0.5),
    ("improve", 0.5),
    ("outperform", 0.7),
    ("beat", 0.6),
    ("exceed", 0.6),
    ("strong", 0.5),
    ("positive", 0.5),
    ("optimistic", 0.6),
    ("record", 0.6),
    ("upgrade", 0.6),
    ("buy", 0.5),
    ("recovery", 0.5),
    ("rebound", 0.5),
    ("boost", 0.5),
];

const NEGATIVE: &[(&str, f64)] = &[
    ("bearish", 0.8),
    ("crash", 0.9),
    ("plunge", 0.8),
    ("slide", 0.6),
    ("drop", 0.6),
    ("fall", 0.5),
    ("decline", 0.6),
    ("loss", 0.6),
    ("weak", 0.5),
    ("negative", 0.5),
    ("pessimistic", 0.6),
    ("concern", 0.5),
    ("worry", 0.5),
    ("fear", 0.6),
    ("uncertainty", 0.5),
    ("miss", 0.6),
    ("disappoint", 0.7),
    ("underperform", 0.6),
    ("downgrade", 0.6),
    ("sell", 0.5),
    ("cut", 0.5),
    ("layoff", 0.6),
    ("crisis", 0.8),
    ("warning", 0.5),
    ("lawsuit", 0.6),
    ("fraud", 0.9),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "without", "cannot", "can't", "don't", "doesn't",
    "didn't", "won't", "isn't", "aren't", "wasn't", "hardly",
];

/// Financial word-list classifier.
pub struct LexiconModel {
    words: HashMap<&'static str, f64>,
    negations: HashSet<&'static str>,
}

impl fmt::Debug for LexiconModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LexiconModel")
            .field("words", &self.words.len())
            .finish()
    }
}

impl Default for LexiconModel {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconModel {
    pub fn new() -> Self {
        let words = POSITIVE
            .iter()
            .copied()
            .chain(NEGATIVE.iter().map(|&(w, s)| (w, -s)))
            .collect();
        Self {
            words,
            negations: NEGATIONS.iter().copied().collect(),
        }
    }

    /// Looks a token up as written, then with common inflections removed.
    fn weight(&self, token: &str) -> Option<f64> {
        if let Some(&w) = self.words.get(token) {
            return Some(w);
        }
        ["ing", "ed", "es", "s", "d"]
            .iter()
            .filter_map(|suffix| token.strip_suffix(suffix))
            .find_map(|stem| self.words.get(stem).copied())
    }

    /// Sums (positive, negative) evidence; a negation flips the next hit.
    fn evidence(&self, text: &str) -> (f64, f64) {
        let lowered = text.to_lowercase();
        let tokens = lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|t| !t.is_empty());

        let mut positive = 0.0;
        let mut negative = 0.0;
        let mut negate = false;
        for token in tokens {
            if self.negations.contains(token) {
                negate = true;
                continue;
            }
            if let Some(mut w) = self.weight(token) {
                if negate {
                    w = -w;
                    negate = false;
                }
                if w > 0.0 {
                    positive += w;
                } else {
                    negative -= w;
                }
            }
        }
        (positive, negative)
    }
}

fn softmax3(a: f64, b: f64, c: f64) -> (f64, f64, f64) {
    let max = a.max(b).max(c);
    let (ea, eb, ec) = ((a - max).exp(), (b - max).exp(), (c - max).exp());
    let sum = ea + eb + ec;
    (ea / sum, eb / sum, ec / sum)
}

#[async_trait]
impl SentimentModel for LexiconModel {
    fn name(&self) -> &str {
        "lexicon"
    }

    async fn classify(&self, text: &str) -> Result<SentimentDistribution> {
        let (positive, negative) = self.evidence(text);
        let (p, n, u) = softmax3(positive, negative, NEUTRAL_PRIOR);
        Ok(SentimentDistribution::new(p, n, u))
    }
}
