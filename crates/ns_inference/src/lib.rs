use clap::ValueEnum;
use std::fmt;

pub mod models;

/// Which sentiment model backs a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ModelKind {
    /// ProsusAI/finbert served by the Hugging Face inference API
    #[default]
    Finbert,
    /// Offline financial word lists
    Lexicon,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Finbert => write!(f, "finbert"),
            ModelKind::Lexicon => write!(f, "lexicon"),
        }
    }
}

#[derive(Clone, Default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: ModelKind,
    /// Hosted model name, e.g. `ProsusAI/finbert`
    pub model_name: Option<String>,
    /// Inference API root the model path is appended to
    pub model_url: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("model_name", &self.model_name)
            .field("model_url", &self.model_url)
            .finish()
    }
}

impl Config {
    /// Picks up `HF_API_TOKEN` from the environment when set.
    pub fn from_env(model: ModelKind) -> Self {
        Self {
            api_key: std::env::var("HF_API_TOKEN").ok().filter(|k| !k.is_empty()),
            model,
            ..Self::default()
        }
    }
}

pub mod prelude {
    pub use super::{Config, ModelKind};
    pub use super::models::create_model;
    pub use ns_core::{Error, Result, SentimentDistribution, SentimentModel};
}

pub use models::create_model;
