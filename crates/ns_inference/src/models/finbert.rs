use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ns_core::{Error, Result, SentimentDistribution, SentimentModel};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::Config;

pub const DEFAULT_MODEL_NAME: &str = "ProsusAI/finbert";
pub const DEFAULT_MODEL_URL: &str = "https://router.huggingface.co/hf-inference";

/// FinBERT reads at most 512 tokens; anything longer is cut.
const MAX_INPUT_WORDS: usize = 512;

#[derive(Serialize)]
struct ClassificationRequest<'a> {
    inputs: &'a str,
    parameters: ClassificationParameters,
}

#[derive(Serialize)]
struct ClassificationParameters {
    top_k: usize,
}

#[derive(Deserialize, Debug)]
struct LabelScore {
    label: String,
    score: f64,
}

/// The API answers `[[...]]` for a single input on some deployments and
/// `[...]` on others.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum ClassificationResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl ClassificationResponse {
    fn into_labels(self) -> Vec<LabelScore> {
        match self {
            ClassificationResponse::Nested(mut outer) => {
                if outer.is_empty() {
                    Vec::new()
                } else {
                    outer.swap_remove(0)
                }
            }
            ClassificationResponse::Flat(labels) => labels,
        }
    }
}

/// FinBERT behind a Hugging Face text-classification endpoint.
pub struct FinBertModel {
    client: Arc<Client>,
    api_key: Option<String>,
    model_name: String,
    endpoint: Url,
}

impl fmt::Debug for FinBertModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FinBertModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("model_name", &self.model_name)
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

impl FinBertModel {
    pub fn new(config: &Config) -> Result<Self> {
        let model_name = config
            .model_name
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string());
        let base = config
            .model_url
            .as_deref()
            .unwrap_or(DEFAULT_MODEL_URL)
            .trim_end_matches('/');
        let raw = format!("{}/models/{}", base, model_name);
        let endpoint = Url::parse(&raw).map_err(|e| Error::InvalidUrl(format!("{}: {}", raw, e)))?;

        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;

        Ok(Self {
            client: Arc::new(client),
            api_key: config.api_key.clone(),
            model_name,
            endpoint,
        })
    }
}

fn truncate_words(text: &str, max_words: usize) -> String {
    text.split_whitespace().take(max_words).collect::<Vec<_>>().join(" ")
}

fn distribution(labels: &[LabelScore]) -> Result<SentimentDistribution> {
    let find = |name: &str| {
        labels
            .iter()
            .find(|l| l.label.eq_ignore_ascii_case(name))
            .map(|l| l.score)
    };

    let positive = find("positive")
        .ok_or_else(|| Error::Inference("classifier returned no positive label".to_string()))?;
    let negative = find("negative")
        .ok_or_else(|| Error::Inference("classifier returned no negative label".to_string()))?;
    let neutral = find("neutral").unwrap_or_else(|| (1.0 - positive - negative).max(0.0));

    Ok(SentimentDistribution::new(positive, negative, neutral))
}

#[async_trait]
impl SentimentModel for FinBertModel {
    fn name(&self) -> &str {
        &self.model_name
    }

    async fn classify(&self, text: &str) -> Result<SentimentDistribution> {
        let input = truncate_words(text, MAX_INPUT_WORDS);
        let request = ClassificationRequest {
            inputs: &input,
            parameters: ClassificationParameters { top_k: 3 },
        };

        let mut builder = self.client.post(self.endpoint.clone()).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!(
                "{} answered {}: {}",
                self.model_name, status, body
            )));
        }

        let labels = response.json::<ClassificationResponse>().await?.into_labels();
        tracing::debug!("{} labels: {:?}", self.model_name, labels);
        distribution(&labels)
    }
}
