use std::sync::Arc;

use ns_core::{Error, Result, SentimentModel};
use tracing::info;

use crate::{Config, ModelKind};

pub mod finbert;
pub mod lexicon;

pub use finbert::FinBertModel;
pub use lexicon::LexiconModel;

const WARMUP_TEXT: &str = "Stocks were little changed in early trading.";

/// Builds the model a run will share. Call once and pass the handle around.
///
/// A hosted model is asked for one classification up front, so a bad token
/// or endpoint fails here instead of on every article.
pub async fn create_model(config: Option<Config>) -> Result<Arc<dyn SentimentModel>> {
    let config = config.unwrap_or_default();
    let model: Arc<dyn SentimentModel> = match config.model {
        ModelKind::Finbert => {
            let model = FinBertModel::new(&config)?;
            model.classify(WARMUP_TEXT).await.map_err(|e| {
                Error::Inference(format!("{} is not usable: {}", model.name(), e))
            })?;
            Arc::new(model)
        }
        ModelKind::Lexicon => Arc::new(LexiconModel::new()),
    };
    info!("🧠 Sentiment model ready: {}", model.name());
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn finbert_config(server: &MockServer) -> Config {
        Config {
            api_key: Some("hf_test".to_string()),
            model_url: Some(server.base_url()),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_create_model() {
        let server = MockServer::start_async().await;
        let warmup = server
            .mock_async(|when, then| {
                when.method(POST).path("/models/ProsusAI/finbert");
                then.status(200).json_body(json!([[
                    { "label": "neutral", "score": 0.9 },
                    { "label": "positive", "score": 0.06 },
                    { "label": "negative", "score": 0.04 }
                ]]));
            })
            .await;

        let model = create_model(Some(finbert_config(&server))).await.unwrap();
        warmup.assert_async().await;
        assert_eq!(model.name(), "ProsusAI/finbert");

        let config = Config {
            model: ModelKind::Lexicon,
            ..Config::default()
        };
        let model = create_model(Some(config)).await.unwrap();
        assert_eq!(model.name(), "lexicon");
        assert!(model.score("Shares surge to a record high").await.unwrap() > 0.0);
    }

    #[tokio::test]
    async fn test_create_model_rejected_token() {
        let server = MockServer::start_async().await;
        let warmup = server
            .mock_async(|when, then| {
                when.method(POST).path("/models/ProsusAI/finbert");
                then.status(401).json_body(json!({ "error": "Invalid credentials in Authorization header" }));
            })
            .await;

        let result = create_model(Some(finbert_config(&server))).await;

        warmup.assert_async().await;
        match result {
            Err(Error::Inference(msg)) => assert!(msg.contains("401"), "message was {}", msg),
            Err(other) => panic!("expected inference error, got {}", other),
            Ok(model) => panic!("expected an error, got {:?}", model),
        }
    }

    #[tokio::test]
    async fn test_create_model_bad_url() {
        let config = Config {
            model_url: Some("::not a url::".to_string()),
            ..Config::default()
        };
        assert!(create_model(Some(config)).await.is_err());
    }
}
