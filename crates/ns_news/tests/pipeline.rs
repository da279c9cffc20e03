use std::sync::Arc;

use async_trait::async_trait;
use httpmock::prelude::*;
use ns_core::{Result, SentimentDistribution, SentimentModel};
use ns_news::{ManagerConfig, NewsManager, QuerylyClient, QuerylyConfig, StopReason};
use serde_json::{json, Value};

#[derive(Debug)]
struct HeadlineModel;

#[async_trait]
impl SentimentModel for HeadlineModel {
    fn name(&self) -> &str {
        "headline"
    }

    async fn classify(&self, text: &str) -> Result<SentimentDistribution> {
        if text.contains("beats") {
            Ok(SentimentDistribution::new(0.9, 0.05, 0.05))
        } else {
            Ok(SentimentDistribution::new(0.1, 0.7, 0.2))
        }
    }
}

fn article(i: usize, day: u32) -> Value {
    json!({
        "url": format!("https://www.cnbc.com/2024/01/{:02}/story-{}.html", day, i),
        "cn:title": if i % 2 == 0 { "Micron beats estimates" } else { "Micron slides" },
        "description": format!("Story {}", i),
        "datePublished": format!("2024-01-{:02}T08:15:00-0500", day)
    })
}

#[tokio::test]
async fn pages_through_endpoint_until_short_page() {
    let server = MockServer::start_async().await;

    let first: Vec<Value> = (0..100).map(|i| article(i, (i % 28 + 1) as u32)).collect();
    let mut second: Vec<Value> = (100..125).map(|i| article(i, (i % 28 + 1) as u32)).collect();
    second.extend((0..5).map(|i| article(i, (i % 28 + 1) as u32)));

    let page_one = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/cnbc/json.aspx")
                .query_param("query", "Micron")
                .query_param("endindex", "0");
            then.status(200)
                .json_body(json!({ "metadata": { "pagesize": 100 }, "results": first }));
        })
        .await;
    let page_two = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/cnbc/json.aspx")
                .query_param("query", "Micron")
                .query_param("endindex", "100");
            then.status(200)
                .json_body(json!({ "metadata": { "pagesize": 100 }, "results": second }));
        })
        .await;

    let config = QuerylyConfig::default().with_base_url(server.url("/cnbc/json.aspx"));
    let client = Arc::new(QuerylyClient::new(config).unwrap());
    let manager = NewsManager::new(client, Arc::new(HeadlineModel), ManagerConfig::default());

    let report = manager.run("Micron").await.unwrap();

    page_one.assert_async().await;
    page_two.assert_async().await;
    assert_eq!(report.stop, StopReason::LastPage);
    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.table.len(), 125);
    assert!(report.had_duplicates);

    let newest = &report.table.records()[0];
    assert_eq!(newest.published_date.unwrap().format("%Y-%m-%d %H:%M").to_string(), "2024-01-28 08:15");
    assert!(report
        .table
        .iter()
        .all(|r| r.sentiment_score == 0.85 || r.sentiment_score == -0.6));
}

#[tokio::test]
async fn server_error_keeps_what_was_fetched() {
    let server = MockServer::start_async().await;

    let first: Vec<Value> = (0..100).map(|i| article(i, 3)).collect();
    server
        .mock_async(|when, then| {
            when.method(GET).path("/cnbc/json.aspx").query_param("endindex", "0");
            then.status(200)
                .json_body(json!({ "metadata": { "pagesize": 100 }, "results": first }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/cnbc/json.aspx").query_param("endindex", "100");
            then.status(500);
        })
        .await;

    let config = QuerylyConfig::default().with_base_url(server.url("/cnbc/json.aspx"));
    let client = Arc::new(QuerylyClient::new(config).unwrap());
    let manager = NewsManager::new(client, Arc::new(HeadlineModel), ManagerConfig { max_pages: 5 });

    let report = manager.run("Micron").await.unwrap();

    assert!(matches!(report.stop, StopReason::FetchFailed(_)));
    assert_eq!(report.table.len(), 100);
}

#[tokio::test]
async fn float_page_size_keeps_paging() {
    let server = MockServer::start_async().await;

    let first: Vec<Value> = (0..50).map(|i| article(i, 4)).collect();
    let second: Vec<Value> = (50..60).map(|i| article(i, 5)).collect();
    let page_one = server
        .mock_async(|when, then| {
            when.method(GET).path("/cnbc/json.aspx").query_param("endindex", "0");
            then.status(200)
                .json_body(json!({ "metadata": { "pagesize": 50.0 }, "results": first }));
        })
        .await;
    let page_two = server
        .mock_async(|when, then| {
            when.method(GET).path("/cnbc/json.aspx").query_param("endindex", "50");
            then.status(200)
                .json_body(json!({ "metadata": { "pagesize": "50" }, "results": second }));
        })
        .await;

    let config = QuerylyConfig::default().with_base_url(server.url("/cnbc/json.aspx"));
    let client = Arc::new(QuerylyClient::new(config).unwrap());
    let manager = NewsManager::new(client, Arc::new(HeadlineModel), ManagerConfig { max_pages: 3 });

    let report = manager.run("Micron").await.unwrap();

    page_one.assert_async().await;
    page_two.assert_async().await;
    assert_eq!(report.stop, StopReason::LastPage);
    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.table.len(), 60);
}
