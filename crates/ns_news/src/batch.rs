use std::collections::HashSet;

use chrono::{DateTime, NaiveDateTime};
use ns_core::{ArticleRecord, Error, PageResponse, Result, SentimentModel};
use serde_json::Value;
use tracing::{debug, warn};

/// Timestamp layout used by `datePublished`, e.g. `2024-01-05T09:30:00-0500`.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Records accepted from one page.
#[derive(Debug, Default)]
pub struct Batch {
    pub records: Vec<ArticleRecord>,
    pub had_duplicates: bool,
}

/// Parses `datePublished` and drops the offset, keeping the wall-clock time.
/// A trailing `Z` is read as UTC.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Some(utc) = raw.strip_suffix('Z') {
        return NaiveDateTime::parse_from_str(utc, "%Y-%m-%dT%H:%M:%S").ok();
    }
    DateTime::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .map(|dt| dt.naive_local())
}

/// Filters, extracts and scores the articles of a page.
///
/// Urls already in `seen`, or repeated within this page, are skipped and
/// flagged as duplicates. An article that fails extraction or scoring is
/// logged and skipped; the rest of the page is still processed.
pub async fn process_batch(
    model: &dyn SentimentModel,
    page: &PageResponse,
    seen: &HashSet<String>,
) -> Batch {
    let mut batch = Batch::default();
    let mut accepted: HashSet<String> = HashSet::new();

    for raw in &page.results {
        let Some(url) = raw.get("url").and_then(Value::as_str) else {
            warn!("Skipping article without url");
            continue;
        };

        if seen.contains(url) || accepted.contains(url) {
            debug!("Duplicate article: {}", url);
            batch.had_duplicates = true;
            continue;
        }

        match build_record(model, url, raw).await {
            Ok(record) => {
                accepted.insert(url.to_string());
                batch.records.push(record);
            }
            Err(e) => warn!("Error working on {}: {}", url, e),
        }
    }

    batch
}

async fn build_record(
    model: &dyn SentimentModel,
    url: &str,
    raw: &Value,
) -> Result<ArticleRecord> {
    let title = text_field(raw, "cn:title")?;
    let description = text_field(raw, "description")?;
    let published_date = raw
        .get("datePublished")
        .and_then(Value::as_str)
        .and_then(parse_date);

    let input = format!("{}: {}", title, description);
    let sentiment_score = model.score(&input).await?;

    Ok(ArticleRecord {
        title,
        description,
        published_date,
        sentiment_score,
        url: url.to_string(),
    })
}

/// Missing fields read as empty; anything present must be a string.
fn text_field(raw: &Value, key: &str) -> Result<String> {
    match raw.get(key) {
        None => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(other) => Err(Error::InvalidArticle(format!(
            "field {:?} is not a string: {}",
            key, other
        ))),
    }
}
