use std::cmp::Ordering;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Page size the search endpoint uses when its metadata does not say otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// One scored article, keyed by its url.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    pub description: String,
    pub published_date: Option<NaiveDateTime>,
    pub sentiment_score: f64,
    pub url: String,
}

/// A single page returned by the search endpoint.
///
/// Articles are kept as raw JSON so a malformed entry only costs that entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageResponse {
    pub results: Vec<Value>,
    pub page_size: Option<usize>,
}

impl PageResponse {
    pub fn new(results: Vec<Value>, page_size: Option<usize>) -> Self {
        Self { results, page_size }
    }

    /// Builds a page from a decoded response body.
    ///
    /// Returns `None` when the body carries no `results` array, which the
    /// endpoint does when it has nothing usable to say.
    pub fn from_json(body: Value) -> Option<Self> {
        let page_size = body
            .get("metadata")
            .and_then(|m| m.get("pagesize"))
            .and_then(page_size_value);

        match body {
            Value::Object(mut map) => match map.remove("results") {
                Some(Value::Array(results)) => Some(Self { results, page_size }),
                _ => None,
            },
            _ => None,
        }
    }

    /// Page size announced by the endpoint, falling back to the default for a
    /// missing or zero value.
    pub fn page_size(&self) -> usize {
        match self.page_size {
            Some(n) if n > 0 => n,
            _ => DEFAULT_PAGE_SIZE,
        }
    }

    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    /// A short page is the last one.
    pub fn is_last(&self) -> bool {
        self.result_count() < self.page_size()
    }
}

/// Reads `pagesize` whether it arrives as an integer, a whole float or a
/// numeric string.
fn page_size_value(value: &Value) -> Option<usize> {
    let whole = |f: f64| (f.is_finite() && f >= 0.0 && f.fract() == 0.0).then_some(f as usize);
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(|n| n as usize)
            .or_else(|| n.as_f64().and_then(whole)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<usize>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole))
        }
        _ => None,
    }
}

/// Final, date-ordered result of a run.
///
/// The only way in is [`ResultTable::from_records`], which sorts once:
/// newest first, undated records last, ties in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultTable {
    records: Vec<ArticleRecord>,
}

impl ResultTable {
    pub fn from_records(mut records: Vec<ArticleRecord>) -> Self {
        records.sort_by(|a, b| newest_first(a, b));
        Self { records }
    }

    pub fn records(&self) -> &[ArticleRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ArticleRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The first `n` rows, or fewer if the table is shorter.
    pub fn head(&self, n: usize) -> &[ArticleRecord] {
        &self.records[..n.min(self.records.len())]
    }

    pub fn into_records(self) -> Vec<ArticleRecord> {
        self.records
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = &'a ArticleRecord;
    type IntoIter = std::slice::Iter<'a, ArticleRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn newest_first(a: &ArticleRecord, b: &ArticleRecord) -> Ordering {
    match (a.published_date, b.published_date) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
