use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use ns_core::{ArticleRecord, Error, PageSource, Result, ResultTable, SentimentModel};

use crate::batch::process_batch;
use crate::logging::Logger;

#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Upper bound on fetch attempts per run
    pub max_pages: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self { max_pages: 5 }
    }
}

/// Why pagination ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// A page came back shorter than the page size
    LastPage,
    /// The page limit was hit before the data ran out
    MaxPagesReached,
    /// The endpoint answered without a results array
    NoResults,
    /// The request failed; carries the error text
    FetchFailed(String),
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::LastPage => write!(f, "last page reached"),
            StopReason::MaxPagesReached => write!(f, "page limit reached"),
            StopReason::NoResults => write!(f, "no results in response"),
            StopReason::FetchFailed(e) => write!(f, "fetch failed: {}", e),
        }
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub ticker: String,
    pub table: ResultTable,
    pub stop: StopReason,
    /// Fetch attempts made, failed ones included
    pub pages_fetched: usize,
    pub had_duplicates: bool,
}

/// Walks the search pages for one ticker, deduplicating and scoring as it
/// goes, and sorts the collected records once at the end.
pub struct NewsManager {
    source: Arc<dyn PageSource>,
    model: Arc<dyn SentimentModel>,
    config: ManagerConfig,
}

impl fmt::Debug for NewsManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsManager")
            .field("source", &"<dyn PageSource>")
            .field("model", &self.model.name())
            .field("config", &self.config)
            .finish()
    }
}

impl NewsManager {
    pub fn new(
        source: Arc<dyn PageSource>,
        model: Arc<dyn SentimentModel>,
        config: ManagerConfig,
    ) -> Self {
        Self { source, model, config }
    }

    pub async fn run(&self, raw_ticker: &str) -> Result<RunReport> {
        let ticker = raw_ticker.trim();
        if ticker.is_empty() {
            return Err(Error::InvalidTicker(raw_ticker.to_string()));
        }

        let log = Logger::new().with_prefix(format!("[{}]", ticker));
        log.info(&format!(
            "Start fetching news for {} (model: {}, max pages: {})",
            ticker,
            self.model.name(),
            self.config.max_pages
        ));

        let mut records: Vec<ArticleRecord> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut had_duplicates = false;
        let mut offset = 0;
        let mut page_counter = 0;

        let stop = loop {
            page_counter += 1;
            if page_counter > self.config.max_pages {
                break StopReason::MaxPagesReached;
            }

            log.info(&format!("Load batch {} (index: {})", page_counter, offset));
            let page = match self.source.fetch_page(ticker, offset).await {
                Ok(Some(page)) => page,
                Ok(None) => {
                    log.warn("Response carried no results, stopping");
                    break StopReason::NoResults;
                }
                Err(e) => {
                    log.error(&format!("Error at API request: {}", e));
                    break StopReason::FetchFailed(e.to_string());
                }
            };

            let batch = process_batch(self.model.as_ref(), &page, &seen).await;
            if batch.had_duplicates {
                log.debug(&format!("Batch {} contained duplicates", page_counter));
                had_duplicates = true;
            }
            log.debug(&format!(
                "Batch {} accepted {} of {} articles",
                page_counter,
                batch.records.len(),
                page.result_count()
            ));
            for record in batch.records {
                seen.insert(record.url.clone());
                records.push(record);
            }

            if page.is_last() {
                log.info("Last page reached");
                break StopReason::LastPage;
            }
            offset += page.page_size();
        };

        let table = ResultTable::from_records(records);
        log.info(&format!("Finished! {} articles processed ({})", table.len(), stop));

        Ok(RunReport {
            ticker: ticker.to_string(),
            table,
            stop,
            pages_fetched: page_counter.min(self.config.max_pages),
            had_duplicates,
        })
    }
}
