use async_trait::async_trait;
use crate::types::PageResponse;
use crate::Result;

#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the page of articles for `ticker` starting at article `offset`.
    ///
    /// `Ok(None)` means the endpoint answered but had no results array;
    /// `Err` means the request itself failed.
    async fn fetch_page(&self, ticker: &str, offset: usize) -> Result<Option<PageResponse>>;
}
