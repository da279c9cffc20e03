use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use ns_core::{Error, PageResponse, PageSource, Result, DEFAULT_PAGE_SIZE};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

/// CNBC's Queryly search endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.queryly.com/cnbc/json.aspx";

const QUERYLY_KEY: &str = "31a35d40a9a64ab3";
const ADDITIONAL_INDEXES: &str =
    "4cd6f71fbf22424d,937d600b0d0d4e23,3bfbe40caee7443e,626fdfcd96444f28";

#[derive(Debug, Clone)]
pub struct QuerylyConfig {
    pub base_url: String,
    pub page_size: usize,
    pub timeout: Duration,
}

impl Default for QuerylyConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout: Duration::from_secs(20),
        }
    }
}

impl QuerylyConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Pages through Queryly search results for a ticker.
pub struct QuerylyClient {
    client: Client,
    base_url: Url,
    page_size: usize,
}

impl fmt::Debug for QuerylyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuerylyClient")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.base_url.as_str())
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl QuerylyClient {
    pub fn new(config: QuerylyConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url,
            page_size: config.page_size,
        })
    }

    /// Full request url for one page.
    pub fn page_url(&self, ticker: &str, offset: usize) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("queryly_key", QUERYLY_KEY)
            .append_pair("query", ticker)
            .append_pair("endindex", &offset.to_string())
            .append_pair("batchsize", &self.page_size.to_string())
            .append_pair("callback", "")
            .append_pair("showfaceted", "false")
            .append_pair("timezoneoffset", "-120")
            .append_pair("facetedfields", "formats")
            .append_pair("facetedkey", "formats|")
            .append_pair("facetedvalue", "!Press Release|")
            .append_pair("sort", "date")
            .append_pair("additionalindexes", ADDITIONAL_INDEXES);
        url
    }
}

#[async_trait]
impl PageSource for QuerylyClient {
    async fn fetch_page(&self, ticker: &str, offset: usize) -> Result<Option<PageResponse>> {
        let url = self.page_url(ticker, offset);
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!(
                "search endpoint answered {} at index {}",
                status, offset
            )));
        }

        let body: Value = response.json().await?;
        Ok(PageResponse::from_json(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> QuerylyClient {
        let config = QuerylyConfig::default().with_base_url(server.url("/cnbc/json.aspx"));
        QuerylyClient::new(config).unwrap()
    }

    #[test]
    fn test_page_url_carries_query() {
        let client = QuerylyClient::new(QuerylyConfig::default()).unwrap();
        let url = client.page_url("MU", 200);
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        assert!(url.as_str().starts_with(DEFAULT_BASE_URL));
        assert!(pairs.contains(&("query".to_string(), "MU".to_string())));
        assert!(pairs.contains(&("endindex".to_string(), "200".to_string())));
        assert!(pairs.contains(&("batchsize".to_string(), "100".to_string())));
        assert!(pairs.contains(&("facetedvalue".to_string(), "!Press Release|".to_string())));
        assert!(pairs.contains(&("sort".to_string(), "date".to_string())));
    }

    #[test]
    fn test_invalid_base_url() {
        let config = QuerylyConfig::default().with_base_url("not a url");
        assert!(matches!(QuerylyClient::new(config), Err(Error::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_fetch_page() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/cnbc/json.aspx")
                    .query_param("query", "MU")
                    .query_param("endindex", "100");
                then.status(200).json_body(json!({
                    "metadata": { "pagesize": 100 },
                    "results": [
                        { "url": "https://cnbc.com/a", "cn:title": "A" },
                        { "url": "https://cnbc.com/b", "cn:title": "B" }
                    ]
                }));
            })
            .await;

        let page = client_for(&server).fetch_page("MU", 100).await.unwrap().unwrap();
        mock.assert_async().await;
        assert_eq!(page.result_count(), 2);
        assert_eq!(page.page_size(), 100);
    }

    #[tokio::test]
    async fn test_fetch_page_without_results() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/cnbc/json.aspx");
                then.status(200).json_body(json!({ "metadata": { "pagesize": 100 } }));
            })
            .await;

        let outcome = client_for(&server).fetch_page("MU", 0).await.unwrap();
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn test_fetch_page_error_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/cnbc/json.aspx");
                then.status(503);
            })
            .await;

        let outcome = client_for(&server).fetch_page("MU", 0).await;
        assert!(matches!(outcome, Err(Error::Fetch(_))));
    }

    #[tokio::test]
    async fn test_fetch_page_invalid_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/cnbc/json.aspx");
                then.status(200).body("<html>maintenance</html>");
            })
            .await;

        assert!(client_for(&server).fetch_page("MU", 0).await.is_err());
    }
}
