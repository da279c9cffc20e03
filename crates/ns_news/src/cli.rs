use clap::Args;
use ns_core::{Error, Result};

use crate::client::{QuerylyConfig, DEFAULT_BASE_URL};
use crate::manager::ManagerConfig;

#[derive(Args, Debug, Clone)]
pub struct NewsArgs {
    /// Ticker symbol or company name to search for (e.g. MU, Micron)
    #[arg(long)]
    pub ticker: String,

    /// Number of pages to fetch at most. 1 page = 100 articles
    #[arg(long, default_value_t = 5)]
    pub pages: usize,

    /// Search endpoint to page through
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub endpoint: String,
}

impl NewsArgs {
    /// The trimmed ticker, rejecting blank input.
    pub fn ticker(&self) -> Result<&str> {
        parse_ticker(&self.ticker)
    }

    pub fn client_config(&self) -> QuerylyConfig {
        QuerylyConfig::default().with_base_url(self.endpoint.clone())
    }

    pub fn manager_config(&self) -> ManagerConfig {
        ManagerConfig { max_pages: self.pages }
    }
}

fn parse_ticker(raw: &str) -> Result<&str> {
    let ticker = raw.trim();
    if ticker.is_empty() {
        return Err(Error::InvalidTicker(raw.to_string()));
    }
    Ok(ticker)
}
