pub mod batch;
pub mod cli;
pub mod client;
pub mod logging;
pub mod manager;

pub use batch::{process_batch, Batch};
pub use cli::NewsArgs;
pub use client::{QuerylyClient, QuerylyConfig};
pub use logging::{init_logging, Logger};
pub use manager::{ManagerConfig, NewsManager, RunReport, StopReason};

pub mod prelude {
    pub use super::client::QuerylyClient;
    pub use super::manager::{NewsManager, RunReport, StopReason};
    pub use ns_core::{ArticleRecord, Error, PageSource, Result, ResultTable, SentimentModel};
}
