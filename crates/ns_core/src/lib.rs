pub mod models;
pub mod error;
pub mod source;
pub mod types;

pub use error::{Error, Result};
pub use models::{SentimentDistribution, SentimentModel, round_score};
pub use source::PageSource;
pub use types::{ArticleRecord, PageResponse, ResultTable, DEFAULT_PAGE_SIZE};
