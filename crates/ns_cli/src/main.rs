use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use ns_core::{Result, ResultTable};
use ns_inference::{create_model, Config as ModelConfig, ModelKind};
use ns_news::{init_logging, NewsArgs, NewsManager, QuerylyClient, StopReason};
use ns_storage::{create_exporter, default_output_path, OutputFormat};
use tracing::{info, warn};

const PREVIEW_TITLE_WIDTH: usize = 70;

/// CNBC news sentiment for a stock ticker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    news: NewsArgs,

    /// Where to write the table (default: sentiment<TICKER>.<format>)
    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    #[arg(long, value_enum, default_value_t = ModelKind::Finbert, help = "Sentiment model: finbert (default, hosted) or lexicon (offline)")]
    model: ModelKind,

    /// Inference API root for the finbert model
    #[arg(long)]
    model_url: Option<String>,

    /// Rows to print after the run; 0 disables the preview
    #[arg(long, default_value_t = 10)]
    preview: usize,

    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn model_config(&self) -> ModelConfig {
        let mut config = ModelConfig::from_env(self.model);
        config.model_url = self.model_url.clone();
        config
    }

    fn output_path(&self, ticker: &str) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(ticker, self.format))
    }
}

fn shorten(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut short: String = text.chars().take(width.saturating_sub(3)).collect();
    short.push_str("...");
    short
}

fn render_preview(table: &ResultTable, rows: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<19}  {:<w$}  {:>8}", "published_date", "title", "score", w = PREVIEW_TITLE_WIDTH);
    for record in table.head(rows) {
        let date = record
            .published_date
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<19}  {:<w$}  {:>8.4}",
            date,
            shorten(&record.title, PREVIEW_TITLE_WIDTH),
            record.sentiment_score,
            w = PREVIEW_TITLE_WIDTH
        );
    }
    out
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ticker = cli.news.ticker()?.to_string();

    let model = create_model(Some(cli.model_config())).await?;
    let client = Arc::new(QuerylyClient::new(cli.news.client_config())?);
    let manager = NewsManager::new(client, model, cli.news.manager_config());

    let report = manager.run(&ticker).await?;
    if let StopReason::FetchFailed(e) = &report.stop {
        warn!("⚠️ Stopped early after {} page(s): {}", report.pages_fetched, e);
    }
    if report.had_duplicates {
        info!("Duplicate articles were skipped");
    }

    let path = cli.output_path(&ticker);
    create_exporter(cli.format).export(&report.table, &path)?;

    if report.table.is_empty() {
        println!("No data found.");
        return Ok(());
    }

    if cli.preview > 0 {
        println!("\n--- Data preview ---");
        print!("{}", render_preview(&report.table, cli.preview));
    }
    println!(
        "Successfully processed {} articles for {}.",
        report.table.len(),
        ticker
    );

    Ok(())
}
