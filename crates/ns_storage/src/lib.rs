use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use ns_core::{Result, ResultTable};
use tracing::info;

pub mod backends;

pub use backends::*;

/// File format of the exported table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

pub trait TableExporter: Send + Sync {
    fn format(&self) -> OutputFormat;

    /// Serialize the table into `writer`
    fn write_table(&self, table: &ResultTable, writer: &mut dyn Write) -> Result<()>;

    /// Write the table to `path`, replacing whatever is there
    fn export(&self, table: &ResultTable, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_table(table, &mut writer)?;
        writer.flush()?;
        info!("💾 Wrote {} rows to {}", table.len(), path.display());
        Ok(())
    }
}

pub fn create_exporter(format: OutputFormat) -> Box<dyn TableExporter> {
    match format {
        OutputFormat::Csv => Box::new(CsvExporter::new()),
        OutputFormat::Json => Box::new(JsonExporter::new()),
    }
}

/// `sentiment{TICKER}.{ext}`, with characters unsafe in file names replaced.
pub fn default_output_path(ticker: &str, format: OutputFormat) -> PathBuf {
    let name: String = ticker
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' })
        .collect();
    PathBuf::from(format!("sentiment{}.{}", name, format.extension()))
}

pub mod prelude {
    pub use super::{create_exporter, default_output_path, OutputFormat, TableExporter};
    pub use super::backends::*;
}
