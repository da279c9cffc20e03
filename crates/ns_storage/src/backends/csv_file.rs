use std::io::Write;

use ns_core::{ArticleRecord, Error, Result, ResultTable};

use crate::{OutputFormat, TableExporter};

pub const COLUMNS: [&str; 5] = ["title", "description", "published_date", "sentiment_score", "url"];

/// How `published_date` is rendered; undated rows get an empty cell.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Default, Clone)]
pub struct CsvExporter;

impl CsvExporter {
    pub fn new() -> Self {
        Self
    }
}

fn row(record: &ArticleRecord) -> [String; 5] {
    [
        record.title.clone(),
        record.description.clone(),
        record
            .published_date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default(),
        record.sentiment_score.to_string(),
        record.url.clone(),
    ]
}

fn export_error(e: csv::Error) -> Error {
    Error::Export(format!("CSV write failed: {}", e))
}

impl TableExporter for CsvExporter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Csv
    }

    fn write_table(&self, table: &ResultTable, writer: &mut dyn Write) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(COLUMNS).map_err(export_error)?;
        for record in table {
            csv.write_record(row(record)).map_err(export_error)?;
        }
        csv.flush()?;
        Ok(())
    }
}
