use std::io::Write;

use ns_core::{Result, ResultTable};

use crate::{OutputFormat, TableExporter};

/// Writes the table as a pretty-printed JSON array of records.
#[derive(Debug, Default, Clone)]
pub struct JsonExporter;

impl JsonExporter {
    pub fn new() -> Self {
        Self
    }
}

impl TableExporter for JsonExporter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn write_table(&self, table: &ResultTable, writer: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *writer, table)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}
