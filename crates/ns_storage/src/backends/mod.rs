pub mod csv_file;
pub mod json_file;

pub use csv_file::CsvExporter;
pub use json_file::JsonExporter;
