//! sheetcsv-core: Core library for Excel/ODS to CSV conversion
//!
//! Reads the first worksheet of a spreadsheet document and serializes the
//! display text of its used range as CSV.

pub mod config;
pub mod reader;
pub mod writer;

use std::path::Path;

pub use config::ConverterConfig;
pub use reader::{Grid, UsedBounds, Workbook, Worksheet};

/// Errors raised while converting a document
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The document is not a valid or supported spreadsheet
    #[error(transparent)]
    Parse(#[from] calamine::Error),
    #[error("Workbook contains no worksheet")]
    NoWorksheet,
}

/// Convert the first worksheet of a spreadsheet document to CSV bytes
pub fn convert_to_csv(document: &[u8]) -> Result<Vec<u8>, ConvertError> {
    let workbook = reader::read_workbook_from_bytes(document)?;
    Ok(writer::encode(workbook.first_sheet()))
}

/// Convert the first worksheet of a spreadsheet file to CSV bytes
pub fn convert_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, ConvertError> {
    let workbook = reader::read_workbook(path)?;
    Ok(writer::encode(workbook.first_sheet()))
}
