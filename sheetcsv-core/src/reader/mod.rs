//! Excel/ODS file reader using calamine

use calamine::{Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

pub mod workbook;

pub use workbook::{Grid, UsedBounds, Workbook, Worksheet, display_text};

use crate::ConvertError;

/// Read a workbook from in-memory document bytes
pub fn read_workbook_from_bytes(bytes: &[u8]) -> Result<Workbook, ConvertError> {
    let excel = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    load_first_sheet(excel)
}

/// Read a workbook from a file path
pub fn read_workbook<P: AsRef<Path>>(path: P) -> Result<Workbook, ConvertError> {
    let path = path.as_ref();
    log::debug!("Opening workbook {}", path.display());
    let excel = open_workbook_auto(path)?;
    load_first_sheet(excel)
}

fn load_first_sheet<RS: Read + Seek>(mut excel: Sheets<RS>) -> Result<Workbook, ConvertError> {
    let sheet_names = excel.sheet_names();
    let name = sheet_names.first().cloned().ok_or(ConvertError::NoWorksheet)?;

    // Other sheets are never parsed
    let range = excel.worksheet_range(&name)?;
    let sheet = Worksheet::new(name, range);
    log::debug!(
        "Loaded first sheet '{}' of {} with bounds {:?}",
        sheet.name,
        sheet_names.len(),
        sheet.bounds()
    );

    Ok(Workbook {
        sheet_names,
        first_sheet: sheet,
    })
}
