//! Excel and OpenDocument workbooks via calamine. Only the first worksheet is read.

use super::rows_to_contacts;
use calamine::{open_workbook_auto, Data, Reader};
use nostra_core::{contact::Contact, error::NostraError};
use std::path::Path;

/// Cell as sheet text. Whole floats lose their fractional part.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

/// Parse contacts from the first worksheet of a workbook file.
///
/// Returns the contacts and the number of fully blank rows dropped.
pub fn parse_workbook(path: &Path) -> Result<(Vec<Contact>, usize), NostraError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| match e {
        calamine::Error::Io(e) => NostraError::Io(e),
        other => NostraError::Import(format!("cannot open {}: {other}", path.display())),
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| NostraError::Import(format!("{} has no worksheets", path.display())))?
        .map_err(|e| NostraError::Import(format!("cannot read first worksheet: {e}")))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(cell_text).collect())
        .unwrap_or_default();

    rows_to_contacts(&headers, rows.map(|row| Ok(row.iter().map(cell_text).collect())))
}
