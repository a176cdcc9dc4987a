//! Spreadsheet import: the contact sheet into the store.
//!
//! Accepts Excel workbooks (first worksheet) and CSV exports, including the
//! `;`-separated Windows-1252 files a Spanish-locale Excel writes. The sheet
//! must carry a header row with every [`Column`] header. Extra columns are
//! ignored; blank cells become empty strings.

mod delimited;
mod workbook;


pub use delimited::parse_csv;
pub use workbook::parse_workbook;

use crate::Store;
use nostra_core::{
    contact::{Column, Contact},
    error::NostraError,
};
use std::path::Path;
use tracing::{info, warn};

/// Outcome of a successful import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    /// Contacts written to the store.
    pub rows: usize,
    /// Fully blank lines that were dropped.
    pub skipped_blank: usize,
}

/// How a sheet file is read, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    /// Delimited text. Anything without a workbook extension.
    Csv,
    /// `.xlsx`, `.xlsm`, `.xlsb`, `.xls` or `.ods`.
    Workbook,
}

impl SheetFormat {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => Self::Workbook,
            _ => Self::Csv,
        }
    }
}

/// Spreadsheets export whole numbers stored as floats like `912345678.0`.
fn clean_cell(raw: &str) -> String {
    let value = raw.trim();
    if let Some((int, frac)) = value.split_once('.') {
        let int_digits = int.strip_prefix('-').unwrap_or(int);
        if !int_digits.is_empty()
            && int_digits.bytes().all(|b| b.is_ascii_digit())
            && !frac.is_empty()
            && frac.bytes().all(|b| b == b'0')
        {
            return int.to_string();
        }
    }
    value.to_string()
}

/// Map a header row and its data rows onto contacts.
///
/// Returns the contacts and the number of fully blank rows dropped.
fn rows_to_contacts<I>(headers: &[String], rows: I) -> Result<(Vec<Contact>, usize), NostraError>
where
    I: IntoIterator<Item = Result<Vec<String>, NostraError>>,
{
    let mut index: Vec<(Column, usize)> = Vec::with_capacity(Column::ALL.len());
    let mut missing = Vec::new();
    for col in Column::ALL {
        let pos = headers
            .iter()
            .position(|h| Column::from_header(h.trim_start_matches('\u{feff}')) == Some(col));
        match pos {
            Some(i) => index.push((col, i)),
            None => missing.push(col.header().to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(NostraError::ImportColumnsMissing(missing));
    }

    let mut contacts = Vec::new();
    let mut skipped_blank = 0;
    for row in rows {
        let row = row?;
        let mut contact = Contact::default();
        for (col, i) in &index {
            *contact.field_mut(*col) = clean_cell(row.get(*i).map_or("", String::as_str));
        }

        if Column::ALL.iter().all(|c| contact.field(*c).is_empty()) {
            skipped_blank += 1;
            continue;
        }
        contacts.push(contact);
    }

    Ok((contacts, skipped_blank))
}

/// Import a sheet file, replacing the stored contact list.
///
/// On any error the existing contacts are left untouched.
pub async fn import_file(store: &Store, path: &Path) -> Result<ImportReport, NostraError> {
    let format = SheetFormat::from_path(path);
    let (contacts, skipped_blank) = match format {
        SheetFormat::Csv => {
            let bytes = tokio::fs::read(path).await?;
            parse_csv(&bytes)?
        }
        SheetFormat::Workbook => {
            // calamine reads synchronously.
            let owned = path.to_path_buf();
            tokio::task::spawn_blocking(move || parse_workbook(&owned))
                .await
                .map_err(|e| NostraError::Import(format!("workbook reader failed: {e}")))??
        }
    };
    if skipped_blank > 0 {
        warn!("import: dropped {skipped_blank} blank rows");
    }

    let rows = store.replace_contacts(&contacts).await?;
    info!("import: {rows} contacts from {} ({format:?})", path.display());

    Ok(ImportReport {
        rows,
        skipped_blank,
    })
}
