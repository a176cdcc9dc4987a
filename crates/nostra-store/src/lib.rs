//! # nostra-store
//!
//! Contact list and send history for Nostra (SQLite-backed), plus the
//! spreadsheet import that fills it.

pub mod import;
pub mod store;

pub use import::{import_file, parse_csv, parse_workbook, ImportReport, SheetFormat};
pub use store::Store;
