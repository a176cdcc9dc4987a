//! CSV and other delimited exports.

use super::rows_to_contacts;
use encoding_rs::WINDOWS_1252;
use nostra_core::{contact::Contact, error::NostraError};
use std::borrow::Cow;
use tracing::debug;

/// Text of the file: UTF-8 with any BOM removed, otherwise Windows-1252.
fn decode(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            debug!("import: not UTF-8, decoding as Windows-1252");
            WINDOWS_1252.decode_without_bom_handling(bytes).0
        }
    }
}

/// Separator used on the header line. Ties go to `,`.
fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or_default();
    [b';', b'\t', b',']
        .into_iter()
        .max_by_key(|d| header.bytes().filter(|b| b == d).count())
        .unwrap_or(b',')
}

/// Parse contacts from a delimited export.
///
/// Returns the contacts and the number of fully blank rows dropped.
pub fn parse_csv(bytes: &[u8]) -> Result<(Vec<Contact>, usize), NostraError> {
    let text = decode(bytes);
    let delimiter = sniff_delimiter(&text);

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| NostraError::Import(format!("failed to read header row: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    let rows = rdr.records().enumerate().map(|(line, record)| {
        record
            .map(|r| r.iter().map(str::to_string).collect())
            .map_err(|e| NostraError::Import(format!("row {}: {e}", line + 2)))
    });
    rows_to_contacts(&headers, rows)
}
