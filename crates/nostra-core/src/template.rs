//! Message templates with `[Column]` placeholders.

use crate::contact::{Column, Contact};

/// Substitute every `[Column]` placeholder with the contact's value.
///
/// Bracketed text that is not a known column is left as-is.
pub fn render(template: &str, contact: &Contact) -> String {
    let mut out = template.to_string();
    for col in Column::ALL {
        let placeholder = format!("[{}]", col.header());
        if out.contains(&placeholder) {
            out = out.replace(&placeholder, contact.field(col));
        }
    }
    out
}

/// Known placeholders used by the template, in column order.
pub fn placeholders(template: &str) -> Vec<Column> {
    Column::ALL
        .into_iter()
        .filter(|c| template.contains(&format!("[{}]", c.header())))
        .collect()
}

/// Bracketed tokens that do not name a column, in order of appearance.
pub fn unknown_placeholders(template: &str) -> Vec<String> {
    let mut found = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('[') {
        let after = &rest[start + 1..];
        let Some(end) = after.find(']') else {
            break;
        };
        let name = &after[..end];
        if !name.is_empty()
            && !name.contains('[')
            && Column::from_header(name).is_none()
            && !found.iter().any(|f: &String| f == name)
        {
            found.push(name.to_string());
        }
        rest = &after[end + 1..];
    }
    found
}
