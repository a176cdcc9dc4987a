//! Request building and chunking.

use serde::Serialize;

/// Cloud API limit for a text body.
pub(super) const MAX_BODY_LEN: usize = 4096;

#[derive(Debug, Serialize)]
pub(super) struct TextBody<'a> {
    pub body: &'a str,
}

/// JSON payload of a text message.
#[derive(Debug, Serialize)]
pub(super) struct TextMessage<'a> {
    pub messaging_product: &'static str,
    pub to: &'a str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: TextBody<'a>,
}

impl<'a> TextMessage<'a> {
    pub(super) fn new(to: &'a str, body: &'a str) -> Self {
        Self {
            messaging_product: "whatsapp",
            to,
            kind: "text",
            text: TextBody { body },
        }
    }
}

/// The Cloud API wants the recipient without the leading `+`.
pub(super) fn recipient(phone: &str) -> &str {
    phone.trim().trim_start_matches('+')
}

/// Split a long message into chunks that respect WhatsApp's 4096 limit.
///
/// Prefers line breaks; never splits inside a UTF-8 character.
pub(super) fn split_message(text: &str, max_len: usize) -> Vec<&str> {
    if text.len() <= max_len {
        return vec![text];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = (start + max_len).min(text.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        if end == start {
            end += text[start..].chars().next().map_or(1, char::len_utf8);
        }
        let break_at = if end < text.len() {
            text[start..end]
                .rfind('\n')
                .map(|i| start + i + 1)
                .unwrap_or(end)
        } else {
            end
        };
        chunks.push(&text[start..break_at]);
        start = break_at;
    }

    chunks
}
