use thiserror::Error;

/// Top-level error type for Nostra.
#[derive(Debug, Error)]
pub enum NostraError {
    /// The imported sheet lacks one or more required columns.
    #[error("missing columns: {}", .0.join(", "))]
    ImportColumnsMissing(Vec<String>),

    /// Any other import failure (unreadable file, malformed rows).
    #[error("import error: {0}")]
    Import(String),

    /// A phone number that matches none of the accepted shapes.
    #[error("invalid phone number: {0}")]
    InvalidPhoneFormat(String),

    /// Error from a delivery channel.
    #[error("delivery error: {0}")]
    Delivery(String),

    /// Contact/history storage error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
