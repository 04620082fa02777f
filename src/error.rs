use thiserror::Error;

/// Fatal error type for relkb.
///
/// Problems inside a well-formed document are never reported here; they become
/// validation findings. Only input that cannot be read or parsed at all ends up
/// as a `KbError`.
#[derive(Error, Debug)]
pub enum KbError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input is not a dataset document
    #[error("Parse error: {0}")]
    Parse(String),

    /// No document format registered for the file extension
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// File watcher errors
    #[error("Watch error: {0}")]
    Watch(String),
}

/// Convenient Result type using KbError
pub type Result<T> = std::result::Result<T, KbError>;
