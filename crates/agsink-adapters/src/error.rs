use std::fmt;

/// Result type for agsink-adapters operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading and normalizing transcripts
#[derive(Debug)]
pub enum Error {
    /// IO operation failed (unreadable or missing transcript)
    Io(std::io::Error),

    /// JSON parsing failed for a whole document
    Json(serde_json::Error),

    /// No adapter exists for the requested source
    Provider(String),

    /// Transcript structure is invalid (missing session id, wrong shape, etc.)
    Parse(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Json(err) => write!(f, "JSON error: {}", err),
            Error::Provider(msg) => write!(f, "Provider error: {}", msg),
            Error::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
            Error::Provider(_) | Error::Parse(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}
