use thiserror::Error;

/// Failure to load a street-name list.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum NameListError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("name list is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("name list has an unexpected shape: {reason}")]
    UnexpectedShape { reason: &'static str },
    #[error("name list contains no street names")]
    EmptyInput,
}

impl NameListError {
    /// Stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "NAMES_IO",
            Self::Json(_) => "NAMES_JSON",
            Self::UnexpectedShape { .. } => "NAMES_UNEXPECTED_SHAPE",
            Self::EmptyInput => "NAMES_EMPTY_INPUT",
        }
    }
}
