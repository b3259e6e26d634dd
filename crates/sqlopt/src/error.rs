use thiserror::Error;

/// Failure categories surfaced to the user. Shape problems in a reply are
/// not errors; they travel as [`crate::adapter::ShapeWarning`] values.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("configuration error: missing required secret(s): {}", missing.join(", "))]
    MissingConfig { missing: Vec<String> },

    #[error("configuration error: {0}")]
    InvalidConfig(String),

    #[error("input error: {0}")]
    Input(String),

    #[error("error during analysis API call: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("error during analysis API call: {0}")]
    Remote(String),

    #[error("failed to parse the JSON response from the AI model: {detail}")]
    Parse { detail: String, raw: String },

    #[error("error generating Word document: {0}")]
    Document(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Input,
    Remote,
    Parse,
    Document,
}

impl AnalyzerError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingConfig { .. } | Self::InvalidConfig(_) => ErrorKind::Configuration,
            Self::Input(_) => ErrorKind::Input,
            Self::Transport(_) | Self::Remote(_) => ErrorKind::Remote,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::Document(_) => ErrorKind::Document,
        }
    }

    /// The offending reply text, for parse failures.
    #[must_use]
    pub fn raw_reply(&self) -> Option<&str> {
        match self {
            Self::Parse { raw, .. } => Some(raw.as_str()),
            _ => None,
        }
    }
}
