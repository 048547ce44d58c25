use thiserror::Error;

/// Longest response body excerpt kept on a rejected message
pub const MAX_BODY_EXCERPT: usize = 512;

#[derive(Error, Debug)]
pub enum DataCollectorError {
    #[error("Invalid data collector URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Failed to encode payload: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Data collector request failed: {0}")]
    Transport(#[from] ureq::Error),
    #[error("Data collector rejected message with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}

impl DataCollectorError {
    pub(crate) fn rejected(status: u16, body: &str) -> Self {
        let body = match body.char_indices().nth(MAX_BODY_EXCERPT) {
            Some((idx, _)) => format!("{}...", &body[..idx]),
            None => body.to_string(),
        };
        Self::Rejected { status, body }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(ureq::Error::Timeout(_)))
    }

    /// HTTP status of a rejected message
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DataCollectorError>;
