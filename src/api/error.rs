use thiserror::Error;

/// Failure of a remote settings call
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("settings request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("settings service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid settings response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("cannot build settings URL: {0}")]
    InvalidUrl(String),
}

impl SyncError {
    /// Short, bounded description without response bodies or transport details
    pub fn summary(&self) -> String {
        match self {
            SyncError::Network(_) => "network error".to_string(),
            SyncError::Status { status, .. } => format!("status {status}"),
            SyncError::Decode(_) => "invalid response".to_string(),
            SyncError::InvalidUrl(_) => "invalid request".to_string(),
        }
    }
}

pub type SyncResult<T> = Result<T, SyncError>;
