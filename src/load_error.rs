#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Data file not found: {0}")]
    FileNotFound(String),
    #[error("Failed to read data file: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Snapshot not found (404): {0}")]
    NotFound(String),
    #[error("Server error (5xx): {0}")]
    ServerError(String),
    #[error("Unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },
    #[error("Failed to parse snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl LoadError {
    /// Whether a later attempt could succeed (server and transport failures)
    pub fn is_retryable(&self) -> bool {
        match self {
            LoadError::ServerError(_) => true,
            LoadError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }
}
