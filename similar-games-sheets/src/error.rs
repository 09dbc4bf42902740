/// Errors from the spreadsheet backend.
///
/// `Auth`, `SpreadsheetNotFound` and `WorksheetNotFound` end the run; the
/// rest surface as a per-game failure when they happen while writing.
#[derive(Debug, thiserror::Error)]
pub enum SheetsError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Sheets API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Spreadsheet not found: {0}")]
    SpreadsheetNotFound(String),

    #[error("Worksheet '{0}' not found")]
    WorksheetNotFound(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid credentials: {0}")]
    Credentials(String),
}

impl SheetsError {
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    pub fn credentials(msg: impl Into<String>) -> Self {
        Self::Credentials(msg.into())
    }

    /// Whether this error should stop the whole run rather than one game.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Auth(_)
                | Self::Credentials(_)
                | Self::SpreadsheetNotFound(_)
                | Self::WorksheetNotFound(_)
        )
    }
}
