use similar_games_lib::SettingsError;
use similar_games_sheets::SheetsError;
use thiserror::Error;

/// Errors that end a CLI run.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Missing or invalid settings
    #[error("Config error: {0}")]
    Settings(#[from] SettingsError),

    /// Spreadsheet authentication or access failure
    #[error("Spreadsheet error: {0}")]
    Sheets(#[from] SheetsError),

    /// Runtime creation or async error
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl CliError {
    pub(crate) fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }

    /// Follow-up lines telling the user how to fix the problem, if any.
    pub(crate) fn hints(&self) -> Vec<String> {
        match self {
            Self::Settings(SettingsError::Missing { .. })
            | Self::Settings(SettingsError::Credentials(_))
            | Self::Sheets(SheetsError::Auth(_))
            | Self::Sheets(SheetsError::Credentials(_)) => vec![
                "Set credentials via environment variables:".to_string(),
                "  GAME_SHEET_URL             spreadsheet URL, id or name".to_string(),
                "  GOOGLE_SHEETS_CREDENTIALS  service account key JSON".to_string(),
                format!(
                    "Or add them to {}",
                    similar_games_lib::settings_path().display()
                ),
            ],
            Self::Sheets(SheetsError::SpreadsheetNotFound(_)) => vec![
                "Check the spreadsheet is shared with the service account's client_email."
                    .to_string(),
            ],
            Self::Sheets(SheetsError::WorksheetNotFound(_)) => vec![
                "Worksheet names are set with input_worksheet / output_worksheet under [sheets]."
                    .to_string(),
            ],
            _ => Vec::new(),
        }
    }
}
