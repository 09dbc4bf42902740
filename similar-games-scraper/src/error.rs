use std::time::Duration;

/// Errors that end the scrape of a single game.
///
/// None of these stop a run; the game is logged as failed and the run
/// moves on to the next title.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("Failed to start browser session: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Suggestions container '{selector}' did not appear within {}s", timeout.as_secs())]
    ContainerTimeout { selector: String, timeout: Duration },

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Extraction failed: {0}")]
    Extract(#[from] ExtractError),
}

impl PageError {
    pub fn launch(msg: impl Into<String>) -> Self {
        Self::Launch(msg.into())
    }

    pub fn browser(msg: impl Into<String>) -> Self {
        Self::Browser(msg.into())
    }
}

/// Errors raised while reading suggestion cards.
///
/// Card-level variants only drop the offending card; `InvalidSelector`
/// fails the whole page.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("Card has no title link")]
    MissingTitleLink,

    #[error("Title link has no href")]
    MissingHref,

    #[error("Title link text is empty")]
    EmptyTitle,
}
