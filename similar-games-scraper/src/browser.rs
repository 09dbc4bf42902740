//! Browser capability used by the page loader.
//!
//! The loader only needs a handful of primitives from a live page, so it
//! talks to them through these traits instead of a concrete driver. The
//! WebDriver backend in [`crate::webdriver`] is the production
//! implementation; tests drive the loader with scripted sessions.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::PageError;

/// One isolated browsing context, owned by the loader for a single game.
#[async_trait]
pub trait BrowserSession: Send {
    /// Open `url` in this session.
    async fn navigate(&mut self, url: &str) -> Result<(), PageError>;

    /// Wait up to `timeout` for an element matching `selector`.
    ///
    /// Returns `Ok(false)` when the wait runs out; errors are reserved for
    /// a broken session.
    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<bool, PageError>;

    /// Current scrollable height of the document, in pixels.
    async fn document_height(&mut self) -> Result<u64, PageError>;

    /// Number of elements currently matching `selector`.
    async fn count(&mut self, selector: &str) -> Result<usize, PageError>;

    async fn scroll_to_bottom(&mut self) -> Result<(), PageError>;

    /// Click the first element matching `selector` if it exists and is
    /// visible. Returns whether a click happened.
    async fn click_if_visible(&mut self, selector: &str) -> Result<bool, PageError>;

    /// Serialized HTML of the page as currently rendered.
    async fn page_source(&mut self) -> Result<String, PageError>;

    /// Tear the session down. Called exactly once, on every exit path.
    async fn close(self) -> Result<(), PageError>
    where
        Self: Sized;
}

/// Factory for fresh, isolated sessions: one per game, never reused.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    type Session: BrowserSession;

    async fn launch(&self) -> Result<Self::Session, PageError>;
}
