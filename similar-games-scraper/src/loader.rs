use std::time::Duration;

use similar_games_core::SlugKey;

use crate::browser::{BrowserLauncher, BrowserSession};
use crate::error::PageError;
use crate::layout::{CatalogSite, PageLayout};

/// How the loader pulls in cards beyond the first batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStrategy {
    /// Scroll to the bottom until the document height stops changing.
    #[default]
    Scroll,
    /// Click the load-more control until it disappears or the budget runs out.
    LoadMore,
}

impl std::str::FromStr for LoadStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scroll" => Ok(Self::Scroll),
            "load-more" | "loadmore" | "load_more" | "click" => Ok(Self::LoadMore),
            other => Err(format!("unknown load strategy: '{other}'")),
        }
    }
}

/// Tunables for the page loader.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    pub strategy: LoadStrategy,
    /// How long to wait for the suggestions container after navigation.
    pub container_timeout: Duration,
    /// Pause after each scroll or click so new cards can render.
    pub settle_delay: Duration,
    /// Upper bound on scroll cycles, whatever the page does.
    pub max_scrolls: usize,
    /// Maximum load-more clicks.
    pub click_budget: usize,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            strategy: LoadStrategy::Scroll,
            container_timeout: Duration::from_secs(15),
            settle_delay: Duration::from_millis(1500),
            max_scrolls: 30,
            click_budget: 5,
        }
    }
}

/// HTML captured from a fully loaded suggestions page.
///
/// The browser session is already closed by the time this exists.
#[derive(Debug, Clone)]
pub struct LoadedPage {
    pub slug: SlugKey,
    pub url: String,
    /// Scheme and host for resolving relative links.
    pub origin: String,
    pub html: String,
}

/// Opens a suggestions page in a fresh session and drives it until all
/// wanted cards are present.
pub struct PageLoader<L> {
    launcher: L,
    site: CatalogSite,
    layout: PageLayout,
    options: LoaderOptions,
}

impl<L: BrowserLauncher> PageLoader<L> {
    pub fn new(launcher: L, site: CatalogSite, layout: PageLayout, options: LoaderOptions) -> Self {
        Self {
            launcher,
            site,
            layout,
            options,
        }
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn site(&self) -> &CatalogSite {
        &self.site
    }

    /// Load the suggestions page for `slug`, stopping once `page_limit`
    /// cards are present or the page stops growing.
    ///
    /// The session is closed before returning on every path, including
    /// timeouts and browser errors.
    pub async fn load(&self, slug: &SlugKey, page_limit: usize) -> Result<LoadedPage, PageError> {
        let url = self.site.suggestions_url(slug);
        let mut session = self.launcher.launch().await?;

        let result = self.drive(&mut session, &url, page_limit).await;

        if let Err(e) = session.close().await {
            log::warn!("Failed to close browser session for {}: {}", url, e);
        }

        result.map(|html| LoadedPage {
            slug: slug.clone(),
            url,
            origin: self.site.origin(),
            html,
        })
    }

    async fn drive(
        &self,
        session: &mut L::Session,
        url: &str,
        page_limit: usize,
    ) -> Result<String, PageError> {
        log::debug!("Opening {}", url);
        session.navigate(url).await?;

        let timeout = self.options.container_timeout;
        if !session.wait_for_selector(&self.layout.container, timeout).await? {
            return Err(PageError::ContainerTimeout {
                selector: self.layout.container.clone(),
                timeout,
            });
        }

        match self.options.strategy {
            LoadStrategy::Scroll => {
                let scrolls = self.scroll_until_stable(session, page_limit).await?;
                log::debug!("{}: {} scroll cycles", url, scrolls);
            }
            LoadStrategy::LoadMore => {
                let clicks = self.click_load_more(session).await?;
                log::debug!("{}: {} load-more clicks", url, clicks);
            }
        }

        session.page_source().await
    }

    /// Scroll until two consecutive height measurements match, the card
    /// count reaches `page_limit`, or `max_scrolls` is used up. Returns
    /// the number of scroll actions issued.
    pub(crate) async fn scroll_until_stable(
        &self,
        session: &mut L::Session,
        page_limit: usize,
    ) -> Result<usize, PageError> {
        let mut scrolls = 0;
        let mut last_height = session.document_height().await?;

        while scrolls < self.options.max_scrolls {
            if session.count(&self.layout.card).await? >= page_limit {
                break;
            }

            session.scroll_to_bottom().await?;
            scrolls += 1;
            tokio::time::sleep(self.options.settle_delay).await;

            let height = session.document_height().await?;
            if height == last_height {
                break;
            }
            last_height = height;
        }

        Ok(scrolls)
    }

    /// Click the load-more control up to `click_budget` times, stopping
    /// early once it is gone or hidden. Returns the number of clicks.
    pub(crate) async fn click_load_more(&self, session: &mut L::Session) -> Result<usize, PageError> {
        let mut clicks = 0;

        while clicks < self.options.click_budget {
            if !session.click_if_visible(&self.layout.load_more).await? {
                break;
            }
            clicks += 1;
            tokio::time::sleep(self.options.settle_delay).await;
        }

        Ok(clicks)
    }
}

#[cfg(test)]
#[path = "tests/loader_tests.rs"]
mod tests;
