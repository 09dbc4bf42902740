use similar_games_core::{GameTitle, Suggestion, resolve};

use crate::browser::BrowserLauncher;
use crate::error::PageError;
use crate::extract::extract;
use crate::filter::SuggestionFilter;
use crate::loader::PageLoader;

/// Default number of cards the loader waits for before it stops scrolling.
pub const DEFAULT_PAGE_LIMIT: usize = 40;

/// Result of scraping one base game.
#[derive(Debug)]
pub enum GameOutcome {
    /// Suggestions that passed the filter; may be empty.
    Scraped(Vec<Suggestion>),
    /// The page could not be loaded or read. The run moves on.
    Failed(PageError),
}

impl GameOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Slug resolution, page load, extraction and filtering for one game.
pub struct ScrapePipeline<L> {
    loader: PageLoader<L>,
    filter: SuggestionFilter,
    page_limit: usize,
}

impl<L: BrowserLauncher> ScrapePipeline<L> {
    pub fn new(loader: PageLoader<L>, filter: SuggestionFilter, page_limit: usize) -> Self {
        Self {
            loader,
            filter,
            page_limit,
        }
    }

    pub fn filter(&self) -> &SuggestionFilter {
        &self.filter
    }

    /// Scrape the suggestions for `title`. Never panics and never returns
    /// early on a page problem; failures come back as [`GameOutcome::Failed`].
    pub async fn scrape_game(&self, title: &GameTitle) -> GameOutcome {
        match self.try_scrape(title).await {
            Ok(suggestions) => GameOutcome::Scraped(suggestions),
            Err(e) => GameOutcome::Failed(e),
        }
    }

    async fn try_scrape(&self, title: &GameTitle) -> Result<Vec<Suggestion>, PageError> {
        let slug = resolve(title);
        log::debug!("'{}' resolved to slug '{}'", title, slug);

        let page = self.loader.load(&slug, self.page_limit).await?;
        let candidates = extract(&page, self.loader.layout())?;
        let found = candidates.len();

        let kept = self.filter.apply(candidates);
        log::debug!("'{}': {} candidates, {} kept", title, found, kept.len());
        Ok(kept)
    }
}
