use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use similar_games_core::{GameTitle, Platform};
use similar_games_scraper::{
    BrowserLauncher, BrowserSession, CatalogSite, GameOutcome, LoaderOptions, PageError,
    PageLayout, PageLoader, ScrapePipeline, SuggestionFilter,
};

/// Serves the same static page for every navigation and remembers the URLs.
struct StaticPage {
    html: String,
    visited: Arc<Mutex<Vec<String>>>,
    container_present: bool,
}

struct StaticSession {
    html: String,
    visited: Arc<Mutex<Vec<String>>>,
    container_present: bool,
}

#[async_trait]
impl BrowserSession for StaticSession {
    async fn navigate(&mut self, url: &str) -> Result<(), PageError> {
        self.visited.lock().unwrap().push(url.to_string());
        Ok(())
    }

    async fn wait_for_selector(&mut self, _: &str, _: Duration) -> Result<bool, PageError> {
        Ok(self.container_present)
    }

    async fn document_height(&mut self) -> Result<u64, PageError> {
        Ok(1200)
    }

    async fn count(&mut self, _: &str) -> Result<usize, PageError> {
        Ok(0)
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), PageError> {
        Ok(())
    }

    async fn click_if_visible(&mut self, _: &str) -> Result<bool, PageError> {
        Ok(false)
    }

    async fn page_source(&mut self) -> Result<String, PageError> {
        Ok(self.html.clone())
    }

    async fn close(self) -> Result<(), PageError> {
        Ok(())
    }
}

#[async_trait]
impl BrowserLauncher for StaticPage {
    type Session = StaticSession;

    async fn launch(&self) -> Result<StaticSession, PageError> {
        Ok(StaticSession {
            html: self.html.clone(),
            visited: self.visited.clone(),
            container_present: self.container_present,
        })
    }
}

const SUGGESTIONS_PAGE: &str = r#"
<html><body><div class="suggestions-list">
  <div class="game-card">
    <div class="game-card-platforms">
      <i class="platform-icon platform-icon--pc"></i>
      <i class="platform-icon platform-icon--playstation"></i>
    </div>
    <a class="game-card-title" href="/games/dead-cells">Dead Cells</a>
    <div class="metacritic-score">89</div>
  </div>
  <div class="game-card">
    <div class="game-card-platforms"><i class="platform-icon platform-icon--xbox"></i></div>
    <a class="game-card-title" href="/games/xbox-only">Xbox Only</a>
    <div class="metacritic-score">91</div>
  </div>
  <div class="game-card">
    <div class="game-card-platforms"><i class="platform-icon platform-icon--pc"></i></div>
    <a class="game-card-title" href="/games/unrated">Unrated</a>
  </div>
  <div class="game-card">
    <div class="game-card-platforms"><i class="platform-icon platform-icon--playstation"></i></div>
    <a class="game-card-title" href="/games/bastion">Bastion</a>
    <div class="metacritic-score">86</div>
  </div>
</div></body></html>
"#;

fn pipeline(container_present: bool) -> (ScrapePipeline<StaticPage>, Arc<Mutex<Vec<String>>>) {
    let visited = Arc::new(Mutex::new(Vec::new()));
    let launcher = StaticPage {
        html: SUGGESTIONS_PAGE.to_string(),
        visited: visited.clone(),
        container_present,
    };
    let options = LoaderOptions {
        settle_delay: Duration::ZERO,
        ..LoaderOptions::default()
    };
    let loader = PageLoader::new(
        launcher,
        CatalogSite::default(),
        PageLayout::default(),
        options,
    );
    (
        ScrapePipeline::new(loader, SuggestionFilter::default(), 40),
        visited,
    )
}

#[tokio::test]
async fn scrapes_and_filters_suggestions() {
    let (pipeline, visited) = pipeline(true);

    let outcome = pipeline.scrape_game(&GameTitle::new("Hollow Knight")).await;

    let GameOutcome::Scraped(found) = outcome else {
        panic!("expected suggestions, got {outcome:?}");
    };
    let titles: Vec<_> = found.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Dead Cells", "Bastion"]);
    assert_eq!(found[0].url, "https://rawg.io/games/dead-cells");
    assert_eq!(found[0].platforms, vec![Platform::Pc, Platform::PlayStation]);
    assert_eq!(
        visited.lock().unwrap().as_slice(),
        ["https://rawg.io/games/hollow-knight/suggestions"]
    );
}

#[tokio::test]
async fn override_slug_is_used_for_navigation() {
    let (pipeline, visited) = pipeline(true);

    pipeline.scrape_game(&GameTitle::new("god of war")).await;

    assert_eq!(
        visited.lock().unwrap().as_slice(),
        ["https://rawg.io/games/god-of-war-2/suggestions"]
    );
}

#[tokio::test]
async fn missing_container_is_a_failed_outcome() {
    let (pipeline, _) = pipeline(false);

    let outcome = pipeline.scrape_game(&GameTitle::new("Nonexistent Game")).await;

    assert!(matches!(
        outcome,
        GameOutcome::Failed(PageError::ContainerTimeout { .. })
    ));
}
