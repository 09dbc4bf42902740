use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use similar_games_core::{GameTitle, resolve};

use super::*;

/// What a scripted page does, indexed by how many scrolls have happened.
#[derive(Clone, Default)]
struct Script {
    heights: Vec<u64>,
    cards: Vec<usize>,
    container_missing: bool,
    navigate_fails: bool,
    load_more_clicks_available: usize,
}

#[derive(Default)]
struct Record {
    navigated: Vec<String>,
    scrolls: usize,
    clicks: usize,
    closes: usize,
}

struct FakeSession {
    script: Script,
    record: Arc<Mutex<Record>>,
}

impl FakeSession {
    fn at<T: Copy + Default>(values: &[T], index: usize) -> T {
        values
            .get(index)
            .or_else(|| values.last())
            .copied()
            .unwrap_or_default()
    }

    fn scrolls(&self) -> usize {
        self.record.lock().unwrap().scrolls
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn navigate(&mut self, url: &str) -> Result<(), PageError> {
        if self.script.navigate_fails {
            return Err(PageError::Navigation {
                url: url.to_string(),
                message: "connection refused".to_string(),
            });
        }
        self.record.lock().unwrap().navigated.push(url.to_string());
        Ok(())
    }

    async fn wait_for_selector(&mut self, _: &str, _: Duration) -> Result<bool, PageError> {
        Ok(!self.script.container_missing)
    }

    async fn document_height(&mut self) -> Result<u64, PageError> {
        Ok(Self::at(&self.script.heights, self.scrolls()))
    }

    async fn count(&mut self, _: &str) -> Result<usize, PageError> {
        Ok(Self::at(&self.script.cards, self.scrolls()))
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), PageError> {
        self.record.lock().unwrap().scrolls += 1;
        Ok(())
    }

    async fn click_if_visible(&mut self, _: &str) -> Result<bool, PageError> {
        let mut record = self.record.lock().unwrap();
        if record.clicks < self.script.load_more_clicks_available {
            record.clicks += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn page_source(&mut self) -> Result<String, PageError> {
        Ok("<html><body><div class=\"suggestions-list\"></div></body></html>".to_string())
    }

    async fn close(self) -> Result<(), PageError> {
        self.record.lock().unwrap().closes += 1;
        Ok(())
    }
}

struct FakeLauncher {
    script: Script,
    record: Arc<Mutex<Record>>,
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    type Session = FakeSession;

    async fn launch(&self) -> Result<FakeSession, PageError> {
        Ok(FakeSession {
            script: self.script.clone(),
            record: self.record.clone(),
        })
    }
}

fn loader(script: Script, options: LoaderOptions) -> (PageLoader<FakeLauncher>, Arc<Mutex<Record>>) {
    let record = Arc::new(Mutex::new(Record::default()));
    let launcher = FakeLauncher {
        script,
        record: record.clone(),
    };
    let loader = PageLoader::new(
        launcher,
        CatalogSite::default(),
        PageLayout::default(),
        options,
    );
    (loader, record)
}

fn fast_options() -> LoaderOptions {
    LoaderOptions {
        settle_delay: Duration::ZERO,
        container_timeout: Duration::from_millis(10),
        ..LoaderOptions::default()
    }
}

fn hades() -> SlugKey {
    resolve(&GameTitle::new("Hades"))
}

#[tokio::test]
async fn scroll_stops_one_cycle_after_growth_ends() {
    // Grows twice, then stays at 300.
    let script = Script {
        heights: vec![100, 200, 300, 300],
        cards: vec![4],
        ..Script::default()
    };
    let (loader, record) = loader(script, fast_options());

    let page = loader.load(&hades(), 100).await.unwrap();

    assert_eq!(page.url, "https://rawg.io/games/hades/suggestions");
    assert_eq!(page.origin, "https://rawg.io");
    let record = record.lock().unwrap();
    assert_eq!(record.scrolls, 3);
    assert_eq!(record.closes, 1);
    assert_eq!(record.navigated, vec!["https://rawg.io/games/hades/suggestions"]);
}

#[tokio::test]
async fn static_page_scrolls_once() {
    let script = Script {
        heights: vec![500],
        cards: vec![3],
        ..Script::default()
    };
    let (loader, record) = loader(script, fast_options());

    loader.load(&hades(), 100).await.unwrap();

    assert_eq!(record.lock().unwrap().scrolls, 1);
}

#[tokio::test]
async fn stops_when_enough_cards_are_present() {
    // Height would keep growing forever; the card count ends it.
    let script = Script {
        heights: (1..=50).map(|n| n * 100).collect(),
        cards: vec![5, 10, 20, 40],
        ..Script::default()
    };
    let (loader, record) = loader(script, fast_options());

    loader.load(&hades(), 20).await.unwrap();

    assert_eq!(record.lock().unwrap().scrolls, 2);
}

#[tokio::test]
async fn endless_page_is_capped_by_max_scrolls() {
    let script = Script {
        heights: (1..=100).map(|n| n * 100).collect(),
        cards: vec![1],
        ..Script::default()
    };
    let options = LoaderOptions {
        max_scrolls: 4,
        ..fast_options()
    };
    let (loader, record) = loader(script, options);

    loader.load(&hades(), 1000).await.unwrap();

    assert_eq!(record.lock().unwrap().scrolls, 4);
}

#[tokio::test]
async fn missing_container_times_out_and_closes_session() {
    let script = Script {
        container_missing: true,
        ..Script::default()
    };
    let (loader, record) = loader(script, fast_options());

    let err = loader.load(&hades(), 10).await.unwrap_err();

    assert!(matches!(err, PageError::ContainerTimeout { .. }));
    let record = record.lock().unwrap();
    assert_eq!(record.scrolls, 0);
    assert_eq!(record.closes, 1);
}

#[tokio::test]
async fn navigation_failure_still_closes_session() {
    let script = Script {
        navigate_fails: true,
        ..Script::default()
    };
    let (loader, record) = loader(script, fast_options());

    let err = loader.load(&hades(), 10).await.unwrap_err();

    assert!(matches!(err, PageError::Navigation { .. }));
    assert_eq!(record.lock().unwrap().closes, 1);
}

#[tokio::test]
async fn load_more_stops_when_control_disappears() {
    let script = Script {
        load_more_clicks_available: 2,
        ..Script::default()
    };
    let options = LoaderOptions {
        strategy: LoadStrategy::LoadMore,
        click_budget: 5,
        ..fast_options()
    };
    let (loader, record) = loader(script, options);

    loader.load(&hades(), 10).await.unwrap();

    let record = record.lock().unwrap();
    assert_eq!(record.clicks, 2);
    assert_eq!(record.scrolls, 0);
    assert_eq!(record.closes, 1);
}

#[tokio::test]
async fn load_more_respects_click_budget() {
    let script = Script {
        load_more_clicks_available: 50,
        ..Script::default()
    };
    let options = LoaderOptions {
        strategy: LoadStrategy::LoadMore,
        click_budget: 3,
        ..fast_options()
    };
    let (loader, record) = loader(script, options);

    loader.load(&hades(), 10).await.unwrap();

    assert_eq!(record.lock().unwrap().clicks, 3);
}

#[test]
fn load_strategy_parses_known_names() {
    assert_eq!("scroll".parse::<LoadStrategy>().unwrap(), LoadStrategy::Scroll);
    assert_eq!("Load-More".parse::<LoadStrategy>().unwrap(), LoadStrategy::LoadMore);
    assert!("teleport".parse::<LoadStrategy>().is_err());
}
