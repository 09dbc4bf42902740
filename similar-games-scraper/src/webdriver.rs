//! WebDriver-backed browser sessions (ChromeDriver or compatible).

use std::time::Duration;

use async_trait::async_trait;
use thirtyfour::prelude::*;

use crate::browser::{BrowserLauncher, BrowserSession};
use crate::error::PageError;

/// Default ChromeDriver endpoint.
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

/// Desktop browser user agent presented to the catalog.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

const POLL_INTERVAL: Duration = Duration::from_millis(250);

const HEIGHT_SCRIPT: &str = "return document.body.scrollHeight;";
const SCROLL_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// Starts a new WebDriver session per game.
#[derive(Debug, Clone)]
pub struct WebDriverLauncher {
    pub server_url: String,
    pub headless: bool,
    pub user_agent: String,
}

impl Default for WebDriverLauncher {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_WEBDRIVER_URL.to_string(),
            headless: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl WebDriverLauncher {
    fn chrome_args(&self) -> Vec<String> {
        let mut args = vec![
            "--no-sandbox".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--disable-gpu".to_string(),
            "--window-size=1920,1080".to_string(),
            "--disable-blink-features=AutomationControlled".to_string(),
            format!("--user-agent={}", self.user_agent),
        ];
        if self.headless {
            args.insert(0, "--headless=new".to_string());
        }
        args
    }
}

#[async_trait]
impl BrowserLauncher for WebDriverLauncher {
    type Session = WebDriverSession;

    async fn launch(&self) -> Result<WebDriverSession, PageError> {
        let mut caps = DesiredCapabilities::chrome();
        caps.add_chrome_option("args", self.chrome_args())
            .map_err(|e| PageError::launch(e.to_string()))?;

        let driver = WebDriver::new(&self.server_url, caps).await.map_err(|e| {
            PageError::launch(format!("cannot reach WebDriver at {}: {}", self.server_url, e))
        })?;

        Ok(WebDriverSession { driver })
    }
}

/// A live WebDriver session. Closed through [`BrowserSession::close`].
pub struct WebDriverSession {
    driver: WebDriver,
}

fn browser_err(e: WebDriverError) -> PageError {
    PageError::browser(e.to_string())
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    async fn navigate(&mut self, url: &str) -> Result<(), PageError> {
        self.driver
            .goto(url)
            .await
            .map_err(|e| PageError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<bool, PageError> {
        self.driver
            .query(By::Css(selector))
            .wait(timeout, POLL_INTERVAL)
            .exists()
            .await
            .map_err(browser_err)
    }

    async fn document_height(&mut self) -> Result<u64, PageError> {
        let ret = self
            .driver
            .execute(HEIGHT_SCRIPT, Vec::new())
            .await
            .map_err(browser_err)?;
        ret.json()
            .as_u64()
            .or_else(|| ret.json().as_f64().map(|h| h as u64))
            .ok_or_else(|| PageError::browser(format!("unexpected page height: {}", ret.json())))
    }

    async fn count(&mut self, selector: &str) -> Result<usize, PageError> {
        let elements = self
            .driver
            .find_all(By::Css(selector))
            .await
            .map_err(browser_err)?;
        Ok(elements.len())
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), PageError> {
        self.driver
            .execute(SCROLL_SCRIPT, Vec::new())
            .await
            .map_err(browser_err)?;
        Ok(())
    }

    async fn click_if_visible(&mut self, selector: &str) -> Result<bool, PageError> {
        let elements = self
            .driver
            .find_all(By::Css(selector))
            .await
            .map_err(browser_err)?;
        let Some(button) = elements.into_iter().next() else {
            return Ok(false);
        };

        if !button.is_displayed().await.map_err(browser_err)? {
            return Ok(false);
        }

        // An overlay or a detached node makes the click fail; treat it as
        // the control being gone.
        match button.click().await {
            Ok(()) => Ok(true),
            Err(e) => {
                log::debug!("Click on '{}' failed: {}", selector, e);
                Ok(false)
            }
        }
    }

    async fn page_source(&mut self) -> Result<String, PageError> {
        self.driver.source().await.map_err(browser_err)
    }

    async fn close(self) -> Result<(), PageError> {
        self.driver.quit().await.map_err(browser_err)
    }
}
