//! Run settings.
//!
//! Resolved with the priority environment variable > settings file >
//! default. The settings file is `~/.config/similar-games/settings.toml`
//! (or the platform's config directory).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use similar_games_core::Platform;
use similar_games_scraper::layout::DEFAULT_CATALOG_HOST;
use similar_games_scraper::pipeline::DEFAULT_PAGE_LIMIT;
use similar_games_scraper::webdriver::{DEFAULT_USER_AGENT, DEFAULT_WEBDRIVER_URL};
use similar_games_scraper::{
    CatalogSite, LoadStrategy, LoaderOptions, PageLayout, PageLoader, ScrapePipeline,
    SuggestionFilter, WebDriverLauncher,
};
use similar_games_sheets::{ServiceAccountKey, SheetsError, SpreadsheetRef};
use tokio::time::Duration;

use crate::runner::{DEFAULT_GAME_DELAY, RunOptions};

pub const ENV_SPREADSHEET: &str = "GAME_SHEET_URL";
pub const ENV_CREDENTIALS: &str = "GOOGLE_SHEETS_CREDENTIALS";
pub const ENV_CREDENTIALS_FILE: &str = "GOOGLE_SHEETS_CREDENTIALS_FILE";
pub const ENV_WEBDRIVER_URL: &str = "SIMILAR_GAMES_WEBDRIVER_URL";
pub const ENV_CATALOG_HOST: &str = "SIMILAR_GAMES_CATALOG_HOST";
pub const ENV_HEADLESS: &str = "SIMILAR_GAMES_HEADLESS";

pub const DEFAULT_INPUT_WORKSHEET: &str = "Jogos";
pub const DEFAULT_OUTPUT_WORKSHEET: &str = "Jogos Similares";

/// Errors while resolving settings. All of them end the run.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: String, message: String },

    #[error("Missing {what}. {hint}")]
    Missing { what: &'static str, hint: String },

    #[error(transparent)]
    Credentials(#[from] SheetsError),
}

impl SettingsError {
    fn invalid(key: &str, message: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Canonical path to the settings file.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("similar-games").join("settings.toml")
}

/// TOML file format. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SettingsFile {
    sheets: SheetsSection,
    catalog: CatalogSection,
    browser: BrowserSection,
    run: RunSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SheetsSection {
    spreadsheet: Option<String>,
    credentials_path: Option<PathBuf>,
    input_worksheet: Option<String>,
    output_worksheet: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CatalogSection {
    host: Option<String>,
    strategy: Option<String>,
    page_limit: Option<usize>,
    max_scrolls: Option<usize>,
    click_budget: Option<usize>,
    settle_delay_ms: Option<u64>,
    container_timeout_secs: Option<u64>,
    allowed_platforms: Option<Vec<String>>,
    max_results: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct BrowserSection {
    webdriver_url: Option<String>,
    headless: Option<bool>,
    user_agent: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RunSection {
    game_delay_ms: Option<u64>,
}

/// Where the service-account key comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsSource {
    /// JSON key text, usually from `GOOGLE_SHEETS_CREDENTIALS`.
    Json(String),
    /// Path to a JSON key file.
    File(PathBuf),
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub spreadsheet: Option<String>,
    pub credentials: Option<CredentialsSource>,
    pub input_worksheet: String,
    pub output_worksheet: String,
    pub catalog_host: String,
    pub webdriver_url: String,
    pub headless: bool,
    pub user_agent: String,
    pub loader: LoaderOptions,
    pub page_limit: usize,
    pub filter: SuggestionFilter,
    pub game_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            spreadsheet: None,
            credentials: None,
            input_worksheet: DEFAULT_INPUT_WORKSHEET.to_string(),
            output_worksheet: DEFAULT_OUTPUT_WORKSHEET.to_string(),
            catalog_host: DEFAULT_CATALOG_HOST.to_string(),
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            headless: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            loader: LoaderOptions::default(),
            page_limit: DEFAULT_PAGE_LIMIT,
            filter: SuggestionFilter::default(),
            game_delay: DEFAULT_GAME_DELAY,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Settings {
    /// Load from the process environment and the settings file, if present.
    pub fn load() -> Result<Self, SettingsError> {
        let path = settings_path();
        let contents = read_optional(&path)?;
        Self::resolve(contents.as_deref(), &path, |key| std::env::var(key).ok())
    }

    /// Resolve from explicit sources. `file` is the settings file text (if
    /// any) and `path` is only used in error messages.
    pub fn resolve(
        file: Option<&str>,
        path: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SettingsError> {
        let file: SettingsFile = match file {
            Some(text) => toml::from_str(text).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?,
            None => SettingsFile::default(),
        };
        let var = |key: &str| non_empty(env(key));
        let mut settings = Self::default();

        settings.spreadsheet = var(ENV_SPREADSHEET).or(non_empty(file.sheets.spreadsheet));
        settings.credentials = var(ENV_CREDENTIALS)
            .map(CredentialsSource::Json)
            .or_else(|| var(ENV_CREDENTIALS_FILE).map(|p| CredentialsSource::File(p.into())))
            .or_else(|| file.sheets.credentials_path.map(CredentialsSource::File));
        if let Some(name) = non_empty(file.sheets.input_worksheet) {
            settings.input_worksheet = name;
        }
        if let Some(name) = non_empty(file.sheets.output_worksheet) {
            settings.output_worksheet = name;
        }

        if let Some(host) = var(ENV_CATALOG_HOST).or(non_empty(file.catalog.host)) {
            settings.catalog_host = host;
        }
        if let Some(strategy) = file.catalog.strategy {
            settings.loader.strategy = strategy
                .parse::<LoadStrategy>()
                .map_err(|e| SettingsError::invalid("catalog.strategy", e))?;
        }
        if let Some(limit) = file.catalog.page_limit {
            settings.page_limit = positive("catalog.page_limit", limit)?;
        }
        if let Some(max) = file.catalog.max_scrolls {
            settings.loader.max_scrolls = positive("catalog.max_scrolls", max)?;
        }
        if let Some(budget) = file.catalog.click_budget {
            settings.loader.click_budget = budget;
        }
        if let Some(ms) = file.catalog.settle_delay_ms {
            settings.loader.settle_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = file.catalog.container_timeout_secs {
            settings.loader.container_timeout = Duration::from_secs(secs);
        }
        if let Some(codes) = file.catalog.allowed_platforms {
            settings.filter.allowed_platforms = codes
                .iter()
                .map(|code| {
                    code.parse::<Platform>()
                        .map_err(|e| SettingsError::invalid("catalog.allowed_platforms", e.to_string()))
                })
                .collect::<Result<_, _>>()?;
        }
        if let Some(max) = file.catalog.max_results {
            settings.filter.max_results = positive("catalog.max_results", max)?;
        }

        if let Some(url) = var(ENV_WEBDRIVER_URL).or(non_empty(file.browser.webdriver_url)) {
            settings.webdriver_url = url;
        }
        match var(ENV_HEADLESS) {
            Some(value) => settings.headless = parse_bool(ENV_HEADLESS, &value)?,
            None => {
                if let Some(headless) = file.browser.headless {
                    settings.headless = headless;
                }
            }
        }
        if let Some(agent) = non_empty(file.browser.user_agent) {
            settings.user_agent = agent;
        }

        if let Some(ms) = file.run.game_delay_ms {
            settings.game_delay = Duration::from_millis(ms);
        }

        Ok(settings)
    }

    /// The spreadsheet to open, or an error naming where to set it.
    pub fn spreadsheet_ref(&self) -> Result<SpreadsheetRef, SettingsError> {
        self.spreadsheet
            .as_deref()
            .map(SpreadsheetRef::parse)
            .ok_or_else(|| SettingsError::Missing {
                what: "spreadsheet",
                hint: format!(
                    "Set {} or add `spreadsheet` under [sheets] in {}",
                    ENV_SPREADSHEET,
                    settings_path().display()
                ),
            })
    }

    /// Load the service-account key from the configured source.
    pub fn service_account_key(&self) -> Result<ServiceAccountKey, SettingsError> {
        match &self.credentials {
            Some(CredentialsSource::Json(json)) => Ok(ServiceAccountKey::from_json(json)?),
            Some(CredentialsSource::File(path)) => Ok(ServiceAccountKey::from_file(path)?),
            None => Err(SettingsError::Missing {
                what: "service account credentials",
                hint: format!(
                    "Set {} (key JSON) or {} (key file path)",
                    ENV_CREDENTIALS, ENV_CREDENTIALS_FILE
                ),
            }),
        }
    }

    pub fn launcher(&self) -> WebDriverLauncher {
        WebDriverLauncher {
            server_url: self.webdriver_url.clone(),
            headless: self.headless,
            user_agent: self.user_agent.clone(),
        }
    }

    /// Scrape pipeline backed by a WebDriver browser.
    pub fn pipeline(&self) -> ScrapePipeline<WebDriverLauncher> {
        let loader = PageLoader::new(
            self.launcher(),
            CatalogSite::new(&self.catalog_host),
            PageLayout::default(),
            self.loader.clone(),
        );
        ScrapePipeline::new(loader, self.filter.clone(), self.page_limit)
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            game_delay: self.game_delay,
        }
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, SettingsError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(SettingsError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn positive(key: &str, value: usize) -> Result<usize, SettingsError> {
    if value == 0 {
        Err(SettingsError::invalid(key, "must be at least 1"))
    } else {
        Ok(value)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, SettingsError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(SettingsError::invalid(key, format!("expected a boolean, got '{other}'"))),
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
