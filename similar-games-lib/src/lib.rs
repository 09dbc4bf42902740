//! Orchestration for similar-games: settings, the run loop that ties the
//! scraper to the spreadsheet, and the per-run log.

pub mod run_log;
pub mod runner;
pub mod settings;

pub use run_log::{LogEntry, RunLog, RunSummary};
pub use runner::{RunEvent, RunMode, RunOptions, run};
pub use settings::{CredentialsSource, Settings, SettingsError, settings_path};
