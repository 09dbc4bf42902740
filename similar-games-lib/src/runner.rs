//! The run loop: pick the games to process, scrape each in turn, and
//! commit its rows before moving on.

use similar_games_core::GameTitle;
use similar_games_scraper::{BrowserLauncher, GameOutcome, ScrapePipeline};
use similar_games_sheets::{
    HeaderStatus, Replaced, SheetsError, SyncEngine, Worksheet, plan, read_titles,
};
use tokio::sync::mpsc;
use tokio::time::Duration;

use crate::run_log::{LogEntry, RunLog};

/// Default pause between two games.
pub const DEFAULT_GAME_DELAY: Duration = Duration::from_secs(2);

/// Which games a run processes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Every input title not yet present in the output sheet.
    Delta,
    /// Exactly this title. Rows it already has are replaced once new rows
    /// are written.
    Single(GameTitle),
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Courtesy pause slept between consecutive games.
    pub game_delay: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            game_delay: DEFAULT_GAME_DELAY,
        }
    }
}

/// Progress events emitted during a run, consumed by the CLI.
#[derive(Debug, Clone)]
pub enum RunEvent {
    /// Output header checked or rewritten.
    HeaderChecked(HeaderStatus),
    /// Games selected for this run.
    Planned { total: usize, already_processed: usize },
    /// A game has started.
    GameStarted { index: usize, title: String },
    /// Earlier rows for the game were replaced (single-game mode).
    RowsRemoved { index: usize, title: String, rows: usize },
    /// Rows were appended for the game.
    GameCompleted { index: usize, title: String, rows: usize },
    /// The game produced no suggestion that passed the filter.
    GameEmpty { index: usize, title: String },
    /// Scraping or writing failed for the game (non-fatal).
    GameFailed { index: usize, title: String, reason: String },
    /// All games processed.
    Done,
}

/// Run one pass over the selected games.
///
/// Games are processed strictly one after another. A page failure or a
/// non-fatal write failure is recorded against that game and the loop
/// continues; authentication or missing-sheet errors end the run.
pub async fn run<L, I, O>(
    pipeline: &ScrapePipeline<L>,
    input: &I,
    engine: &SyncEngine<O>,
    mode: &RunMode,
    options: &RunOptions,
    events: mpsc::UnboundedSender<RunEvent>,
) -> Result<RunLog, SheetsError>
where
    L: BrowserLauncher,
    I: Worksheet,
    O: Worksheet,
{
    let header = engine.ensure_header().await?;
    let _ = events.send(RunEvent::HeaderChecked(header));

    let (pending, already_processed) = match mode {
        RunMode::Delta => {
            let all = read_titles(input).await?;
            let processed = engine.processed_keys().await?;
            let pending = plan(&all, &processed);
            let skipped = all.len() - pending.len();
            (pending, skipped)
        }
        RunMode::Single(title) => (vec![title.clone()], 0),
    };

    log::debug!(
        "{} games pending, {} already in '{}'",
        pending.len(),
        already_processed,
        engine.worksheet().title()
    );
    let _ = events.send(RunEvent::Planned {
        total: pending.len(),
        already_processed,
    });

    let mut run_log = RunLog::new(pending.len(), already_processed);

    for (index, title) in pending.iter().enumerate() {
        if index > 0 && !options.game_delay.is_zero() {
            tokio::time::sleep(options.game_delay).await;
        }

        let name = title.to_string();
        let _ = events.send(RunEvent::GameStarted {
            index,
            title: name.clone(),
        });

        let entry = process_game(pipeline, engine, mode, index, title, &events).await?;
        match &entry {
            LogEntry::Written { rows, .. } => {
                let _ = events.send(RunEvent::GameCompleted {
                    index,
                    title: name,
                    rows: *rows,
                });
            }
            LogEntry::Empty { .. } => {
                let _ = events.send(RunEvent::GameEmpty { index, title: name });
            }
            LogEntry::Failed { message, .. } => {
                log::warn!("'{}' failed: {}", name, message);
                let _ = events.send(RunEvent::GameFailed {
                    index,
                    title: name,
                    reason: message.clone(),
                });
            }
        }
        run_log.add(entry);
    }

    let _ = events.send(RunEvent::Done);
    Ok(run_log)
}

/// Scrape and commit one game. Only fatal sheet errors are returned as
/// `Err`; everything else becomes a [`LogEntry`].
///
/// In single-game mode earlier rows are replaced only once fresh rows have
/// been written, so a failed or empty scrape keeps what the sheet had.
async fn process_game<L, O>(
    pipeline: &ScrapePipeline<L>,
    engine: &SyncEngine<O>,
    mode: &RunMode,
    index: usize,
    title: &GameTitle,
    events: &mpsc::UnboundedSender<RunEvent>,
) -> Result<LogEntry, SheetsError>
where
    L: BrowserLauncher,
    O: Worksheet,
{
    let game = title.to_string();

    let suggestions = match pipeline.scrape_game(title).await {
        GameOutcome::Scraped(suggestions) => suggestions,
        GameOutcome::Failed(e) => {
            return Ok(LogEntry::Failed {
                game,
                message: e.to_string(),
            });
        }
    };

    if suggestions.is_empty() {
        return Ok(LogEntry::Empty { game });
    }

    let written = match mode {
        RunMode::Delta => engine
            .commit(title, &suggestions)
            .await
            .map(|rows| Replaced {
                written: rows,
                removed: 0,
            }),
        RunMode::Single(_) => engine.replace_game(title, &suggestions).await,
    };

    match written {
        Ok(Replaced { written, removed }) => {
            if removed > 0 {
                log::info!("Replaced {} earlier rows for '{}'", removed, game);
                let _ = events.send(RunEvent::RowsRemoved {
                    index,
                    title: game.clone(),
                    rows: removed,
                });
            }
            Ok(LogEntry::Written {
                game,
                rows: written,
                replaced: removed,
            })
        }
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => Ok(LogEntry::Failed {
            game,
            message: format!("writing rows: {e}"),
        }),
    }
}

#[cfg(test)]
#[path = "tests/runner_tests.rs"]
mod tests;
