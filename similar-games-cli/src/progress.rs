//! Terminal display of run progress.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use similar_games_lib::RunEvent;
use similar_games_sheets::HeaderStatus;

/// A single spinner line plus the log lines printed above it.
pub(crate) struct RunProgress {
    pb: ProgressBar,
    total: usize,
}

/// Spinner with the given message, ticking until cleared.
pub(crate) fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .expect("static pattern")
            .tick_chars("/-\\|"),
    );
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

impl RunProgress {
    pub(crate) fn new() -> Self {
        Self {
            pb: spinner("Reading sheets..."),
            total: 0,
        }
    }

    pub(crate) fn handle(&mut self, event: RunEvent) {
        match event {
            RunEvent::HeaderChecked(status) => match status {
                HeaderStatus::Present => {}
                HeaderStatus::Written => self.pb.suspend(|| {
                    log::info!(
                        "{} Wrote output header",
                        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                    )
                }),
                HeaderStatus::Upgraded => self.pb.suspend(|| {
                    log::info!(
                        "{} Upgraded output header to the current layout",
                        "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                    )
                }),
            },
            RunEvent::Planned {
                total,
                already_processed,
            } => {
                self.total = total;
                self.pb.suspend(|| {
                    log::info!(
                        "{} {} games to scrape ({} already done)",
                        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                        total,
                        already_processed,
                    )
                });
            }
            RunEvent::GameStarted { index, ref title } => {
                self.pb
                    .set_message(format!("[{}/{}] {}", index + 1, self.total, title));
            }
            RunEvent::RowsRemoved {
                index,
                ref title,
                rows,
            } => self.pb.suspend(|| {
                log::info!(
                    "  {} [{}/{}] {}: replaced {} earlier rows",
                    "\u{21BB}".if_supports_color(Stdout, |t| t.cyan()),
                    index + 1,
                    self.total,
                    title,
                    rows,
                )
            }),
            RunEvent::GameCompleted {
                index,
                ref title,
                rows,
            } => self.pb.suspend(|| {
                log::info!(
                    "  {} [{}/{}] {} ({} suggestions)",
                    "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                    index + 1,
                    self.total,
                    title,
                    rows,
                )
            }),
            RunEvent::GameEmpty { index, ref title } => self.pb.suspend(|| {
                log::info!(
                    "  {} [{}/{}] {} (no suggestions passed the filter)",
                    "-".if_supports_color(Stdout, |t| t.dimmed()),
                    index + 1,
                    self.total,
                    title,
                )
            }),
            RunEvent::GameFailed {
                index,
                ref title,
                ref reason,
            } => self.pb.suspend(|| {
                log::warn!(
                    "  {} [{}/{}] {}: {}",
                    "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                    index + 1,
                    self.total,
                    title,
                    reason,
                )
            }),
            RunEvent::Done => {}
        }
    }

    pub(crate) fn finish(&self) {
        self.pb.finish_and_clear();
    }
}
