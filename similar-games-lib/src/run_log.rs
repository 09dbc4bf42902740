/// Outcome of one base game within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    /// Rows were appended. `replaced` counts rows removed beforehand in
    /// single-game mode.
    Written {
        game: String,
        rows: usize,
        replaced: usize,
    },
    /// The page loaded but no suggestion passed the filter.
    Empty { game: String },
    /// Scraping or writing failed; nothing was appended.
    Failed { game: String, message: String },
}

/// Per-game results of a run, in processing order.
#[derive(Debug, Default)]
pub struct RunLog {
    planned: usize,
    already_processed: usize,
    entries: Vec<LogEntry>,
}

impl RunLog {
    pub fn new(planned: usize, already_processed: usize) -> Self {
        Self {
            planned,
            already_processed,
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary {
            planned: self.planned,
            already_processed: self.already_processed,
            ..RunSummary::default()
        };
        for entry in &self.entries {
            match entry {
                LogEntry::Written { rows, replaced, .. } => {
                    summary.written += 1;
                    summary.rows_written += rows;
                    summary.rows_replaced += replaced;
                }
                LogEntry::Empty { .. } => summary.empty += 1,
                LogEntry::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }
}

/// Totals for a finished run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Games selected for this run.
    pub planned: usize,
    /// Input titles skipped because the output already has them.
    pub already_processed: usize,
    pub written: usize,
    pub empty: usize,
    pub failed: usize,
    pub rows_written: usize,
    pub rows_replaced: usize,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} planned, {} written ({} rows), {} without results, {} failed",
            self.planned, self.written, self.rows_written, self.empty, self.failed
        )
    }
}
