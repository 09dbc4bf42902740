//! Incremental sync between the input list and the output sheet.
//!
//! The output sheet is the only persisted state: a base game counts as
//! processed once at least one row carries its title in column A.

use std::collections::HashSet;

use similar_games_core::{GameTitle, NormalizedKey, OUTPUT_HEADER, OutputRow, Suggestion};

use crate::error::SheetsError;
use crate::worksheet::Worksheet;

/// Column holding the base game title in both sheets.
const TITLE_COLUMN: usize = 1;
const HEADER_ROW: usize = 1;

/// What `ensure_header` found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStatus {
    /// The header was already correct.
    Present,
    /// The sheet had no header; one was written.
    Written,
    /// An older or different header was replaced.
    Upgraded,
}

/// Read the base game list from the input sheet: column A without its
/// header, blank cells skipped, order and duplicates kept.
pub async fn read_titles<W: Worksheet + ?Sized>(input: &W) -> Result<Vec<GameTitle>, SheetsError> {
    let cells = input.column_values(TITLE_COLUMN).await?;
    Ok(cells
        .iter()
        .skip(1)
        .filter_map(|cell| GameTitle::from_cell(cell))
        .collect())
}

/// Titles still to scrape: every title whose normalized key is not in
/// `processed`, in input order. Duplicated input titles stay duplicated.
pub fn plan(all_titles: &[GameTitle], processed: &HashSet<NormalizedKey>) -> Vec<GameTitle> {
    all_titles
        .iter()
        .filter(|title| !processed.contains(&title.normalized()))
        .cloned()
        .collect()
}

/// Rows written and removed by [`SyncEngine::replace_game`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Replaced {
    pub written: usize,
    pub removed: usize,
}

/// Reads from and writes to the output sheet on behalf of a run.
pub struct SyncEngine<W> {
    output: W,
}

impl<W: Worksheet> SyncEngine<W> {
    pub fn new(output: W) -> Self {
        Self { output }
    }

    pub fn worksheet(&self) -> &W {
        &self.output
    }

    /// Normalized keys of every base game already present in the output
    /// sheet. Read fresh on each call.
    pub async fn processed_keys(&self) -> Result<HashSet<NormalizedKey>, SheetsError> {
        let cells = self.output.column_values(TITLE_COLUMN).await?;
        Ok(cells
            .iter()
            .skip(1)
            .filter(|cell| !cell.trim().is_empty())
            .map(|cell| NormalizedKey::from_title(cell))
            .collect())
    }

    /// Make sure row 1 is exactly the output header, rewriting it if not.
    /// Cells to the right of the header are cleared. Data rows are never
    /// touched.
    pub async fn ensure_header(&self) -> Result<HeaderStatus, SheetsError> {
        let current = self.output.row_values(HEADER_ROW).await?;
        let used = current
            .iter()
            .rposition(|c| !c.trim().is_empty())
            .map_or(0, |last| last + 1);
        if current[..used].iter().map(String::as_str).eq(OUTPUT_HEADER) {
            return Ok(HeaderStatus::Present);
        }

        let mut header: Vec<String> = OUTPUT_HEADER.iter().map(|h| h.to_string()).collect();
        if header.len() < current.len() {
            header.resize(current.len(), String::new());
        }
        self.output.update_row(HEADER_ROW, &header).await?;

        if used == 0 {
            log::info!("Wrote header to '{}'", self.output.title());
            Ok(HeaderStatus::Written)
        } else {
            log::info!(
                "Replaced {}-column header in '{}' with the {}-column layout",
                used,
                self.output.title(),
                OUTPUT_HEADER.len()
            );
            Ok(HeaderStatus::Upgraded)
        }
    }

    /// Append the rows for one base game in a single call. Returns the
    /// number of rows written; nothing is sent when there are no records.
    pub async fn commit(
        &self,
        base: &GameTitle,
        suggestions: &[Suggestion],
    ) -> Result<usize, SheetsError> {
        if suggestions.is_empty() {
            return Ok(0);
        }
        let rows: Vec<Vec<String>> = suggestions
            .iter()
            .map(|s| OutputRow::new(base, s).into_cells())
            .collect();
        let count = rows.len();
        self.output.append_rows(rows).await?;
        Ok(count)
    }

    /// Append fresh rows for `base`, then delete the rows it already had.
    ///
    /// Nothing is removed unless the append succeeded, so a failed write
    /// leaves the earlier rows in place. Matching uses the normalized key
    /// and never includes the header row.
    pub async fn replace_game(
        &self,
        base: &GameTitle,
        suggestions: &[Suggestion],
    ) -> Result<Replaced, SheetsError> {
        let stale = self.rows_for(base).await?;
        let written = self.commit(base, suggestions).await?;
        if written > 0 && !stale.is_empty() {
            self.output.delete_rows(&stale).await?;
        }
        Ok(Replaced {
            written,
            removed: if written > 0 { stale.len() } else { 0 },
        })
    }

    /// 1-based numbers of the data rows whose base game matches `base`.
    async fn rows_for(&self, base: &GameTitle) -> Result<Vec<usize>, SheetsError> {
        let key = base.normalized();
        let cells = self.output.column_values(TITLE_COLUMN).await?;
        Ok(cells
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, cell)| !cell.trim().is_empty() && NormalizedKey::from_title(cell) == key)
            .map(|(index, _)| index + 1)
            .collect())
    }
}

#[cfg(test)]
#[path = "tests/sync_tests.rs"]
mod tests;
