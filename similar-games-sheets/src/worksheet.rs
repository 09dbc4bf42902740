//! Worksheet capability used by the sync engine.
//!
//! Rows and columns are 1-based, as they are shown in a spreadsheet UI.

use async_trait::async_trait;

use crate::error::SheetsError;

/// The operations the run needs from one tab of a spreadsheet.
#[async_trait]
pub trait Worksheet: Send + Sync {
    /// Tab title.
    fn title(&self) -> &str;

    /// Every cell of column `col`, top to bottom, including the header.
    /// Trailing empty cells are not returned.
    async fn column_values(&self, col: usize) -> Result<Vec<String>, SheetsError>;

    /// The cells of row `row`, left to right.
    async fn row_values(&self, row: usize) -> Result<Vec<String>, SheetsError>;

    /// Overwrite row `row` starting at column A.
    async fn update_row(&self, row: usize, values: &[String]) -> Result<(), SheetsError>;

    /// Append `rows` after the last non-empty row in a single call. Values
    /// are interpreted as if typed by a user.
    async fn append_rows(&self, rows: Vec<Vec<String>>) -> Result<(), SheetsError>;

    /// Remove the given rows, shifting later rows up.
    async fn delete_rows(&self, rows: &[usize]) -> Result<(), SheetsError>;
}
