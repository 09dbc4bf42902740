//! In-memory worksheet for exercising the sync engine and run loop
//! without a spreadsheet backend.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::SheetsError;
use crate::worksheet::Worksheet;

/// A worksheet held in memory.
///
/// Behaves like a sheet that never fails; the run loop tests drive it.
#[derive(Debug, Default)]
pub struct MemoryWorksheet {
    title: String,
    rows: Mutex<Vec<Vec<String>>>,
    appends: Mutex<usize>,
}

impl MemoryWorksheet {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// A worksheet pre-filled with `rows`, first row being the header.
    pub fn with_rows(title: impl Into<String>, rows: Vec<Vec<&str>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(str::to_string).collect())
            .collect();
        Self {
            title: title.into(),
            rows: Mutex::new(rows),
            appends: Mutex::new(0),
        }
    }

    /// Snapshot of every row.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.rows.lock().map(|rows| rows.clone()).unwrap_or_default()
    }

    /// Number of `append_rows` calls received.
    pub fn append_calls(&self) -> usize {
        self.appends.lock().map(|n| *n).unwrap_or_default()
    }

    fn lock_rows(&self) -> Result<std::sync::MutexGuard<'_, Vec<Vec<String>>>, SheetsError> {
        self.rows
            .lock()
            .map_err(|_| SheetsError::Io(std::io::Error::other("worksheet lock poisoned")))
    }
}

#[async_trait]
impl Worksheet for MemoryWorksheet {
    fn title(&self) -> &str {
        &self.title
    }

    async fn column_values(&self, col: usize) -> Result<Vec<String>, SheetsError> {
        let rows = self.lock_rows()?;
        let mut values: Vec<String> = rows
            .iter()
            .map(|row| row.get(col - 1).cloned().unwrap_or_default())
            .collect();
        while values.last().is_some_and(|v| v.is_empty()) {
            values.pop();
        }
        Ok(values)
    }

    async fn row_values(&self, row: usize) -> Result<Vec<String>, SheetsError> {
        let rows = self.lock_rows()?;
        let mut values = rows.get(row - 1).cloned().unwrap_or_default();
        while values.last().is_some_and(|v| v.is_empty()) {
            values.pop();
        }
        Ok(values)
    }

    async fn update_row(&self, row: usize, values: &[String]) -> Result<(), SheetsError> {
        let mut rows = self.lock_rows()?;
        if rows.len() < row {
            rows.resize(row, Vec::new());
        }
        let target = &mut rows[row - 1];
        if target.len() < values.len() {
            target.resize(values.len(), String::new());
        }
        target[..values.len()].clone_from_slice(values);
        Ok(())
    }

    async fn append_rows(&self, new_rows: Vec<Vec<String>>) -> Result<(), SheetsError> {
        let mut rows = self.lock_rows()?;
        while rows.last().is_some_and(|r| r.iter().all(String::is_empty)) {
            rows.pop();
        }
        rows.extend(new_rows);
        drop(rows);
        if let Ok(mut n) = self.appends.lock() {
            *n += 1;
        }
        Ok(())
    }

    async fn delete_rows(&self, to_delete: &[usize]) -> Result<(), SheetsError> {
        let mut rows = self.lock_rows()?;
        let mut sorted: Vec<usize> = to_delete.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();
        for row in sorted {
            if row >= 1 && row <= rows.len() {
                rows.remove(row - 1);
            }
        }
        Ok(())
    }
}
