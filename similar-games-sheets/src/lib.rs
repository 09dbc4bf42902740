//! Spreadsheet side of similar-games.
//!
//! A small Google Sheets v4 client authenticated with a service account,
//! the [`Worksheet`] trait it implements, and the incremental sync engine
//! that decides which base games still need scraping and writes their rows.

pub mod client;
pub mod credentials;
pub mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod sync;
pub mod worksheet;

pub use client::{GoogleWorksheet, SheetsClient, Spreadsheet, SpreadsheetRef};
pub use credentials::ServiceAccountKey;
pub use error::SheetsError;
pub use sync::{HeaderStatus, Replaced, SyncEngine, plan, read_titles};
pub use worksheet::Worksheet;

#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryWorksheet;
