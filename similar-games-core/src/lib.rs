//! Core data types shared by every similar-games crate.
//!
//! Holds the game title and its two derived keys (normalized key for
//! equality, slug for URLs), the catalog platform families, and the
//! suggestion record that flows from the extractor into the output sheet.

pub mod platform;
pub mod slug;
pub mod suggestion;
pub mod title;

pub use platform::{Platform, PlatformParseError};
pub use slug::{SlugKey, resolve};
pub use suggestion::{Metascore, OUTPUT_HEADER, OutputRow, Suggestion};
pub use title::{GameTitle, NormalizedKey};
