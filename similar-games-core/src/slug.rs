//! Title to URL slug resolution.
//!
//! The catalog addresses each game page by a slug derived from its public
//! title. The derivation here mirrors the catalog's own convention, checked
//! against known working URLs:
//!
//! ```text
//! "Hollow Knight"           -> hollow-knight
//! "The Witcher 3: Wild Hunt" -> the-witcher-3-wild-hunt
//! "Baldur's Gate"           -> baldur-s-gate
//! ```
//!
//! A handful of catalog entries live under an internal name unrelated to
//! their public title; those are listed in [`SLUG_OVERRIDES`].

use std::fmt;

use crate::title::{GameTitle, NormalizedKey};

/// Titles whose catalog entry uses a different internal name.
///
/// Matched on the normalized title so casing and punctuation don't matter.
/// The 2018 God of War is filed as the series' second entry.
const SLUG_OVERRIDES: &[(&str, &str)] = &[("godofwar", "god-of-war-2")];

/// URL path segment identifying a game on the catalog.
///
/// Only used to build URLs; never compared against other titles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlugKey(String);

impl SlugKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SlugKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '\'' | '\u{2019}' | ':')
}

/// Resolve a title to its catalog slug.
///
/// Pure and infallible. An empty or fully-stripped title yields an empty
/// slug; the page loader reports that as a missing page later on.
pub fn resolve(title: &GameTitle) -> SlugKey {
    let key = NormalizedKey::from_title(title.as_str());
    if let Some((_, slug)) = SLUG_OVERRIDES.iter().find(|(k, _)| *k == key.as_str()) {
        return SlugKey(slug.to_string());
    }
    SlugKey(slugify(title.as_str()))
}

/// Lower-case, turn each run of separators into one hyphen, then drop
/// anything outside `[a-z0-9-]`. Hyphens already in the title are kept.
fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    let mut out = String::with_capacity(lower.len());
    let mut in_separator_run = false;

    for c in lower.chars() {
        if is_separator(c) {
            if !in_separator_run {
                out.push('-');
                in_separator_run = true;
            }
            continue;
        }
        in_separator_run = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            out.push(c);
        }
    }

    out
}

#[cfg(test)]
#[path = "tests/slug_tests.rs"]
mod tests;
