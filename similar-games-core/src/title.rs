use std::fmt;

/// A human-readable game title, the unit of work for a run.
///
/// Surrounding whitespace is trimmed on construction; the inner text is kept
/// exactly as the spreadsheet holds it so it can be written back verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameTitle(String);

impl GameTitle {
    pub fn new(title: impl AsRef<str>) -> Self {
        Self(title.as_ref().trim().to_string())
    }

    /// Build a title from a spreadsheet cell, skipping blank cells.
    pub fn from_cell(cell: &str) -> Option<Self> {
        let title = Self::new(cell);
        if title.is_empty() { None } else { Some(title) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The equality key used for deduplication against prior output.
    pub fn normalized(&self) -> NormalizedKey {
        NormalizedKey::from_title(&self.0)
    }
}

impl fmt::Display for GameTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameTitle {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for GameTitle {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Characters dropped when comparing titles: apostrophes (straight and
/// typographic) and colons. Whitespace is dropped separately.
fn is_ignored_punctuation(c: char) -> bool {
    matches!(c, '\'' | '\u{2019}' | ':')
}

/// Comparison key derived from a title.
///
/// Lower-cased, with apostrophes, colons and all whitespace removed. Only
/// ever compared for equality; never displayed and never used in a URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    pub fn from_title(title: &str) -> Self {
        let key = title
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace() && !is_ignored_punctuation(*c))
            .collect();
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
