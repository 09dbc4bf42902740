use crate::platform::Platform;
use crate::title::GameTitle;

/// Column header of the output sheet, in write order.
pub const OUTPUT_HEADER: [&str; 6] = [
    "Jogo Base",
    "Jogo Similar",
    "Plataformas",
    "Metascore",
    "URL",
    "Imagem",
];

/// Marker written for a suggestion without a critic score.
const UNSCORED_MARKER: &str = "N/A";

/// Critic score label as shown on a suggestion card.
///
/// Kept as text; the score is only ever used to decide inclusion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Metascore {
    Scored(String),
    Unscored,
}

impl Metascore {
    /// Build from the card's score label, if any. Blank labels and the
    /// `N/A` marker count as unscored.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(str::trim) {
            Some(text) if !text.is_empty() && text != UNSCORED_MARKER => {
                Self::Scored(text.to_string())
            }
            _ => Self::Unscored,
        }
    }

    pub fn is_scored(&self) -> bool {
        matches!(self, Self::Scored(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Scored(text) => text,
            Self::Unscored => UNSCORED_MARKER,
        }
    }
}

impl std::fmt::Display for Metascore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One similar game extracted from a base game's suggestions page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub title: String,
    /// Badge order as presented, without duplicates.
    pub platforms: Vec<Platform>,
    pub metascore: Metascore,
    /// Absolute catalog URL of the suggested game.
    pub url: String,
    pub image_url: Option<String>,
}

impl Suggestion {
    /// Platform codes joined the way the output sheet stores them.
    pub fn platform_list(&self) -> String {
        self.platforms
            .iter()
            .map(Platform::code)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A suggestion flattened into the output sheet's column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub base_game: String,
    pub similar_game: String,
    pub platforms: String,
    pub metascore: String,
    pub url: String,
    pub image: String,
}

impl OutputRow {
    pub fn new(base: &GameTitle, suggestion: &Suggestion) -> Self {
        Self {
            base_game: base.as_str().to_string(),
            similar_game: suggestion.title.clone(),
            platforms: suggestion.platform_list(),
            metascore: suggestion.metascore.to_string(),
            url: suggestion.url.clone(),
            image: suggestion.image_url.clone().unwrap_or_default(),
        }
    }

    /// Cell values matching [`OUTPUT_HEADER`].
    pub fn into_cells(self) -> Vec<String> {
        vec![
            self.base_game,
            self.similar_game,
            self.platforms,
            self.metascore,
            self.url,
            self.image,
        ]
    }
}
