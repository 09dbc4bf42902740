use similar_games_core::{Platform, Suggestion};

/// Default number of suggestions kept per base game.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Keeps scored suggestions available on an allowed platform, capped at
/// `max_results` in page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionFilter {
    pub allowed_platforms: Vec<Platform>,
    pub max_results: usize,
}

impl Default for SuggestionFilter {
    fn default() -> Self {
        Self {
            allowed_platforms: vec![Platform::Pc, Platform::PlayStation],
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl SuggestionFilter {
    pub fn new(allowed_platforms: Vec<Platform>, max_results: usize) -> Self {
        Self {
            allowed_platforms,
            max_results,
        }
    }

    /// Whether a single suggestion passes, ignoring the result cap.
    pub fn accepts(&self, suggestion: &Suggestion) -> bool {
        suggestion.metascore.is_scored()
            && suggestion
                .platforms
                .iter()
                .any(|p| self.allowed_platforms.contains(p))
    }

    /// Filter in order, then truncate. Applying twice gives the same list.
    pub fn apply(&self, suggestions: Vec<Suggestion>) -> Vec<Suggestion> {
        suggestions
            .into_iter()
            .filter(|s| self.accepts(s))
            .take(self.max_results)
            .collect()
    }
}
