use similar_games_core::SlugKey;

/// Default catalog host.
pub const DEFAULT_CATALOG_HOST: &str = "rawg.io";

/// The catalog site a run scrapes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSite {
    host: String,
}

impl CatalogSite {
    /// `host` may be given bare (`rawg.io`) or with a scheme; a trailing
    /// slash is ignored.
    pub fn new(host: impl AsRef<str>) -> Self {
        let host = host.as_ref().trim().trim_end_matches('/');
        let host = host
            .strip_prefix("https://")
            .or_else(|| host.strip_prefix("http://"))
            .unwrap_or(host);
        Self {
            host: host.to_string(),
        }
    }

    /// Scheme and host, used to absolutize card links.
    pub fn origin(&self) -> String {
        format!("https://{}", self.host)
    }

    /// Suggestions page for a game: `https://<host>/games/<slug>/suggestions`.
    pub fn suggestions_url(&self, slug: &SlugKey) -> String {
        format!("{}/games/{}/suggestions", self.origin(), slug)
    }
}

impl Default for CatalogSite {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_HOST)
    }
}

/// CSS selectors describing the suggestions page template.
///
/// These are tied to the catalog's current markup; when the site changes
/// its DOM, this is the one place to update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout {
    /// Element that appears once the suggestions list has rendered.
    pub container: String,
    /// One suggestion card.
    pub card: String,
    /// Heading link inside a card carrying the title and relative URL.
    pub title_link: String,
    /// Platform badge elements inside a card.
    pub platform_badge: String,
    /// Class prefix on a badge; the rest of that class token is the code.
    pub platform_class_prefix: String,
    /// Critic score label inside a card.
    pub score: String,
    /// Cover image inside a card.
    pub image: String,
    /// Control that loads the next batch of cards.
    pub load_more: String,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            container: ".suggestions-list".to_string(),
            card: ".game-card".to_string(),
            title_link: "a.game-card-title, .game-card-title a".to_string(),
            platform_badge: ".game-card-platforms i".to_string(),
            platform_class_prefix: "platform-icon--".to_string(),
            score: ".metacritic-score".to_string(),
            image: "img".to_string(),
            load_more: ".load-more-button".to_string(),
        }
    }
}
