use scraper::{ElementRef, Html, Selector};
use similar_games_core::{Metascore, Platform, Suggestion};

use crate::error::ExtractError;
use crate::layout::PageLayout;
use crate::loader::LoadedPage;

/// Compiled selectors for one extraction pass.
struct CardSelectors {
    card: Selector,
    title_link: Selector,
    platform_badge: Selector,
    score: Selector,
    image: Selector,
}

impl CardSelectors {
    fn compile(layout: &PageLayout) -> Result<Self, ExtractError> {
        Ok(Self {
            card: parse_selector(&layout.card)?,
            title_link: parse_selector(&layout.title_link)?,
            platform_badge: parse_selector(&layout.platform_badge)?,
            score: parse_selector(&layout.score)?,
            image: parse_selector(&layout.image)?,
        })
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Read every suggestion card out of a loaded page, in page order.
///
/// A card missing its title link, href or title text is skipped with a
/// warning; the remaining cards are still returned. Only a selector that
/// does not compile fails the page.
pub fn extract(page: &LoadedPage, layout: &PageLayout) -> Result<Vec<Suggestion>, ExtractError> {
    let selectors = CardSelectors::compile(layout)?;
    let document = Html::parse_document(&page.html);

    let mut suggestions = Vec::new();
    for (index, card) in document.select(&selectors.card).enumerate() {
        match extract_card(card, &selectors, layout, &page.origin) {
            Ok(suggestion) => suggestions.push(suggestion),
            Err(e) => log::warn!("{}: skipping card {}: {}", page.slug, index + 1, e),
        }
    }

    log::debug!(
        "{}: {} cards extracted from {}",
        page.slug,
        suggestions.len(),
        page.url
    );
    Ok(suggestions)
}

fn extract_card(
    card: ElementRef<'_>,
    selectors: &CardSelectors,
    layout: &PageLayout,
    origin: &str,
) -> Result<Suggestion, ExtractError> {
    let link = card
        .select(&selectors.title_link)
        .next()
        .ok_or(ExtractError::MissingTitleLink)?;

    let href = link
        .value()
        .attr("href")
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .ok_or(ExtractError::MissingHref)?;

    let title = collapse_whitespace(&link.text().collect::<String>());
    if title.is_empty() {
        return Err(ExtractError::EmptyTitle);
    }

    let mut platforms: Vec<Platform> = Vec::new();
    for badge in card.select(&selectors.platform_badge) {
        if let Some(platform) = badge_platform(badge, &layout.platform_class_prefix) {
            if !platforms.contains(&platform) {
                platforms.push(platform);
            }
        }
    }

    let score_text = card
        .select(&selectors.score)
        .next()
        .map(|el| el.text().collect::<String>());
    let metascore = Metascore::from_label(score_text.as_deref());

    let image_url = card.select(&selectors.image).next().and_then(|img| {
        let value = img.value();
        value
            .attr("src")
            .filter(|s| !s.trim().is_empty())
            .or_else(|| value.attr("data-src"))
            .map(|s| absolute_url(origin, s.trim()))
    });

    Ok(Suggestion {
        title,
        platforms,
        metascore,
        url: absolute_url(origin, href),
        image_url,
    })
}

/// Platform code from the last class token on a badge carrying `prefix`.
fn badge_platform(badge: ElementRef<'_>, prefix: &str) -> Option<Platform> {
    badge
        .value()
        .classes()
        .filter_map(|class| class.strip_prefix(prefix))
        .filter(|code| !code.is_empty())
        .last()
        .map(Platform::from_code)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Join a card link onto the catalog origin. Absolute links pass through.
fn absolute_url(origin: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if let Some(rest) = href.strip_prefix("//") {
        format!("https://{rest}")
    } else if href.starts_with('/') {
        format!("{}{}", origin.trim_end_matches('/'), href)
    } else {
        format!("{}/{}", origin.trim_end_matches('/'), href)
    }
}
