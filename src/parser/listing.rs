use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use super::text::stripped_text;
use crate::config::Site;

static C40_CARD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.link-cards-item").unwrap());
static C40_CARD_HEADING: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h3.link-cards-item__heading").unwrap());
static BAMBOO_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href^='/careers/']").unwrap());

/// A job page found on a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingLink {
    pub url: String,
    /// Used when the job page has no title of its own.
    pub fallback_title: String,
}

/// Job links on a listing page, deduplicated by URL in first-seen order.
pub fn extract_links(site: Site, html: &str, base: &Url) -> Vec<ListingLink> {
    let doc = Html::parse_document(html);
    let candidates = match site {
        Site::C40 => c40_cards(&doc, base),
        Site::Bamboo => bamboo_links(&doc, base),
    };
    dedup_by_url(candidates)
}

fn c40_cards(doc: &Html, base: &Url) -> Vec<ListingLink> {
    doc.select(&C40_CARD)
        .filter_map(|card| {
            let href = card.value().attr("href")?.trim();
            let url = resolve(base, href)?;
            let fallback_title = card
                .select(&C40_CARD_HEADING)
                .next()
                .map(|h| stripped_text(h, ""))
                .unwrap_or_default();
            Some(ListingLink { url, fallback_title })
        })
        .collect()
}

fn bamboo_links(doc: &Html, base: &Url) -> Vec<ListingLink> {
    doc.select(&BAMBOO_LINK)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            let title = stripped_text(a, "");
            if href.is_empty() || title.is_empty() {
                return None;
            }
            Some(ListingLink {
                url: resolve(base, href)?,
                fallback_title: title,
            })
        })
        .collect()
}

fn resolve(base: &Url, href: &str) -> Option<String> {
    match base.join(href) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            debug!("Skipping unresolvable link {:?}: {}", href, e);
            None
        }
    }
}

pub fn dedup_by_url(links: Vec<ListingLink>) -> Vec<ListingLink> {
    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter(|l| seen.insert(l.url.clone()))
        .collect()
}

// ── Tests ──
