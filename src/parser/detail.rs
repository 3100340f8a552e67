use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::text::stripped_text;
use crate::config::Site;

static C40_TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h3.jss-g20").unwrap());
static C40_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div#descriptionWrapper").unwrap());
static BAMBOO_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h3.fabric-oxx0vk-root").unwrap());
static BAMBOO_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.fabric-95l02p-description").unwrap());

/// Title and raw description text of one job page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPage {
    pub title: String,
    /// Visually distinct blocks separated by `\n`.
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailError {
    /// The content region never appeared on the page.
    MissingRegion(&'static str),
    EmptyDescription,
}

pub const fn content_selector(site: Site) -> &'static str {
    match site {
        Site::C40 => "#descriptionWrapper",
        Site::Bamboo => "div.fabric-95l02p-description",
    }
}

pub fn extract_job_page(site: Site, html: &str, fallback_title: &str) -> Result<JobPage, DetailError> {
    let doc = Html::parse_document(html);
    let (title_sel, desc_sel): (&Selector, &Selector) = match site {
        Site::C40 => (&*C40_TITLE, &*C40_DESCRIPTION),
        Site::Bamboo => (&*BAMBOO_TITLE, &*BAMBOO_DESCRIPTION),
    };

    let title = doc
        .select(title_sel)
        .next()
        .map(|t| stripped_text(t, ""))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| fallback_title.to_string());

    let description = match site {
        // one region, one line per text node
        Site::C40 => doc
            .select(desc_sel)
            .next()
            .map(|d| stripped_text(d, "\n"))
            .ok_or(DetailError::MissingRegion(content_selector(site)))?,
        // several blocks, one line per block
        Site::Bamboo => {
            let blocks: Vec<String> = doc.select(desc_sel).map(|d| stripped_text(d, "")).collect();
            if blocks.is_empty() {
                return Err(DetailError::MissingRegion(content_selector(site)));
            }
            let joined = blocks.join("\n");
            if joined.trim().is_empty() {
                return Err(DetailError::EmptyDescription);
            }
            joined
        }
    };

    Ok(JobPage { title, description })
}

// ── Tests ──
