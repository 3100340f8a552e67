pub mod detail;
pub mod listing;
pub mod sections;
pub mod text;
pub mod verticals;

use detail::JobPage;
use sections::HeadingPhrases;
use verticals::{Taxonomy, Verticals};

/// One scraped job, as written to the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobListing {
    pub title: String,
    pub description: String,
    pub apply_link: String,
    pub verticals: Verticals,
    pub how_to_apply: String,
}

/// Job page → verticals + how-to-apply sections → listing.
pub fn build_listing(
    page: JobPage,
    apply_link: &str,
    taxonomy: &Taxonomy,
    headings: &HeadingPhrases,
) -> JobListing {
    let verticals = verticals::match_verticals(&page.title, &page.description, taxonomy);
    let how_to_apply = sections::how_to_apply(&page.description, headings);
    JobListing {
        title: page.title,
        description: page.description,
        apply_link: apply_link.to_string(),
        verticals,
        how_to_apply,
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{load_heading_phrases, Site};

    #[test]
    fn c40_page_to_listing() {
        let html = std::fs::read_to_string("tests/fixtures/c40_job.html").unwrap();
        let page = detail::extract_job_page(Site::C40, &html, "Fallback").unwrap();
        let taxonomy = Taxonomy::from_json(
            r#"{"Clean Air": ["air quality"], "Transport": ["transit"], "Finance": ["budget"]}"#,
        )
        .unwrap();
        let headings = load_heading_phrases(None).unwrap();

        let job = build_listing(page, "https://www.c40.org/careers/x/", &taxonomy, &headings);
        assert_eq!(job.title, "Senior Manager, Clean Air");
        assert_eq!(job.verticals.to_string(), "Clean Air, Finance");
        assert_eq!(
            job.how_to_apply,
            "• Location:\nLondon, UK or Remote\n\n\
             • Responsibilities:\nManage the clean air programme budget.\nSupport cities with monitoring.\n\n\
             • How to apply\nSubmit your CV and cover letter by 30 November."
        );
    }

    #[test]
    fn nothing_matched_uses_sentinels() {
        let page = JobPage {
            title: "Receptionist".into(),
            description: "Greet visitors".into(),
        };
        let taxonomy = Taxonomy::from_json(r#"{"Finance": ["budget"]}"#).unwrap();
        let headings = HeadingPhrases::new(["Salary:"]);
        let job = build_listing(page, "https://x/1", &taxonomy, &headings);
        assert_eq!(job.verticals, Verticals::NoMatch);
        assert_eq!(job.how_to_apply, sections::NOT_APPLICABLE);
    }
}
