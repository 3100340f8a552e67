use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::fetch::PageReady;
use crate::parser::detail::content_selector;
use crate::parser::sections::HeadingPhrases;

pub const DEFAULT_KEYWORDS_PATH: &str = "keywords.json";

/// Section headings looked for in job descriptions.
pub const DEFAULT_HEADING_PHRASES: &[&str] = &[
    "Selection Criteria",
    "Evaluation & Follow-Up",
    "Application Guidelines",
    "Eligible Applicants:",
    "Scope of Work:",
    "Proposal Requirements",
    "Evaluation Criteria",
    "Submission Details",
    "Eligible Entities",
    "How to apply",
    "Purpose of RFP",
    "Proposal Guidelines",
    "Eligibility Criteria",
    "Application must include:",
    "Eligibility",
    "Submission of Tender:",
    "Technical Bid-",
    "Who Can Apply",
    "Documents Required",
    "Expectation:",
    "Eligibility Criterion:",
    "Submission terms:",
    "Vendor Qualifications",
    "To apply",
    "To know about the eligibility criteria:",
    "The agency's specific responsibilities include –",
    "SELCO Foundation will be responsible for:",
    "Partner Eligibility Criteria",
    "Proposal Submission Requirements",
    "Proposal Evaluation Criteria",
    "Eligibility Criteria for CSOs to be part of the programme:",
    "Pre-Bid Queries:",
    "Response to Pre-Bid Queries:",
    "Submission of Bid:",
    "Applicant Profiles:",
    "What we like to see in grant applications:",
    "Research that is supported by the SVRI must:",
    "Successful projects are most often:",
    "Criteria for funding:",
    "Before you begin to write your proposal, consider that IEF prefers to fund:",
    "As you prepare your budget, these are some items that IEF will not fund:",
    "Organizational Profile",
    "Selection Process",
    "Proposal Submission Guidelines",
    "Terms and Conditions",
    "Security Deposit:",
    "Facilities and Support Offered under the call for proposal:",
    "Other Requirements:",
    "Reporting To:",
    "Prospective Consultants should demonstrate:",
    "Term:",
    "Location:",
    "Salary:",
    "Application Process:",
    "Person Specification:",
    "Position Description:",
    "Responsibilities:",
    "Required qualifications:",
    "Modeling, coding, and quantitative tool maintenance",
    "Specific responsibilities include:",
];

/// Built-in phrases, or a JSON array of strings read from `path`.
pub fn load_heading_phrases(path: Option<&Path>) -> Result<HeadingPhrases> {
    let Some(path) = path else {
        return Ok(HeadingPhrases::new(DEFAULT_HEADING_PHRASES.iter().copied()));
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read headings file {}", path.display()))?;
    let phrases: Vec<String> = serde_json::from_str(&text)
        .with_context(|| format!("Headings file {} must be a JSON array of strings", path.display()))?;
    Ok(HeadingPhrases::new(phrases))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Site {
    /// c40.org/careers job cards
    C40,
    /// c40.bamboohr.com job board
    Bamboo,
}

impl Site {
    pub fn profile(self) -> &'static SiteProfile {
        match self {
            Site::C40 => &C40,
            Site::Bamboo => &BAMBOO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Title,
    Description,
    HowToApply,
    MatchedVertical,
    ClickableLink,
    ApplyLink,
}

impl Column {
    pub fn header(self) -> &'static str {
        match self {
            Column::Title => "Title",
            Column::Description => "Description",
            Column::HowToApply => "How_To_Apply",
            Column::MatchedVertical => "Matched_Vertical",
            Column::ClickableLink => "Clickable_Link",
            Column::ApplyLink => "Apply_Link",
        }
    }

    pub fn is_link(self) -> bool {
        matches!(self, Column::ClickableLink | Column::ApplyLink)
    }
}

#[derive(Debug)]
pub struct SiteProfile {
    pub name: &'static str,
    /// Relative job links resolve against this page.
    pub listing_url: &'static str,
    pub listing_ready: PageReady,
    pub job_ready: PageReady,
    /// Output columns with their widths, in sheet order.
    pub columns: &'static [(Column, f64)],
    /// Pause before each job page.
    pub job_delay: Duration,
    pub default_output: &'static str,
}

static C40: SiteProfile = SiteProfile {
    name: "C40 careers",
    listing_url: "https://www.c40.org/careers/",
    listing_ready: PageReady::Selector("a.link-cards-item", Duration::from_secs(15)),
    job_ready: PageReady::Selector(content_selector(Site::C40), Duration::from_secs(10)),
    columns: &[
        (Column::Title, 50.0),
        (Column::Description, 120.0),
        (Column::HowToApply, 60.0),
        (Column::MatchedVertical, 30.0),
        (Column::ClickableLink, 50.0),
    ],
    job_delay: Duration::from_secs(1),
    default_output: "output/c40_jobs.xlsx",
};

static BAMBOO: SiteProfile = SiteProfile {
    name: "C40 BambooHR",
    listing_url: "https://c40.bamboohr.com/careers",
    // the board is built client-side
    listing_ready: PageReady::NetworkIdle(Duration::from_secs(30)),
    job_ready: PageReady::NetworkIdle(Duration::from_secs(30)),
    columns: &[
        (Column::Title, 55.0),
        (Column::Description, 120.0),
        (Column::MatchedVertical, 30.0),
        (Column::ApplyLink, 50.0),
    ],
    job_delay: Duration::from_secs(2),
    default_output: "output/c40_bamboo_jobs.xlsx",
};
