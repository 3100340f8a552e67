use std::time::Duration;

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use url::Url;

use crate::config::{Column, Site};
use crate::fetch::{FetchError, PageSource};
use crate::parser::detail::{self, DetailError};
use crate::parser::listing::{self, ListingLink};
use crate::parser::sections::HeadingPhrases;
use crate::parser::verticals::Taxonomy;
use crate::parser::{self, JobListing};
use crate::sheet;

/// Why a job was dropped from the run.
#[derive(Debug, thiserror::Error)]
pub enum SkipReason {
    #[error("could not load {url}: {source}")]
    Navigation { url: String, source: FetchError },
    #[error("timed out loading {url}")]
    Timeout { url: String },
    #[error("content region {selector} missing on {url}")]
    MissingContent { url: String, selector: &'static str },
    #[error("description missing on {url}")]
    EmptyDescription { url: String },
    #[error("{} of {url} is too long for a spreadsheet cell", .column.header())]
    TooLong { url: String, column: Column },
}

pub type JobOutcome = Result<JobListing, SkipReason>;

pub struct RunOptions<'a> {
    pub site: Site,
    pub taxonomy: &'a Taxonomy,
    pub headings: &'a HeadingPhrases,
    pub limit: Option<usize>,
    pub job_delay: Duration,
}

#[derive(Debug)]
pub struct RunSummary {
    pub listed: usize,
    pub skipped: Vec<SkipReason>,
}

/// Listing page → job pages → listings, one job at a time.
///
/// Per-job failures are logged and skipped. Fails when the listing page
/// cannot be loaded or when no job survives.
pub(crate) async fn collect_jobs<S: PageSource>(
    source: &S,
    opts: &RunOptions<'_>,
) -> Result<(Vec<JobListing>, RunSummary)> {
    let profile = opts.site.profile();
    let base = Url::parse(profile.listing_url)?;

    info!("Opening listings page: {}", profile.listing_url);
    let html = source
        .fetch_html(profile.listing_url, profile.listing_ready)
        .await
        .with_context(|| format!("Failed to load listings page {}", profile.listing_url))?;

    let mut links = listing::extract_links(opts.site, &html, &base);
    if links.is_empty() {
        warn!("No job links found on {}", profile.listing_url);
    } else {
        info!("Found {} job listings", links.len());
    }
    if let Some(limit) = opts.limit {
        links.truncate(limit);
    }

    let pb = ProgressBar::new(links.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    let mut jobs = Vec::with_capacity(links.len());
    let mut skipped = Vec::new();

    for (i, link) in links.iter().enumerate() {
        if i > 0 && !opts.job_delay.is_zero() {
            tokio::time::sleep(opts.job_delay).await;
        }
        match process_job(source, opts, link).await {
            Ok(job) => jobs.push(job),
            Err(reason) => {
                warn!("Skipping job: {}", reason);
                skipped.push(reason);
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();

    let summary = RunSummary {
        listed: links.len(),
        skipped,
    };
    if jobs.is_empty() {
        bail!(
            "No jobs extracted from {} ({} listed, {} skipped)",
            profile.name,
            summary.listed,
            summary.skipped.len()
        );
    }

    info!(
        "Extracted {} jobs ({} listed, {} skipped)",
        jobs.len(),
        summary.listed,
        summary.skipped.len()
    );
    Ok((jobs, summary))
}

async fn process_job<S: PageSource>(
    source: &S,
    opts: &RunOptions<'_>,
    link: &ListingLink,
) -> JobOutcome {
    let profile = opts.site.profile();
    info!("Visiting job page: {}", link.url);
    let html = source.fetch_html(&link.url, profile.job_ready).await.map_err(|e| match e {
        FetchError::Timeout(_) => SkipReason::Timeout {
            url: link.url.clone(),
        },
        other => SkipReason::Navigation {
            url: link.url.clone(),
            source: other,
        },
    })?;

    let page = detail::extract_job_page(opts.site, &html, &link.fallback_title).map_err(|e| {
        match e {
            DetailError::MissingRegion(selector) => SkipReason::MissingContent {
                url: link.url.clone(),
                selector,
            },
            DetailError::EmptyDescription => SkipReason::EmptyDescription {
                url: link.url.clone(),
            },
        }
    })?;

    let job = parser::build_listing(page, &link.url, opts.taxonomy, opts.headings);
    // checked here so one page cannot fail the whole write
    if let Some(column) = sheet::oversized_column(&job, profile.columns) {
        return Err(SkipReason::TooLong {
            url: link.url.clone(),
            column,
        });
    }
    Ok(job)
}

// ── Tests ──
