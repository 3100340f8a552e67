mod config;
mod dashboard;
mod fetch;
mod parser;
mod pipeline;
mod sheet;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::info;

use config::Site;
use fetch::{Renderer, RendererKind};
use parser::verticals::Taxonomy;

#[derive(Parser)]
#[command(name = "careers_scraper", about = "C40 careers scraper with vertical tagging")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape one careers site and write the jobs spreadsheet
    Scrape {
        /// Which careers site to scrape
        #[arg(short, long, value_enum, default_value = "c40")]
        site: Site,
        /// Vertical → trigger words JSON file
        #[arg(short, long, default_value = config::DEFAULT_KEYWORDS_PATH)]
        keywords: PathBuf,
        /// JSON array of heading phrases (default: built-in list)
        #[arg(long)]
        headings: Option<PathBuf>,
        /// Output spreadsheet (default depends on the site)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Max jobs to visit (default: all listed)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// How pages are fetched
        #[arg(long, value_enum, default_value = "http")]
        renderer: RendererKind,
    },
    /// Show a jobs spreadsheet in the terminal
    Dashboard {
        /// Spreadsheet to read
        #[arg(short, long, default_value = "output/c40_jobs.xlsx")]
        input: PathBuf,
        /// Sort by this column
        #[arg(long)]
        sort: Option<String>,
        /// Sort descending
        #[arg(long)]
        desc: bool,
        /// Keep rows containing this text
        #[arg(short, long)]
        filter: Option<String>,
        /// Restrict --filter to one column
        #[arg(short, long, requires = "filter")]
        column: Option<String>,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
        /// Width of each table cell
        #[arg(long, default_value = "30")]
        width: usize,
        /// Copy the raw spreadsheet to this path
        #[arg(long)]
        download: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scrape {
            site,
            keywords,
            headings,
            output,
            limit,
            renderer,
        } => {
            let profile = site.profile();
            let taxonomy = Taxonomy::load(&keywords)?;
            let headings = config::load_heading_phrases(headings.as_deref())?;
            info!(
                "Loaded {} verticals and {} heading phrases",
                taxonomy.len(),
                headings.len()
            );

            let renderer = Renderer::new(renderer)?;
            let opts = pipeline::RunOptions {
                site,
                taxonomy: &taxonomy,
                headings: &headings,
                limit,
                job_delay: profile.job_delay,
            };

            println!("Scraping {} ({})...", profile.name, profile.listing_url);
            let (jobs, summary) = pipeline::collect_jobs(&renderer, &opts).await?;

            let output = output.unwrap_or_else(|| PathBuf::from(profile.default_output));
            sheet::write_jobs(&output, profile.columns, &jobs)?;
            println!(
                "Saved {} jobs to {} ({} listed, {} skipped)",
                jobs.len(),
                output.display(),
                summary.listed,
                summary.skipped.len()
            );
            Ok(())
        }
        Commands::Dashboard {
            input,
            sort,
            desc,
            filter,
            column,
            limit,
            width,
            download,
        } => dashboard::show(&dashboard::DashboardOptions {
            input: &input,
            sort: sort.as_deref(),
            descending: desc,
            filter: filter.as_deref(),
            column: column.as_deref(),
            limit,
            download: download.as_deref(),
            cell_width: width,
        }),
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
