use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use spider_client::shapes::request::{
    IdleNetwork, RequestType, ReturnFormat, ReturnFormatHandling, Selector, Timeout, WaitFor,
};
use spider_client::{RequestParams, Spider};
use tracing::debug;

/// Upper bound on loading one page.
pub const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(60);

const USER_AGENT: &str = concat!("careers_scraper/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("{0}")]
    Transport(String),
    #[error("no content in response")]
    Empty,
}

/// What a rendered page has to reach before its HTML is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageReady {
    /// The selector is present, waiting at most the given time.
    Selector(&'static str, Duration),
    /// No network traffic, waiting at most the given time.
    NetworkIdle(Duration),
}

/// Anything that turns a URL into page HTML.
pub(crate) trait PageSource {
    async fn fetch_html(&self, url: &str, ready: PageReady) -> Result<String, FetchError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RendererKind {
    /// Raw HTML over plain HTTP
    Http,
    /// Rendered HTML via spider.cloud (reads SPIDER_API_KEY)
    Spider,
}

pub enum Renderer {
    Http(reqwest::Client),
    Spider(Spider),
}

impl Renderer {
    pub fn new(kind: RendererKind) -> Result<Self> {
        match kind {
            RendererKind::Http => Self::http(),
            RendererKind::Spider => Self::spider(),
        }
    }

    pub fn http() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(NAVIGATION_TIMEOUT)
            .gzip(true)
            .build()?;
        Ok(Renderer::Http(client))
    }

    pub fn spider() -> Result<Self> {
        let api_key = std::env::var("SPIDER_API_KEY")
            .map_err(|_| anyhow!("SPIDER_API_KEY environment variable must be set"))?;
        let spider = Spider::new(Some(api_key))
            .map_err(|e| anyhow!("Failed to create Spider client: {}", e))?;
        Ok(Renderer::Spider(spider))
    }
}

impl PageSource for Renderer {
    async fn fetch_html(&self, url: &str, ready: PageReady) -> Result<String, FetchError> {
        let start = Instant::now();
        let fetched = tokio::time::timeout(NAVIGATION_TIMEOUT, async {
            match self {
                // static HTML, nothing to wait for
                Renderer::Http(client) => fetch_http(client, url).await,
                Renderer::Spider(spider) => fetch_spider(spider, url, ready).await,
            }
        })
        .await
        .map_err(|_| FetchError::Timeout(NAVIGATION_TIMEOUT))?;
        debug!("Fetched {} in {}ms", url, start.elapsed().as_millis());
        fetched
    }
}

async fn fetch_http(client: &reqwest::Client, url: &str) -> Result<String, FetchError> {
    let response = client.get(url).send().await.map_err(transport_error)?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }
    response.text().await.map_err(transport_error)
}

fn transport_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout(NAVIGATION_TIMEOUT)
    } else {
        FetchError::Transport(e.to_string())
    }
}

/// Browser-rendered raw HTML, returned once `ready` holds.
fn spider_params(ready: PageReady) -> RequestParams {
    let wait_for = match ready {
        PageReady::Selector(selector, limit) => WaitFor {
            selector: Some(Selector {
                timeout: spider_timeout(limit),
                selector: selector.to_string(),
            }),
            ..Default::default()
        },
        PageReady::NetworkIdle(limit) => WaitFor {
            idle_network: Some(IdleNetwork {
                timeout: spider_timeout(limit),
            }),
            ..Default::default()
        },
    };

    RequestParams {
        request: Some(RequestType::Browser),
        return_format: Some(ReturnFormatHandling::Single(ReturnFormat::Raw)),
        wait_for: Some(wait_for),
        ..Default::default()
    }
}

fn spider_timeout(limit: Duration) -> Timeout {
    Timeout {
        secs: limit.as_secs(),
        nanos: limit.subsec_nanos(),
    }
}

async fn fetch_spider(spider: &Spider, url: &str, ready: PageReady) -> Result<String, FetchError> {
    let params = spider_params(ready);

    let response = spider
        .scrape_url(url, Some(params), "application/json")
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    spider_content(response)
}

/// Pull the first page's `content` out of a spider.cloud response.
fn spider_content(response: serde_json::Value) -> Result<String, FetchError> {
    let parsed: serde_json::Value = match response.as_str() {
        Some(s) => serde_json::from_str(s).unwrap_or(response.clone()),
        None => response,
    };

    let first = parsed.as_array().and_then(|arr| arr.first());

    if let Some(status) = first
        .and_then(|obj| obj.get("status"))
        .and_then(|s| s.as_u64())
        .filter(|s| !(200..300).contains(s))
    {
        return Err(FetchError::Status(status as u16));
    }

    first
        .and_then(|obj| obj.get("content"))
        .and_then(|c| c.as_str())
        .filter(|c| !c.trim().is_empty())
        .map(str::to_string)
        .ok_or(FetchError::Empty)
}

// ── Tests ──
