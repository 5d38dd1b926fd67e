// src/analyzer/mod.rs
// =============================================================================
// The analysis engine.
//
// Pipeline for one URL:
//   validate -> fetch -> parse -> {metadata, links, login form}
//            -> probe every link (bounded, concurrent) -> assemble
//
// Submodules:
// - validate: syntactic URL check
// - fetch: the single page GET and transport error classification
// - document: parsing, title, headings, HTML version
// - links: anchor discovery and internal/external split
// - probe: concurrent reachability checks
// - login: login form heuristic
// - result: the report type
// - error: the error taxonomy
//
// Every call is independent: nothing is cached or shared between analyses
// except the HTTP client's connection pool.
// =============================================================================

mod document;
mod error;
mod fetch;
mod links;
mod login;
mod probe;
mod result;
mod validate;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};
use url::Url;

pub use document::HtmlVersion;
pub use error::AnalyzeError;
pub use result::AnalysisResult;

use document::PageMetadata;
use links::DiscoveredLinks;
use probe::LinkProber;

pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 8;
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 8;
pub const DEFAULT_PROBE_CONCURRENCY: usize = 50;

/// HTTP status reported for a successful analysis
pub const SUCCESS_STATUS: u16 = 201;

/// Tunables of the analysis engine
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Timeout of the page fetch
    pub fetch_timeout: Duration,
    /// Timeout of each individual link probe
    pub probe_timeout: Duration,
    /// Maximum number of probes in flight
    pub probe_concurrency: usize,
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            probe_timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
            probe_concurrency: DEFAULT_PROBE_CONCURRENCY,
            max_redirects: 10,
            user_agent: format!("page-inspector/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// The one capability the dispatch layer depends on
///
/// The server holds an `Arc<dyn Analyze>`, so tests can hand it a stub.
#[async_trait]
pub trait Analyze: Send + Sync {
    async fn analyze(&self, raw_url: &str) -> Result<AnalysisResult, AnalyzeError>;
}

/// Analyzer backed by real HTTP requests
pub struct Analyzer {
    config: AnalyzerConfig,
    client: Client,
    prober: LinkProber,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> reqwest::Result<Self> {
        let client = fetch::build_client(&config)?;
        let prober = LinkProber::new(client.clone(), config.probe_timeout, config.probe_concurrency);
        Ok(Self {
            config,
            client,
            prober,
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }
}

#[async_trait]
impl Analyze for Analyzer {
    async fn analyze(&self, raw_url: &str) -> Result<AnalysisResult, AnalyzeError> {
        info!(url = raw_url, "starting analysis");

        let base = match validate::validate_url(raw_url) {
            Ok(url) => url,
            Err(e) => {
                warn!(url = raw_url, "rejected invalid url");
                return Err(e);
            }
        };

        let body = fetch::fetch_page(&self.client, &base, &self.config).await?;

        // The parsed tree is not Send, so it must be gone before the next await
        let report = inspect_document(&body, &base);
        drop(body);

        let inaccessible = self.prober.unreachable_links(&report.links.all).await;

        info!(
            url = %base,
            internal = report.links.internal.len(),
            external = report.links.external.len(),
            inaccessible = inaccessible.len(),
            "analysis complete"
        );

        Ok(AnalysisResult::assemble(
            report.metadata,
            report.links,
            inaccessible,
            report.login_form,
        ))
    }
}

/// Everything read from the parsed document
struct DocumentReport {
    metadata: PageMetadata,
    links: DiscoveredLinks,
    login_form: bool,
}

fn inspect_document(body: &str, base: &Url) -> DocumentReport {
    let document = document::parse_document(body);
    DocumentReport {
        metadata: document::extract_metadata(&document),
        links: links::classify_links(&document, base),
        login_form: login::has_login_form(&document),
    }
}
