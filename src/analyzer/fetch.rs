// src/analyzer/fetch.rs
// =============================================================================
// Fetches the page under analysis and classifies transport failures.
//
// Key functionality:
// - Builds the shared reqwest client (redirect policy, user agent, resolver)
// - Issues exactly one GET with the configured timeout, no retries
// - Maps reqwest errors onto AnalyzeError using the error types themselves
//   (timeout flag, our own resolver error, rustls::Error) instead of
//   matching on message text
//
// The client resolves hosts through `LookupResolver` so that a DNS failure
// carries a concrete type (`UnresolvedHost`) we can find again in the error's
// source chain.
// =============================================================================

use std::error::Error as StdError;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use hyper::client::connect::dns::Name;
use reqwest::dns::{Addrs, Resolve, Resolving};
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use super::{AnalyzeError, AnalyzerConfig};

/// DNS failure raised by `LookupResolver`
#[derive(Debug, Error)]
#[error("could not resolve host {host}")]
pub struct UnresolvedHost {
    host: String,
    #[source]
    source: io::Error,
}

/// Resolves host names with the system resolver via tokio
struct LookupResolver;

impl Resolve for LookupResolver {
    fn resolve(&self, name: Name) -> Resolving {
        let host = name.as_str().to_string();
        Box::pin(async move {
            let resolved = tokio::net::lookup_host((host.as_str(), 0))
                .await
                .map(|addrs| addrs.collect::<Vec<SocketAddr>>());

            match resolved {
                Ok(addrs) if !addrs.is_empty() => Ok(Box::new(addrs.into_iter()) as Addrs),
                Ok(_) => Err(Box::new(UnresolvedHost {
                    host,
                    source: io::Error::new(io::ErrorKind::NotFound, "no addresses returned"),
                }) as Box<dyn StdError + Send + Sync>),
                Err(source) => {
                    Err(Box::new(UnresolvedHost { host, source }) as Box<dyn StdError + Send + Sync>)
                }
            }
        })
    }
}

/// Builds the client shared by the page fetch and the link probes
///
/// Timeouts are applied per request, so one client serves both stages.
pub fn build_client(config: &AnalyzerConfig) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
        .dns_resolver(Arc::new(LookupResolver))
        .build()
}

/// Downloads the page body
///
/// The response is consumed by `text()`, which releases the connection on
/// success and on error alike.
pub async fn fetch_page(client: &Client, url: &Url, config: &AnalyzerConfig) -> Result<String, AnalyzeError> {
    let response = client
        .get(url.clone())
        .timeout(config.fetch_timeout)
        .send()
        .await
        .map_err(|e| {
            warn!(url = %url, error = %e, "fetch failed");
            classify_transport_error(&e)
        })?;

    debug!(url = %url, status = response.status().as_u16(), "page fetched");

    response.text().await.map_err(|e| {
        warn!(url = %url, error = %e, "reading response body failed");
        if e.is_timeout() {
            AnalyzeError::Timeout
        } else {
            AnalyzeError::Parse(e.to_string())
        }
    })
}

/// Maps a transport error onto one of the fixed network categories
pub fn classify_transport_error(error: &reqwest::Error) -> AnalyzeError {
    if error.is_timeout() || has_io_kind(error, io::ErrorKind::TimedOut) {
        return AnalyzeError::Timeout;
    }

    if source_chain(error).any(|e| e.is::<UnresolvedHost>()) {
        return AnalyzeError::HostUnresolved;
    }

    if error.is_connect() && source_chain(error).any(is_tls_error) {
        return AnalyzeError::TlsFailure;
    }

    AnalyzeError::ConnectionFailure
}

fn has_io_kind(error: &reqwest::Error, kind: io::ErrorKind) -> bool {
    source_chain(error)
        .filter_map(|e| e.downcast_ref::<io::Error>())
        .any(|e| e.kind() == kind)
}

// tokio-rustls wraps the rustls error in an io::Error, and io::Error::source()
// skips the wrapped error itself, so it has to be unpacked with get_ref()
fn is_tls_error(error: &(dyn StdError + 'static)) -> bool {
    if error.is::<rustls::Error>() {
        return true;
    }
    error
        .downcast_ref::<io::Error>()
        .and_then(|e| e.get_ref())
        .is_some_and(|inner| inner.is::<rustls::Error>())
}

fn source_chain<'a>(
    error: &'a (dyn StdError + 'static),
) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(Some(error), |&e| e.source())
}
