// src/analyzer/probe.rs
// =============================================================================
// This module checks which of the discovered links are unreachable.
//
// Key functionality:
// - One GET per link, each with its own timeout
// - A link is unreachable when the request fails or the status is >= 400
// - Probes run concurrently through a bounded pool (buffer_unordered)
// - Results are collected in completion order, so the output order is not
//   the input order
//
// A failed probe is data, never an error: `unreachable_links` cannot fail.
// =============================================================================

use std::time::Duration;

use futures::stream::{self, StreamExt};
use reqwest::Client;
use tracing::{debug, info};

/// What a single probe observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// 2xx or 3xx
    Reachable(u16),
    /// The server answered with 4xx or 5xx
    ErrorStatus(u16),
    /// No response at all (DNS, refused, timeout, unsupported scheme...)
    Failed(String),
}

impl ProbeOutcome {
    pub fn is_reachable(&self) -> bool {
        matches!(self, ProbeOutcome::Reachable(_))
    }
}

/// Probes links with a shared client and a fixed pool width
#[derive(Debug, Clone)]
pub struct LinkProber {
    client: Client,
    timeout: Duration,
    concurrency: usize,
}

impl LinkProber {
    pub fn new(client: Client, timeout: Duration, concurrency: usize) -> Self {
        Self {
            client,
            timeout,
            // buffer_unordered(0) would never make progress
            concurrency: concurrency.max(1),
        }
    }

    // Returns the links whose probe did not come back reachable
    //
    // Every link is probed, duplicates included, and the call only returns
    // once all probes have finished. At most `concurrency` requests are in
    // flight at any moment.
    pub async fn unreachable_links(&self, links: &[String]) -> Vec<String> {
        info!(links = links.len(), concurrency = self.concurrency, "probing link accessibility");

        let probes = links.iter().cloned().map(|link| async move {
            let outcome = self.probe(&link).await;
            (link, outcome)
        });

        let unreachable: Vec<String> = stream::iter(probes)
            .buffer_unordered(self.concurrency)
            .filter_map(|(link, outcome)| async move {
                (!outcome.is_reachable()).then_some(link)
            })
            .collect()
            .await;

        info!(unreachable = unreachable.len(), "link probing finished");
        unreachable
    }

    /// Probes one URL
    pub async fn probe(&self, link: &str) -> ProbeOutcome {
        let outcome = match self.client.get(link).timeout(self.timeout).send().await {
            // The body is never read; dropping the response releases it
            Ok(response) => classify_status(response.status().as_u16()),
            Err(e) => ProbeOutcome::Failed(e.to_string()),
        };

        debug!(link, ?outcome, "probe finished");
        outcome
    }
}

fn classify_status(status: u16) -> ProbeOutcome {
    if status >= 400 {
        ProbeOutcome::ErrorStatus(status)
    } else {
        ProbeOutcome::Reachable(status)
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why buffer_unordered instead of one task per link?
//    - A page with thousands of links would otherwise open thousands of
//      sockets at once
//    - buffer_unordered(N) keeps N probes in flight and starts the next one
//      as soon as any finishes, so every link is still probed concurrently
//
// 2. Why does the order of the result change between runs?
//    - buffer_unordered yields results as they complete
//    - A slow server early in the list ends up late in the output
//
// 3. Why borrow `self` inside the futures?
//    - The stream is fully consumed before `unreachable_links` returns, so
//      the futures never outlive the prober and no cloning is needed
// -----------------------------------------------------------------------------
