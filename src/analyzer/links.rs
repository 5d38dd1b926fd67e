// src/analyzer/links.rs
// =============================================================================
// This module finds the links on the analyzed page and sorts them into
// internal and external ones.
//
// We use the `scraper` crate to select every <a href> in document order, and
// the `url` crate to resolve relative references against the page URL.
//
// Rules:
// - href starting with "javascript:" is skipped (any case, leading
//   whitespace ignored)
// - href that cannot be resolved is skipped
// - everything else is kept, duplicates included, in document order
// - internal means "same hostname as the analyzed page", nothing else
//   (scheme and port are ignored, subdomains count as external)
// =============================================================================

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

const JAVASCRIPT_SCHEME: &str = "javascript:";

static ANCHORS: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("valid selector"));

/// Every link found on the page, classified
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveredLinks {
    /// Internal and external links together, in document order
    pub all: Vec<String>,
    pub internal: Vec<String>,
    pub external: Vec<String>,
}

// Walks all anchors of `document` and classifies them against `base`
//
// Example:
//   base = "https://example.com/blog/"
//   <a href="post">        -> internal "https://example.com/blog/post"
//   <a href="//cdn.io/x">  -> external "https://cdn.io/x"
//   <a href="#top">        -> internal "https://example.com/blog/#top"
pub fn classify_links(document: &Html, base: &Url) -> DiscoveredLinks {
    let mut links = DiscoveredLinks::default();
    let base_host = base.host_str();

    for element in document.select(&ANCHORS) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(resolved) = resolve_href(base, href) else {
            continue;
        };

        let absolute = resolved.to_string();
        if resolved.host_str() == base_host {
            links.internal.push(absolute.clone());
        } else {
            links.external.push(absolute.clone());
        }
        links.all.push(absolute);
    }

    links
}

// Resolves an href against the page URL
//
// Returns None for script pseudo-links and for references the url crate
// refuses to parse. `Url::join` handles every reference form: relative
// paths, protocol-relative, fragment-only and absolute URLs.
//
// `Url::join` ignores leading spaces and control characters, so the scheme
// check must ignore them too.
fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    let trimmed = href.trim_start_matches(|c: char| c <= ' ');
    let is_script = trimmed
        .get(..JAVASCRIPT_SCHEME.len())
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case(JAVASCRIPT_SCHEME));
    if is_script {
        return None;
    }

    base.join(href).ok()
}
