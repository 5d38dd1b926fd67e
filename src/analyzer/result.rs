// src/analyzer/result.rs
// =============================================================================
// The report produced by one analysis, and the code that assembles it.
//
// Field names on the wire are fixed: title, headings, html_version,
// internal_links, external_links, inaccessible_links, is_login_form.
// =============================================================================

use std::collections::BTreeMap;

use serde::Serialize;

use super::document::{HtmlVersion, PageMetadata};
use super::links::DiscoveredLinks;

/// Everything we learned about one page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub title: String,
    /// Always "h1".."h6", zero when a level is absent
    pub headings: BTreeMap<String, usize>,
    pub html_version: HtmlVersion,
    pub internal_links: Vec<String>,
    pub external_links: Vec<String>,
    /// Subset of internal + external links, in probe completion order
    pub inaccessible_links: Vec<String>,
    #[serde(rename = "is_login_form")]
    pub login_form: bool,
}

impl AnalysisResult {
    /// Puts the outputs of the individual stages together
    pub fn assemble(
        metadata: PageMetadata,
        links: DiscoveredLinks,
        inaccessible_links: Vec<String>,
        login_form: bool,
    ) -> Self {
        Self {
            title: metadata.title,
            headings: metadata.headings,
            html_version: metadata.html_version,
            internal_links: links.internal,
            external_links: links.external,
            inaccessible_links,
            login_form,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_wire_names() {
        let headings = (1..=6).map(|level| (format!("h{}", level), 0)).collect();
        let result = AnalysisResult::assemble(
            PageMetadata {
                title: "Home".to_string(),
                headings,
                html_version: HtmlVersion::Html5,
            },
            DiscoveredLinks {
                all: vec!["https://example.com/a".to_string(), "https://other.org/".to_string()],
                internal: vec!["https://example.com/a".to_string()],
                external: vec!["https://other.org/".to_string()],
            },
            vec!["https://other.org/".to_string()],
            true,
        );

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["title"], "Home");
        assert_eq!(json["html_version"], "HTML5");
        assert_eq!(json["headings"]["h3"], 0);
        assert_eq!(json["headings"].as_object().unwrap().len(), 6);
        assert_eq!(json["internal_links"][0], "https://example.com/a");
        assert_eq!(json["external_links"][0], "https://other.org/");
        assert_eq!(json["inaccessible_links"][0], "https://other.org/");
        assert_eq!(json["is_login_form"], true);
        assert!(json.get("login_form").is_none());
    }
}
