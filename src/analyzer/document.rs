// src/analyzer/document.rs
// =============================================================================
// Parses the fetched body and reads page metadata from it.
//
// Metadata:
// - Title: text of the first <title>, trimmed ("" when there is none)
// - Headings: how many h1..h6 elements exist anywhere in the tree
// - HTML version: first marker of VERSION_MARKERS found in the serialized,
//   lower-cased document
//
// html5ever drops the public/system identifiers when it serializes a
// doctype, so `serialize_document` renders doctype nodes itself. Without
// that, "<!DOCTYPE HTML PUBLIC ... 4.01 ...>" would come back as
// "<!DOCTYPE html>" and be reported as HTML5.
// =============================================================================

use std::collections::BTreeMap;
use std::fmt::{self, Write};

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};
use serde::{Serialize, Serializer};

static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").expect("valid selector"));

static HEADINGS: Lazy<Vec<(String, Selector)>> = Lazy::new(|| {
    (1..=6)
        .map(|level| {
            let tag = format!("h{}", level);
            let selector = Selector::parse(&tag).expect("valid selector");
            (tag, selector)
        })
        .collect()
});

/// Markup version family detected from the document text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HtmlVersion {
    Html5,
    Html401Transitional,
    Html401,
    Html40,
    Xhtml10Strict,
    Xhtml10,
    Xhtml11,
    Html32,
    Html20,
    /// No marker matched
    PreHtml4,
    /// The document could not be serialized
    Unknown,
}

impl HtmlVersion {
    pub fn label(&self) -> &'static str {
        match self {
            HtmlVersion::Html5 => "HTML5",
            HtmlVersion::Html401Transitional => "HTML 4.01 Transitional",
            HtmlVersion::Html401 => "HTML 4.01",
            HtmlVersion::Html40 => "HTML 4.0",
            HtmlVersion::Xhtml10Strict => "XHTML 1.0 Strict",
            HtmlVersion::Xhtml10 => "XHTML 1.0",
            HtmlVersion::Xhtml11 => "XHTML 1.1",
            HtmlVersion::Html32 => "HTML 3.2",
            HtmlVersion::Html20 => "HTML 2.0",
            HtmlVersion::PreHtml4 => "Unknown or pre-HTML 4",
            HtmlVersion::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for HtmlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for HtmlVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// Checked in this order; the first marker contained in the document wins.
// "html 4.01" must come before "html 4.0" since the latter is a prefix.
const VERSION_MARKERS: &[(&str, HtmlVersion)] = &[
    ("<!doctype html>", HtmlVersion::Html5),
    ("-//w3c//dtd html 4.01 transitional//en", HtmlVersion::Html401Transitional),
    ("html 4.01", HtmlVersion::Html401),
    ("html 4.0", HtmlVersion::Html40),
    ("-//w3c//dtd xhtml 1.0 strict//en", HtmlVersion::Xhtml10Strict),
    ("xhtml 1.0", HtmlVersion::Xhtml10),
    ("-//w3c//dtd xhtml 1.1//en", HtmlVersion::Xhtml11),
    ("xhtml 1.1", HtmlVersion::Xhtml11),
    ("html 3.2", HtmlVersion::Html32),
    ("html 2.0", HtmlVersion::Html20),
];

/// Title, heading counts and version of one document
#[derive(Debug, Clone, PartialEq)]
pub struct PageMetadata {
    pub title: String,
    pub headings: BTreeMap<String, usize>,
    pub html_version: HtmlVersion,
}

/// Parses a page body into a queryable tree
///
/// html5ever recovers from any malformed markup, so this cannot fail.
pub fn parse_document(body: &str) -> Html {
    Html::parse_document(body)
}

pub fn extract_metadata(document: &Html) -> PageMetadata {
    PageMetadata {
        title: extract_title(document),
        headings: count_headings(document),
        html_version: detect_html_version(document),
    }
}

fn extract_title(document: &Html) -> String {
    document
        .select(&TITLE)
        .next()
        .map(|title| title.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Always returns all six levels, zero when absent
fn count_headings(document: &Html) -> BTreeMap<String, usize> {
    HEADINGS
        .iter()
        .map(|(tag, selector)| (tag.clone(), document.select(selector).count()))
        .collect()
}

pub fn detect_html_version(document: &Html) -> HtmlVersion {
    let content = match serialize_document(document) {
        Ok(html) => html.to_lowercase(),
        Err(_) => return HtmlVersion::Unknown,
    };

    VERSION_MARKERS
        .iter()
        .find(|(marker, _)| content.contains(marker))
        .map(|(_, version)| *version)
        .unwrap_or(HtmlVersion::PreHtml4)
}

/// Renders the whole tree back to markup, doctype identifiers included
fn serialize_document(document: &Html) -> Result<String, fmt::Error> {
    let mut out = String::new();

    for child in document.tree.root().children() {
        match child.value() {
            Node::Doctype(doctype) => {
                write!(out, "<!DOCTYPE {}", doctype.name())?;
                let public_id = doctype.public_id();
                let system_id = doctype.system_id();
                if !public_id.is_empty() {
                    write!(out, " PUBLIC \"{}\"", public_id)?;
                    if !system_id.is_empty() {
                        write!(out, " \"{}\"", system_id)?;
                    }
                } else if !system_id.is_empty() {
                    write!(out, " SYSTEM \"{}\"", system_id)?;
                }
                out.write_char('>')?;
            }
            Node::Comment(comment) => write!(out, "<!--{}-->", &**comment)?,
            Node::Text(text) => out.write_str(text)?,
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(child) {
                    out.write_str(&element.html())?;
                }
            }
            _ => {}
        }
    }

    Ok(out)
}
