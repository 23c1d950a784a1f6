//! Sitemap document parsing
//!
//! Supports the sitemaps.org XML formats and plain-text sitemaps:
//!
//! - `<urlset><url><loc>…</loc></url></urlset>` lists page URLs
//! - `<sitemapindex><sitemap><loc>…</loc></sitemap></sitemapindex>` lists other sitemaps
//! - plain text lists one URL per line

use crate::sitemap::SitemapError;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Reader;

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// Page URLs, from a `<urlset>` or a text sitemap
    UrlSet(Vec<String>),
    /// Child sitemap URLs, from a `<sitemapindex>`
    Index(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Root {
    UrlSet,
    Index,
}

impl Root {
    fn from_tag(name: &str) -> Option<Self> {
        match name {
            "urlset" => Some(Self::UrlSet),
            "sitemapindex" => Some(Self::Index),
            _ => None,
        }
    }

    fn entry_tag(self) -> &'static str {
        match self {
            Self::UrlSet => "url",
            Self::Index => "sitemap",
        }
    }
}

/// Parses sitemap content of either format
///
/// Content whose first non-blank character is `<` is treated as XML; anything
/// else is a text sitemap.
///
/// # Arguments
///
/// * `content` - The raw sitemap body
///
/// # Returns
///
/// * `Ok(SitemapDocument)` - The URLs found, classified by document kind
/// * `Err(SitemapError)` - Malformed XML or an unrecognized root element
///
/// # Examples
///
/// ```
/// use sitescope::sitemap::{parse_sitemap, SitemapDocument};
///
/// let xml = "<urlset><url><loc>https://example.com/a</loc></url></urlset>";
/// assert_eq!(
///     parse_sitemap(xml).unwrap(),
///     SitemapDocument::UrlSet(vec!["https://example.com/a".to_string()])
/// );
///
/// let text = "https://example.com/a\n\nhttps://example.com/b\n";
/// assert_eq!(
///     parse_sitemap(text).unwrap(),
///     SitemapDocument::UrlSet(vec!["https://example.com/a".to_string(), "https://example.com/b".to_string()])
/// );
/// ```
pub fn parse_sitemap(content: &str) -> Result<SitemapDocument, SitemapError> {
    let content = content.trim_start_matches('\u{feff}').trim_start();

    if content.starts_with('<') {
        parse_xml(content)
    } else {
        Ok(SitemapDocument::UrlSet(parse_text(content)))
    }
}

/// Each non-blank trimmed line is a URL; no validation happens here
fn parse_text(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_xml(xml: &str) -> Result<SitemapDocument, SitemapError> {
    let mut root: Option<Root> = None;
    let mut depth = 0usize;
    let mut in_entry = false;
    let mut in_loc = false;
    let mut current_loc = String::new();
    let mut locs = Vec::new();

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    // Only <loc> elements directly under a root-level entry count, so
    // extension tags such as <image:loc> are not mistaken for page URLs.
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                depth += 1;
                let name = local_name(e);
                match root {
                    None => root = Some(root_kind(&name)?),
                    Some(kind) => {
                        if depth == 2 && name == kind.entry_tag() {
                            in_entry = true;
                        } else if in_entry && depth == 3 && name == "loc" {
                            in_loc = true;
                            current_loc.clear();
                        }
                    }
                }
            }
            Ok(Event::Empty(ref e)) => {
                if root.is_none() {
                    // A self-closing root is a valid, empty document
                    root = Some(root_kind(&local_name(e))?);
                }
            }
            Ok(Event::Text(ref e)) => {
                if in_loc {
                    let text = e
                        .unescape()
                        .map_err(|err| SitemapError::Xml(err.to_string()))?;
                    current_loc.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if in_loc {
                    current_loc.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::End(ref e)) => {
                let name = end_name(e);
                if in_loc && depth == 3 && name == "loc" {
                    in_loc = false;
                    let loc = current_loc.trim();
                    if !loc.is_empty() {
                        locs.push(loc.to_string());
                    }
                } else if depth == 2 && root.is_some_and(|kind| name == kind.entry_tag()) {
                    in_entry = false;
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(SitemapError::Xml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    match root {
        Some(Root::UrlSet) => Ok(SitemapDocument::UrlSet(locs)),
        Some(Root::Index) => Ok(SitemapDocument::Index(locs)),
        None => Err(SitemapError::NoRoot),
    }
}

fn root_kind(name: &str) -> Result<Root, SitemapError> {
    Root::from_tag(name).ok_or_else(|| SitemapError::UnknownRoot(name.to_string()))
}

/// Element name without any namespace prefix (`sm:loc` becomes `loc`)
fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).to_string()
}

fn end_name(e: &BytesEnd<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).to_string()
}
