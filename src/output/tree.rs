//! Result tree rendering
//!
//! A scrape returns the target page with its discovered links as children.
//! Rendering walks the tree depth-first with an explicit stack, so deep trees
//! cannot overflow the call stack.

use std::io::{self, Write};

/// A scraped page and the links discovered on it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScrapedPage {
    /// The page URL
    pub url: String,

    /// Pages linked from this one, in discovery order
    pub links: Vec<ScrapedPage>,
}

impl ScrapedPage {
    /// Creates a page with no links
    pub fn leaf(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            links: Vec::new(),
        }
    }

    /// Creates a page whose links are leaves built from `urls`
    pub fn with_links<I, S>(url: impl Into<String>, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            url: url.into(),
            links: urls.into_iter().map(ScrapedPage::leaf).collect(),
        }
    }

    /// Total number of pages in the tree, including this one
    pub fn page_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(page) = stack.pop() {
            count += 1;
            stack.extend(page.links.iter());
        }
        count
    }
}

/// Renders a page tree as an indented list
///
/// Each page is a `- url` line indented two spaces per level below the root.
///
/// # Examples
///
/// ```
/// use sitescope::output::{render_tree, ScrapedPage};
///
/// let page = ScrapedPage::with_links("https://example.com/", ["https://example.com/a"]);
/// assert_eq!(render_tree(&page), "- https://example.com/\n  - https://example.com/a\n");
/// ```
pub fn render_tree(page: &ScrapedPage) -> String {
    let mut out = String::new();

    // Children are pushed in reverse so they pop in link order
    let mut stack = vec![(page, 0usize)];
    while let Some((current, depth)) = stack.pop() {
        out.push_str(&"  ".repeat(depth));
        out.push_str("- ");
        out.push_str(&current.url);
        out.push('\n');

        for link in current.links.iter().rev() {
            stack.push((link, depth + 1));
        }
    }

    out
}

/// Writes the rendered tree under a `Results:` heading
pub fn write_tree<W: Write>(page: &ScrapedPage, out: &mut W) -> io::Result<()> {
    writeln!(out, "Results:")?;
    out.write_all(render_tree(page).as_bytes())?;
    out.flush()
}
