//! Output module for presenting scrape results
//!
//! This module holds the result tree returned by a scrape and renders it as
//! an indented list of URLs for the terminal.

mod tree;

pub use tree::{render_tree, write_tree, ScrapedPage};
