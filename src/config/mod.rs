//! Configuration module for Sitescope
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every key has a default, so an empty file (or no file
//! at all) yields [`Config::default`].
//!
//! # Example
//!
//! ```no_run
//! use sitescope::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sitescope.toml")).unwrap();
//! println!("Requests will time out after {}ms", config.scraper.timeout_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, ScraperConfig, DEFAULT_USER_AGENT};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
