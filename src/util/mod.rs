//! Utility functions shared by the menu model, renderer and preview host.
//!
//! - **Links**: telling real external links apart from the `#` placeholder,
//!   and validating the package index URL
//! - **Text**: Unicode-aware width and single-line labels for outlines

mod links;
mod text;

pub use links::{external_link, is_placeholder, validate_index_url, LinkError, LINK_PLACEHOLDER};
pub use text::{display_width, single_line, truncate_to_width};
