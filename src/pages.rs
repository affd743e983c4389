//! Page generation modules for different view types
//!
//! Each page module builds one complete HTML document from records that
//! were already loaded and enriched, using the shared components.

pub mod listing;
pub mod not_found;
pub mod post;
pub mod wiki;
