//! Read-only front end for a reddit-style JSON API.
//!
//! The core turns raw upstream JSON into normalized posts and threaded
//! comment trees, renders user markdown to sanitized HTML, and hides the
//! network behind the [`Upstream`] trait. Around it sits a small static
//! page generator: maud pages written to an output directory.

mod assets;
pub mod client;
pub mod comments;
pub mod components;
mod config;
mod error;
pub mod fullname;
pub mod generators;
pub mod listing;
pub mod markdown;
pub mod pages;
pub mod post;
pub mod route;
pub mod thread;
mod util;

pub use assets::{CSS_ASSETS, write_css_assets};
pub use client::{
    HttpClient, ListingQuery, ListingSource, RawListing, RawThread, Upstream, WikiPage,
};
pub use comments::{
    Comment, CommentNode, CommentTree, Placeholder, build_comment_tree, focus_comment,
};
pub use config::{Command, Config};
pub use error::{Error, Result};
pub use fullname::{Fullname, Kind};
pub use generators::{GeneratedPage, generate_not_found_page, generate_page, write_page};
pub use listing::{Listing, ListingOptions, load_listing};
pub use markdown::{MarkdownRenderer, enrich_listing, enrich_post, render_markdown};
pub use post::{Post, PostNormalizer, normalize_post};
pub use route::{PostView, Route};
pub use thread::{load_thread, load_thread_with};
pub use util::{format_relative_time, truncate_brief};
