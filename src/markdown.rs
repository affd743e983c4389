//! Markdown rendering for user-generated content.
//!
//! Post bodies, comments and wiki pages are rendered through the same
//! pipeline: bare image URLs on the upstream media hosts are embedded,
//! `r/` and `u/` shorthand becomes local links, comrak converts the
//! markdown, ammonia enforces a strict tag and attribute allow-list, and
//! any URL still bare in the text is linked.

mod renderer;
mod rewrite;
mod sanitize;

use crate::listing::Listing;
use crate::post::Post;

pub use renderer::MarkdownRenderer;
pub use rewrite::{embed_image_links, rewrite_local_refs};
pub use sanitize::{ALLOWED_ATTRIBUTES, ALLOWED_TAGS, linkify};

/// Renders markdown with a freshly configured renderer.
///
/// Prefer holding a [`MarkdownRenderer`] when rendering many texts.
pub fn render_markdown(text: &str) -> String {
    MarkdownRenderer::new().render(text)
}

/// Sets rendered fields on a post and its whole comment tree.
pub fn enrich_post(post: &mut Post) {
    MarkdownRenderer::new().enrich_post(post);
}

/// Sets rendered fields on every post of a listing.
pub fn enrich_listing(listing: &mut Listing) {
    MarkdownRenderer::new().enrich_listing(listing);
}
