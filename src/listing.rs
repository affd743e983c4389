//! Listing loader.

use serde::Serialize;
use tracing::{debug, warn};

use crate::client::{ListingQuery, Upstream};
use crate::error::Result;
use crate::post::{Post, PostNormalizer, UPSTREAM_BASE_URL};

/// One page of posts with its pagination cursors.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Listing {
    pub posts: Vec<Post>,
    pub after: Option<String>,
    pub before: Option<String>,
}

/// Knobs applied while loading a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingOptions {
    /// Drop posts flagged `over_18`.
    pub hide_nsfw: bool,
    /// Root prepended to relative permalinks.
    pub base_url: String,
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self {
            hide_nsfw: false,
            base_url: UPSTREAM_BASE_URL.to_string(),
        }
    }
}

/// Fetches and normalizes one listing page.
///
/// Posts are normalized with the listing brief length. A post missing an
/// identifying field is logged and skipped; the rest of the page loads.
///
/// # Arguments
///
/// * `upstream`: Client to fetch from
/// * `query`: Listing source and cursor
/// * `options`: NSFW filter and permalink root
///
/// # Returns
///
/// Normalized posts in upstream order, with the page cursors
///
/// # Errors
///
/// Returns the fetch error, e.g. [`crate::Error::NotFound`] for an
/// unknown subreddit
pub fn load_listing<U>(upstream: &U, query: &ListingQuery, options: &ListingOptions) -> Result<Listing>
where
    U: Upstream + ?Sized,
{
    let raw = upstream.fetch_listing(query)?;
    let normalizer = PostNormalizer::for_listing(options.base_url.as_str());

    let mut posts = Vec::with_capacity(raw.posts.len());
    for (position, data) in raw.posts.iter().enumerate() {
        match normalizer.normalize(data) {
            Ok(post) if options.hide_nsfw && post.nsfw => {
                debug!(id = %post.id, "hiding nsfw post");
            }
            Ok(post) => posts.push(post),
            Err(e) => warn!(position, error = %e, "skipping malformed post"),
        }
    }

    Ok(Listing {
        posts,
        after: raw.after,
        before: raw.before,
    })
}
