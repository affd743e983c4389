//! Post page loader: one post with its comment tree.

use std::collections::HashSet;
use tracing::debug;

use crate::client::Upstream;
use crate::comments::build_comment_tree;
use crate::error::Result;
use crate::fullname::{Fullname, Kind};
use crate::post::{Post, PostNormalizer};

/// Fetches a post and builds its comment forest.
///
/// Placeholders whose child ids are all listed in `wanted` are expanded
/// in one extra round; every other placeholder is kept in the tree.
///
/// # Arguments
///
/// * `upstream`: Client to fetch from
/// * `normalizer`: Post normalizer (permalink root, brief length)
/// * `post_id`: Bare post id, e.g. `1abcde`
/// * `wanted`: Comment ids to expand (may be empty)
///
/// # Returns
///
/// Post with `comments` populated and rendered fields still empty
///
/// # Errors
///
/// Returns the fetch error, or [`crate::Error::Malformed`] when the post
/// itself lacks an identifying field
pub fn load_thread_with<U>(
    upstream: &U,
    normalizer: &PostNormalizer,
    post_id: &str,
    wanted: &HashSet<String>,
) -> Result<Post>
where
    U: Upstream + ?Sized,
{
    let raw = upstream.fetch_post(post_id)?;
    let mut post = normalizer.normalize(&raw.post)?;

    let link = match post.fullname.kind() {
        Kind::Link => post.fullname.clone(),
        _ => Fullname::link(&post.id),
    };

    let tree = build_comment_tree(upstream, &link, &raw.comments, wanted);
    debug!(
        post = %link,
        roots = tree.comments.len(),
        fetched_more = tree.fetched_more,
        "comment tree built"
    );
    post.comments = tree.comments;

    Ok(post)
}

/// Fetches a post and builds its comment forest with default settings.
///
/// # Errors
///
/// See [`load_thread_with`]
pub fn load_thread<U>(upstream: &U, post_id: &str, wanted: &HashSet<String>) -> Result<Post>
where
    U: Upstream + ?Sized,
{
    load_thread_with(upstream, &PostNormalizer::default(), post_id, wanted)
}
