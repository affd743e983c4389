//! Threaded comment trees.
//!
//! Upstream returns comments as a nested listing in which truncated
//! branches are replaced by "more" placeholders listing unfetched child
//! ids. This module flattens that listing into comment records
//! ([`collect`]), resolves requested placeholders in one batch round
//! ([`expand`]), and rebuilds a stable forest from parent references
//! ([`tree`]).

mod collect;
mod expand;
mod tree;

use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

use crate::client::Upstream;
use crate::fullname::Fullname;

pub use collect::{Collected, MAX_REPLY_DEPTH, collect_listing, parse_comment};
pub use expand::{MORE_CHILDREN_BATCH, expand_more_children};
pub use tree::{assemble_tree, focus_comment};

/// Normalized comment with its replies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub id: String,
    pub fullname: Fullname,
    /// Parent reference: a comment or the link itself.
    pub parent: Option<Fullname>,
    pub author: Option<String>,
    pub author_fullname: Option<String>,
    pub body: String,
    /// Rendered body, set by enrichment.
    pub body_html: Option<String>,
    pub score: Option<i64>,
    pub created_utc: Option<f64>,
    pub created_rel: String,
    pub children: Vec<CommentNode>,
}

/// Stand-in for child comments that were not included in the listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placeholder {
    pub parent: Option<Fullname>,
    /// Bare ids of the unfetched children, in upstream order.
    pub children: Vec<String>,
}

/// Node of the comment forest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CommentNode {
    Comment(Comment),
    More(Placeholder),
}

impl CommentNode {
    pub fn as_comment(&self) -> Option<&Comment> {
        match self {
            Self::Comment(comment) => Some(comment),
            Self::More(_) => None,
        }
    }
}

/// Result of building a comment tree for one post.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommentTree {
    pub comments: Vec<CommentNode>,
    /// True when an expansion round was performed.
    pub fetched_more: bool,
}

/// Builds the comment forest for a post.
///
/// Walks the nested listing, fetches placeholder children fully covered
/// by `wanted` in one expansion round, then assembles the forest in first
/// discovery order.
///
/// # Arguments
///
/// * `upstream`: Client used for the expansion round
/// * `link`: Fullname of the post the comments belong to
/// * `listing`: Top level `children` of the post's comment listing
/// * `wanted`: Child ids the caller asked to expand (may be empty)
///
/// # Returns
///
/// Comment forest and whether more children were fetched
pub fn build_comment_tree<U>(
    upstream: &U,
    link: &Fullname,
    listing: &[Value],
    wanted: &HashSet<String>,
) -> CommentTree
where
    U: Upstream + ?Sized,
{
    let mut collected = collect_listing(listing, wanted);
    let to_expand = std::mem::take(&mut collected.to_expand);

    let fetched_more = !to_expand.is_empty();
    if fetched_more {
        collected.merge(expand_more_children(upstream, link, &to_expand));
    }

    CommentTree {
        comments: assemble_tree(collected),
        fetched_more,
    }
}
