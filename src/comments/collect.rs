//! Flattening of nested comment listings.

use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use super::{Comment, Placeholder};
use crate::fullname::Fullname;
use crate::util::{format_relative_time, opt_f64, opt_i64, opt_object, opt_str};

/// Deepest reply nesting followed when walking a listing.
///
/// Upstream is asked for depth 10, so this only trips on hostile input.
pub const MAX_REPLY_DEPTH: usize = 64;

/// Comments, placeholders and expansion requests found in a listing.
///
/// Comments keep first discovery order. A fullname seen twice replaces
/// the earlier record in its original position.
#[derive(Debug, Default, Clone)]
pub struct Collected {
    pub(super) comments: Vec<Comment>,
    pub(super) index: HashMap<Fullname, usize>,
    pub placeholders: Vec<Placeholder>,
    /// Child ids to fetch in the expansion round.
    pub to_expand: Vec<String>,
}

impl Collected {
    /// Comments in discovery order.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn get(&self, fullname: &Fullname) -> Option<&Comment> {
        self.index.get(fullname).map(|&i| &self.comments[i])
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty() && self.placeholders.is_empty()
    }

    fn insert(&mut self, comment: Comment) {
        match self.index.get(&comment.fullname) {
            Some(&i) => self.comments[i] = comment,
            None => {
                self.index
                    .insert(comment.fullname.clone(), self.comments.len());
                self.comments.push(comment);
            }
        }
    }

    /// Merges another batch: comment union and placeholder concatenation.
    pub fn merge(&mut self, other: Collected) {
        for comment in other.comments {
            self.insert(comment);
        }
        self.placeholders.extend(other.placeholders);
        self.to_expand.extend(other.to_expand);
    }
}

/// Walks a nested listing depth first.
///
/// A "more" thing goes to `to_expand` only when `wanted` is non-empty and
/// contains every one of its child ids; otherwise it is kept whole as a
/// [`Placeholder`].
///
/// # Arguments
///
/// * `children`: Things of a listing (`t1` and `more` kinds)
/// * `wanted`: Child ids requested for expansion
///
/// # Returns
///
/// Collected comments, placeholders and ids to expand
pub fn collect_listing(children: &[Value], wanted: &HashSet<String>) -> Collected {
    let mut collected = Collected::default();
    walk(children, wanted, 0, &mut collected);
    collected
}

fn walk(items: &[Value], wanted: &HashSet<String>, depth: usize, out: &mut Collected) {
    for item in items {
        let data = item.get("data").unwrap_or(&Value::Null);

        match item.get("kind").and_then(Value::as_str) {
            Some("t1") => {
                if let Some(comment) = parse_comment(data) {
                    out.insert(comment);
                }

                let Some(replies) = reply_children(data) else {
                    continue;
                };
                if depth + 1 >= MAX_REPLY_DEPTH {
                    debug!(depth, "reply nesting too deep, dropping branch");
                    continue;
                }
                walk(replies, wanted, depth + 1, out);
            }
            Some("more") => {
                let Some(kids) = data.get("children").and_then(Value::as_array) else {
                    continue;
                };
                let ids: Vec<String> = kids
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect();

                if !wanted.is_empty() && ids.iter().all(|id| wanted.contains(id)) {
                    out.to_expand.extend(ids);
                } else {
                    out.placeholders.push(Placeholder {
                        parent: parse_fullname(data, "parent_id"),
                        children: ids,
                    });
                }
            }
            _ => {}
        }
    }
}

/// Returns the `children` of an embedded replies listing.
///
/// Leaf comments carry `"replies": ""` instead of an object.
fn reply_children(data: &Value) -> Option<&[Value]> {
    opt_object(data, "replies")?
        .get("data")?
        .get("children")?
        .as_array()
        .map(Vec::as_slice)
}

/// Normalizes one comment `data` object.
///
/// Returns None when the comment has no usable fullname, since it could
/// not be placed in the tree.
pub fn parse_comment(data: &Value) -> Option<Comment> {
    let fullname = parse_fullname(data, "name")?;
    let created_utc = opt_f64(data, "created_utc");

    Some(Comment {
        id: opt_str(data, "id").unwrap_or_else(|| fullname.id().to_string()),
        parent: parse_fullname(data, "parent_id"),
        author: opt_str(data, "author"),
        author_fullname: opt_str(data, "author_fullname"),
        body: opt_str(data, "body").unwrap_or_default(),
        body_html: None,
        score: opt_i64(data, "score"),
        created_rel: format_relative_time(created_utc),
        created_utc,
        children: Vec::new(),
        fullname,
    })
}

fn parse_fullname(data: &Value, key: &str) -> Option<Fullname> {
    opt_str(data, key).and_then(|s| s.parse().ok())
}
