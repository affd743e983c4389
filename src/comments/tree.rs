//! Forest assembly from parent references, and comment focus.

use std::collections::HashMap;

use super::collect::Collected;
use super::{Comment, CommentNode, Placeholder};
use crate::fullname::Fullname;

/// Reference to a collected record before it is moved into the forest.
#[derive(Debug, Clone, Copy)]
enum Slot {
    Comment(usize),
    More(usize),
}

/// Owns collected records while they are moved into their parents.
struct Arena {
    comments: Vec<Option<Comment>>,
    placeholders: Vec<Option<Placeholder>>,
    children_of: Vec<Vec<Slot>>,
    built: Vec<Option<Comment>>,
    visited: Vec<bool>,
}

/// Assembles collected records into a comment forest.
///
/// A comment or placeholder whose parent is a collected comment becomes
/// that comment's child; anything else (parent is the post, missing, or
/// unresolved) becomes a root. Within each level comments come first in
/// discovery order, followed by placeholders in discovery order.
///
/// Every collected comment appears exactly once. Comments whose parent
/// chain loops back on itself are appended as roots.
///
/// # Arguments
///
/// * `collected`: Comments and placeholders from one or more listings
///
/// # Returns
///
/// Root nodes of the forest
pub fn assemble_tree(collected: Collected) -> Vec<CommentNode> {
    let Collected {
        comments,
        index,
        placeholders,
        ..
    } = collected;

    let mut children_of = vec![Vec::new(); comments.len()];
    let mut roots = Vec::new();

    for (i, comment) in comments.iter().enumerate() {
        match resolve_parent(comment.parent.as_ref(), &index) {
            Some(parent) if parent != i => children_of[parent].push(Slot::Comment(i)),
            _ => roots.push(Slot::Comment(i)),
        }
    }

    for (k, more) in placeholders.iter().enumerate() {
        match resolve_parent(more.parent.as_ref(), &index) {
            Some(parent) => children_of[parent].push(Slot::More(k)),
            None => roots.push(Slot::More(k)),
        }
    }

    let count = comments.len();
    let mut arena = Arena {
        comments: comments.into_iter().map(Some).collect(),
        placeholders: placeholders.into_iter().map(Some).collect(),
        children_of,
        built: vec![None; count],
        visited: vec![false; count],
    };

    let mut forest: Vec<CommentNode> = roots
        .into_iter()
        .filter_map(|slot| arena.build(slot))
        .collect();

    // Only parent cycles leave comments unvisited at this point.
    for i in 0..count {
        if let Some(node) = arena.build(Slot::Comment(i)) {
            forest.push(node);
        }
    }

    forest
}

fn resolve_parent(parent: Option<&Fullname>, index: &HashMap<Fullname, usize>) -> Option<usize> {
    parent
        .filter(|p| p.is_comment())
        .and_then(|p| index.get(p).copied())
}

impl Arena {
    /// Moves a subtree out of the arena, children first.
    ///
    /// Returns None for records that were already placed.
    fn build(&mut self, root: Slot) -> Option<CommentNode> {
        let start = match root {
            Slot::More(k) => return self.placeholders[k].take().map(CommentNode::More),
            Slot::Comment(i) if self.visited[i] => return None,
            Slot::Comment(i) => i,
        };

        self.visited[start] = true;
        let mut stack = vec![(start, false)];

        while let Some((i, ready)) = stack.pop() {
            if !ready {
                stack.push((i, true));
                for slot in self.children_of[i].iter().rev() {
                    if let Slot::Comment(j) = *slot
                        && !self.visited[j]
                    {
                        self.visited[j] = true;
                        stack.push((j, false));
                    }
                }
                continue;
            }

            let Some(mut comment) = self.comments[i].take() else {
                continue;
            };

            let mut children = Vec::with_capacity(self.children_of[i].len());
            for slot in &self.children_of[i] {
                let node = match *slot {
                    Slot::Comment(j) => self.built[j].take().map(CommentNode::Comment),
                    Slot::More(k) => self.placeholders[k].take().map(CommentNode::More),
                };
                if let Some(node) = node {
                    children.push(node);
                }
            }

            comment.children = children;
            self.built[i] = Some(comment);
        }

        self.built[start].take().map(CommentNode::Comment)
    }
}

/// Narrows the forest to a single comment and its replies.
///
/// Searches depth first for a comment with the given fullname. When found
/// the forest becomes that comment alone, subtree intact; otherwise the
/// forest is returned unchanged.
///
/// # Arguments
///
/// * `forest`: Comment forest to search
/// * `fullname`: Fullname of the comment to focus, e.g. `t1_k9x2f0`
///
/// # Returns
///
/// Focused or unchanged forest
pub fn focus_comment(mut forest: Vec<CommentNode>, fullname: &str) -> Vec<CommentNode> {
    let Ok(target) = fullname.parse::<Fullname>() else {
        return forest;
    };
    let Some(path) = find_path(&forest, &target) else {
        return forest;
    };

    match take_at(&mut forest, &path) {
        Some(focused) => vec![focused],
        None => forest,
    }
}

/// Removes the node at `path`, descending through comment children.
fn take_at(level: &mut Vec<CommentNode>, path: &[usize]) -> Option<CommentNode> {
    let (&first, rest) = path.split_first()?;
    if first >= level.len() {
        return None;
    }
    if rest.is_empty() {
        return Some(level.remove(first));
    }
    match &mut level[first] {
        CommentNode::Comment(comment) => take_at(&mut comment.children, rest),
        CommentNode::More(_) => None,
    }
}

/// Returns child indices leading to the target comment, in pre-order.
fn find_path(forest: &[CommentNode], target: &Fullname) -> Option<Vec<usize>> {
    let mut stack: Vec<(Vec<usize>, &CommentNode)> = forest
        .iter()
        .enumerate()
        .rev()
        .map(|(i, node)| (vec![i], node))
        .collect();

    while let Some((path, node)) = stack.pop() {
        let CommentNode::Comment(comment) = node else {
            continue;
        };
        if &comment.fullname == target {
            return Some(path);
        }
        for (i, child) in comment.children.iter().enumerate().rev() {
            let mut child_path = path.clone();
            child_path.push(i);
            stack.push((child_path, child));
        }
    }

    None
}
