//! Comment tree component

use maud::{Markup, PreEscaped, html};

use super::metadata::{author_link, format_count};
use crate::comments::{Comment, CommentNode, Placeholder};
use crate::route::{PostView, Route};

/// Nesting rendered inline before replies move behind a focus link.
pub const MAX_RENDER_DEPTH: usize = 24;

/// Renders a comment forest
///
/// Comments show their enriched body. Placeholders become "load more"
/// links to the post view that expands their child ids on top of the ids
/// `page` already expands. Each comment links to the view focused on it.
///
/// # Arguments
///
/// * `nodes`: Root nodes of the forest
/// * `page`: Route of the post page the tree is rendered on
///
/// # Returns
///
/// Comment list markup
pub fn comment_tree(nodes: &[CommentNode], page: &Route) -> Markup {
    html! {
        @if nodes.is_empty() {
            p class="empty-state" { "No comments yet" }
        } @else {
            div class="comment-tree" {
                (comment_level(nodes, page, 0))
            }
        }
    }
}

fn comment_level(nodes: &[CommentNode], page: &Route, depth: usize) -> Markup {
    html! {
        @for node in nodes {
            @match node {
                CommentNode::Comment(comment) => {
                    (comment_item(comment, page, depth))
                }
                CommentNode::More(more) => {
                    (load_more(more, page))
                }
            }
        }
    }
}

fn comment_item(comment: &Comment, page: &Route, depth: usize) -> Markup {
    let focus = focus_route(page, &comment.fullname.to_string());
    let focus_href = focus.check().is_ok().then(|| focus.href_from(page));

    html! {
        div class="comment" id=(comment.fullname.to_string()) {
            div class="comment-meta" {
                @match &comment.author {
                    Some(author) => {
                        (author_link(author, page))
                    }
                    None => {
                        span class="author author-deleted" { "[deleted]" }
                    }
                }
                span class="comment-score" { (format_count(comment.score)) " points" }
                @if !comment.created_rel.is_empty() {
                    span class="comment-age" { (comment.created_rel) }
                }
                @if let Some(href) = &focus_href {
                    a href=(href) class="comment-permalink" { "link" }
                }
            }
            div class="comment-body markdown-body" {
                @match &comment.body_html {
                    Some(html) => {
                        (PreEscaped(html))
                    }
                    None => {
                        p { (comment.body) }
                    }
                }
            }
            @if !comment.children.is_empty() {
                div class="comment-children" {
                    @if depth + 1 < MAX_RENDER_DEPTH {
                        (comment_level(&comment.children, page, depth + 1))
                    } @else if let Some(href) = &focus_href {
                        a href=(href) class="load-more" { "continue this thread" }
                    }
                }
            }
        }
    }
}

fn load_more(more: &Placeholder, page: &Route) -> Markup {
    let count = more.children.len();
    let target = more_route(page, &more.children);
    html! {
        @if count > 0 && target.check().is_ok() {
            a href=(target.href_from(page)) class="load-more" {
                "load " (count) @if count == 1 { " more reply" } @else { " more replies" }
            }
        }
    }
}

/// Post view narrowed to one comment, keeping the ids `page` expands.
pub fn focus_route(page: &Route, fullname: &str) -> Route {
    let view = page.view().cloned().unwrap_or_default();
    page.with_view(view.with_focus(Some(fullname.to_string())))
}

/// Post view expanding `ids` on top of the ids `page` expands.
pub fn more_route(page: &Route, ids: &[String]) -> Route {
    let current = page.view().cloned().unwrap_or_default();
    let view = PostView::more(current.more.iter().chain(ids).cloned()).with_focus(current.focus);
    page.with_view(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fullname::Fullname;

    fn comment(id: &str, children: Vec<CommentNode>) -> CommentNode {
        CommentNode::Comment(Comment {
            id: id.to_string(),
            fullname: Fullname::new(crate::fullname::Kind::Comment, id),
            parent: None,
            author: Some("ferris".to_string()),
            author_fullname: None,
            body: format!("body {id}"),
            body_html: Some(format!("<p>body {id}</p>")),
            score: Some(3),
            created_utc: None,
            created_rel: "2h ago".to_string(),
            children,
        })
    }

    fn page() -> Route {
        Route::post("rust", "p")
    }

    fn more(ids: &[&str]) -> CommentNode {
        CommentNode::More(Placeholder {
            parent: None,
            children: ids.iter().map(|s| s.to_string()).collect(),
        })
    }

    #[test]
    fn test_comment_tree_nests_replies() {
        // Arrange
        let forest = vec![comment("a", vec![comment("b", vec![])]), comment("c", vec![])];

        // Act
        let html = comment_tree(&forest, &page()).into_string();

        // Assert
        let a = html.find(r#"id="t1_a""#).expect("a rendered");
        let b = html.find(r#"id="t1_b""#).expect("b rendered");
        let c = html.find(r#"id="t1_c""#).expect("c rendered");
        assert!(a < b && b < c);
        assert!(html.contains("<p>body b</p>"));
        assert!(html.contains(r#"href="../../../../r/rust/comments/p/focus-t1_a.html""#));
    }

    #[test]
    fn test_placeholder_renders_load_more_link() {
        // Arrange
        let forest = vec![comment("a", vec![more(&["x", "y"])]), more(&["z"])];

        // Act
        let html = comment_tree(&forest, &page()).into_string();

        // Assert
        assert!(html.contains(r#"href="../../../../r/rust/comments/p/more-x-2.html""#));
        assert!(html.contains(r#"href="../../../../r/rust/comments/p/more-z-1.html""#));
        assert!(html.contains("load 2 more replies"));
        assert!(html.contains("load 1 more reply"));
    }

    #[test]
    fn test_deleted_author_and_raw_body_fallback() {
        // Arrange
        let mut node = comment("a", vec![]);
        if let CommentNode::Comment(c) = &mut node {
            c.author = None;
            c.body_html = None;
            c.body = "<i>raw</i>".to_string();
        }

        // Act
        let html = comment_tree(&[node], &page()).into_string();

        // Assert
        assert!(html.contains("[deleted]"));
        assert!(html.contains("&lt;i&gt;raw&lt;/i&gt;"));
    }

    #[test]
    fn test_deep_thread_continues_behind_focus_link() {
        // Arrange
        let mut node = comment(&format!("n{}", MAX_RENDER_DEPTH + 5), vec![]);
        for i in (0..MAX_RENDER_DEPTH + 5).rev() {
            node = comment(&format!("n{i}"), vec![node]);
        }

        // Act
        let html = comment_tree(&[node], &page()).into_string();

        // Assert
        let last_inline = MAX_RENDER_DEPTH - 1;
        assert!(html.contains(&format!(r#"id="t1_n{last_inline}""#)));
        assert!(!html.contains(&format!(r#"id="t1_n{}""#, MAX_RENDER_DEPTH)));
        assert!(html.contains(&format!(
            r#"href="../../../../r/rust/comments/p/focus-t1_n{last_inline}.html" class="load-more""#
        )));
    }

    #[test]
    fn test_empty_tree() {
        let html = comment_tree(&[], &page()).into_string();

        assert!(html.contains("No comments yet"));
    }

    #[test]
    fn test_links_keep_current_view() {
        // Arrange
        let page = page().with_view(PostView::more(["m1"]).with_focus(Some("t1_a".to_string())));
        let forest = vec![comment("a", vec![more(&["x"])])];

        // Act
        let html = comment_tree(&forest, &page).into_string();

        // Assert
        assert!(html.contains(r#"comments/p/focus-t1_a.more-m1-2.html""#), "{}", html);
        assert!(html.contains(r#"comments/p/focus-t1_a.more-m1-1.html" class="comment-permalink""#));
    }

    #[test]
    fn test_unusable_ids_are_not_linked() {
        let forest = vec![more(&["../x"])];

        let html = comment_tree(&forest, &page()).into_string();

        assert!(!html.contains("load-more"));
    }
}
