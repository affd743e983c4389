//! Post metadata components

use maud::{Markup, html};

use crate::post::Post;
use crate::route::{Route, is_safe_segment};

/// Route of a post's full thread page.
pub fn post_route(post: &Post) -> Route {
    Route::post(post.subreddit.as_str(), post.id.as_str())
}

/// Renders the byline under a post title
///
/// Shows subreddit with its icon, author and relative age. Deleted authors
/// are shown without a link.
///
/// # Arguments
///
/// * `post`: Normalized post
/// * `from`: Route of the page the byline is rendered on
///
/// # Returns
///
/// Byline markup
pub fn post_meta(post: &Post, from: &Route) -> Markup {
    html! {
        div class="post-meta" {
            @if let Some(icon) = &post.subreddit_icon {
                img class="subreddit-icon" src=(icon) alt="" loading="lazy";
            }
            @if is_safe_segment(&post.subreddit) {
                a href=(Route::subreddit(post.subreddit.as_str()).href_from(from)) class="post-subreddit" {
                    (post.subreddit_full)
                }
            } @else {
                span class="post-subreddit" { (post.subreddit_full) }
            }
            span class="meta-separator" { "·" }
            (author_link(&post.author, from))
            @if !post.created_rel.is_empty() {
                span class="meta-separator" { "·" }
                span class="post-age" { (post.created_rel) }
            }
            @if post.edited.is_some() {
                span class="post-edited" { "(edited)" }
            }
        }
    }
}

/// Renders author as a link to their listing page
///
/// Deleted accounts are plain text, as are names that cannot name a page.
pub fn author_link(author: &str, from: &Route) -> Markup {
    html! {
        @if author == "[deleted]" {
            span class="author author-deleted" { (author) }
        } @else if is_safe_segment(author) {
            a href=(Route::user(author).href_from(from)) class="author" { "u/" (author) }
        } @else {
            span class="author" { "u/" (author) }
        }
    }
}

/// Renders flair and status badges
pub fn post_flags(post: &Post) -> Markup {
    html! {
        @if let Some(flair) = &post.flair {
            span class="badge badge-flair" { (flair) }
        }
        @if post.nsfw {
            span class="badge badge-nsfw" { "NSFW" }
        }
        @if post.spoiler {
            span class="badge badge-spoiler" { "spoiler" }
        }
        @if post.stickied {
            span class="badge badge-pinned" { i class="ph ph-push-pin" {} " pinned" }
        }
        @if post.locked {
            span class="badge badge-locked" { i class="ph ph-lock" {} " locked" }
        }
        @if post.archived {
            span class="badge badge-archived" { "archived" }
        }
    }
}

/// Renders score and comment count
pub fn post_stats(post: &Post, from: &Route) -> Markup {
    html! {
        div class="post-stats" {
            span class="stat-score" title=(ratio_title(post.ratio)) {
                i class="ph ph-arrow-fat-up" {}
                " " (format_count(post.score))
            }
            a href=(post_route(post).href_from(from)) class="stat-comments" {
                i class="ph ph-chat-circle" {}
                " " (format_count(post.comments_count.map(|c| c as i64)))
            }
            @if let Some(awards) = post.awards.filter(|a| *a > 0) {
                span class="stat-awards" { i class="ph ph-medal" {} " " (awards) }
            }
        }
    }
}

/// Formats a count compactly: `999`, `1.2k`, `3.4m`.
///
/// Absent counts render as `•`, the way upstream hides fresh scores.
pub fn format_count(count: Option<i64>) -> String {
    match count {
        None => "•".to_string(),
        Some(n) if n.abs() >= 1_000_000 => format!("{:.1}m", n as f64 / 1_000_000.0),
        Some(n) if n.abs() >= 10_000 => format!("{}k", n / 1000),
        Some(n) if n.abs() >= 1000 => format!("{:.1}k", n as f64 / 1000.0),
        Some(n) => n.to_string(),
    }
}

fn ratio_title(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{:.0}% upvoted", r * 100.0),
        None => String::new(),
    }
}
