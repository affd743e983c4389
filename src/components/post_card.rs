//! Post card component

use maud::{Markup, PreEscaped, html};

use super::metadata::{post_flags, post_meta, post_route, post_stats};
use crate::post::Post;
use crate::route::Route;

/// How much of a post a card shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardMode {
    /// Listing entry: brief excerpt, title links to the post page.
    Summary,
    /// Post page header: full selftext and media.
    Full,
}

/// Renders a post as a card
///
/// Rendered HTML fields come from enrichment and are embedded unescaped;
/// everything else is escaped by maud. Link posts show their target URL
/// and domain. Image posts embed the image; video posts embed the mp4
/// fallback.
///
/// # Arguments
///
/// * `post`: Enriched post
/// * `mode`: Summary for listings, Full for the post page
/// * `from`: Route of the page the card is rendered on
///
/// # Returns
///
/// Card markup
pub fn post_card(post: &Post, mode: CardMode, from: &Route) -> Markup {
    let title = post.title.as_deref().unwrap_or("(untitled)");
    let body_html = match mode {
        CardMode::Summary => post.brief_html.as_deref(),
        CardMode::Full => post.selftext_html.as_deref(),
    };

    html! {
        article class="post-card" id=(post.fullname.to_string()) {
            (post_meta(post, from))
            h2 class="post-title" {
                @match mode {
                    CardMode::Summary => {
                        a href=(post_route(post).href_from(from)) { (title) }
                    }
                    CardMode::Full => {
                        (title)
                    }
                }
                " "
                (post_flags(post))
            }

            @if !post.is_self {
                a href=(post.url) class="post-link" rel="nofollow noopener" {
                    i class="ph ph-link" {}
                    " " (post.domain)
                }
            }

            @if let Some(mp4) = &post.video_mp4 {
                video class="post-video" controls preload="metadata" src=(mp4) {}
            } @else if let Some(image) = &post.image {
                @if !post.nsfw || mode == CardMode::Full {
                    img class="post-image" src=(image) alt=(title) loading="lazy";
                }
            }

            @if let Some(html) = body_html.filter(|h| !h.is_empty()) {
                div class="post-body markdown-body" { (PreEscaped(html)) }
            }

            (post_stats(post, from))
        }
    }
}
