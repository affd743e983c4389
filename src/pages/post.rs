//! Post page generation

use maud::{Markup, html};

use crate::components::comment::comment_tree;
use crate::components::layout::page_wrapper;
use crate::components::nav::breadcrumb;
use crate::components::post_card::{CardMode, post_card};
use crate::post::Post;
use crate::route::Route;

/// Data container for post page generation
pub struct PostPageData<'a> {
    pub route: &'a Route,
    pub post: &'a Post,
    /// Set when the comment forest was narrowed to one comment.
    pub focused: bool,
}

/// Generates a post page with its comment tree
///
/// The "View all comments" link of a focused page leads to the same view
/// without the focus.
///
/// # Arguments
///
/// * `data`: Route, enriched post with comments, focus state
///
/// # Returns
///
/// Complete HTML page as Markup
pub fn generate(data: PostPageData<'_>) -> Markup {
    let post = data.post;
    let route = data.route;
    let title = post.title.as_deref().unwrap_or(&post.id);
    let unfocused = route.view().cloned().unwrap_or_default().with_focus(None);
    let all_comments = route.with_view(unfocused).href_from(route);
    let post_css = data.route.asset("post.css");
    let markdown_css = data.route.asset("markdown.css");

    page_wrapper(
        route,
        title,
        &[post_css.as_str(), markdown_css.as_str()],
        html! {
            (breadcrumb(route, &[
                (post.subreddit_full.as_str(), Some(Route::subreddit(post.subreddit.as_str()))),
                ("comments", None),
            ]))

            main.post-page {
                (post_card(post, CardMode::Full, route))

                section.comments {
                    h3.comments-heading {
                        i.ph.ph-chat-circle {}
                        " Comments"
                    }
                    @if data.focused {
                        div.focus-notice {
                            "Single comment thread. "
                            a href=(all_comments) { "View all comments" }
                        }
                    }
                    (comment_tree(&post.comments, route))
                }
            }
        },
    )
}
