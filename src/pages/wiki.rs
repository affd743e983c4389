//! Wiki page and wiki index generation

use maud::{Markup, PreEscaped, html};

use crate::client::WikiPage;
use crate::components::layout::page_wrapper;
use crate::components::metadata::author_link;
use crate::components::nav::breadcrumb;
use crate::route::Route;
use crate::util::format_relative_time;

/// Generates a wiki page
///
/// # Arguments
///
/// * `route`: Route of the page
/// * `wiki`: Wiki content and revision metadata
/// * `content_html`: Sanitized HTML rendered from `wiki.content_md`
///
/// # Returns
///
/// Complete HTML page as Markup
pub fn generate_page(route: &Route, wiki: &WikiPage, content_html: &str) -> Markup {
    let subreddit_full = format!("r/{}", wiki.subreddit);
    let wiki_css = route.asset("wiki.css");
    let markdown_css = route.asset("markdown.css");
    let revised = format_relative_time(wiki.revision_date.map(|d| d as f64));

    let wiki_index = Route::WikiIndex {
        subreddit: wiki.subreddit.clone(),
    };

    page_wrapper(
        route,
        &format!("{}: {}", subreddit_full, wiki.page),
        &[wiki_css.as_str(), markdown_css.as_str()],
        html! {
            (breadcrumb(route, &[
                (subreddit_full.as_str(), Some(Route::subreddit(wiki.subreddit.as_str()))),
                ("wiki", Some(wiki_index)),
                (wiki.page.as_str(), None),
            ]))

            main.wiki-page {
                @if content_html.is_empty() {
                    div.empty-state {
                        p { "This wiki page is empty." }
                    }
                } @else {
                    article.markdown-body {
                        (PreEscaped(content_html))
                    }
                }

                @if !revised.is_empty() || wiki.revision_by.is_some() {
                    div.wiki-revision {
                        i.ph.ph-clock-counter-clockwise {}
                        " revised"
                        @if !revised.is_empty() {
                            " " (revised)
                        }
                        @if let Some(by) = &wiki.revision_by {
                            " by " (author_link(by, route))
                        }
                    }
                }
            }
        },
    )
}

/// Generates the index of a subreddit's wiki pages
///
/// Page names that cannot name an output file are listed without a link.
///
/// # Arguments
///
/// * `route`: Route of the page
/// * `subreddit`: Subreddit name
/// * `pages`: Wiki page names in upstream order
///
/// # Returns
///
/// Complete HTML page as Markup
pub fn generate_index(route: &Route, subreddit: &str, pages: &[String]) -> Markup {
    let subreddit_full = format!("r/{subreddit}");
    let wiki_css = route.asset("wiki.css");

    page_wrapper(
        route,
        &format!("{subreddit_full}: wiki"),
        &[wiki_css.as_str()],
        html! {
            (breadcrumb(route, &[
                (subreddit_full.as_str(), Some(Route::subreddit(subreddit))),
                ("wiki", None),
            ]))

            main.wiki-index {
                h1.page-title {
                    i.ph.ph-book-open {}
                    " Wiki pages"
                }
                @if pages.is_empty() {
                    div.empty-state {
                        p { "This subreddit has no wiki pages." }
                    }
                } @else {
                    ul.wiki-pages {
                        @for page in pages {
                            @let target = Route::Wiki {
                                subreddit: subreddit.to_string(),
                                page: page.clone(),
                            };
                            li {
                                @if target.check().is_ok() {
                                    a href=(target.href_from(route)) { (page) }
                                } @else {
                                    (page)
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}
