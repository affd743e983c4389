//! Listing page generation

use maud::{Markup, html};

use crate::components::layout::page_wrapper;
use crate::components::nav::{breadcrumb, pagination};
use crate::components::post_card::{CardMode, post_card};
use crate::listing::Listing;
use crate::route::Route;

/// Data container for listing page generation
pub struct ListingPageData<'a> {
    pub route: &'a Route,
    pub listing: &'a Listing,
}

/// Generates a front page, subreddit or user listing page
///
/// Shows one card per post in upstream order followed by pagination
/// links built from the listing cursors.
///
/// # Arguments
///
/// * `data`: Route of the page and the enriched listing
///
/// # Returns
///
/// Complete HTML page as Markup
pub fn generate(data: ListingPageData<'_>) -> Markup {
    let route = data.route;
    let heading = match route {
        Route::Subreddit { name, .. } => format!("r/{name}"),
        Route::User { name, .. } => format!("u/{name}"),
        _ => "r/popular".to_string(),
    };
    let listing_css = data.route.asset("listing.css");
    let markdown_css = data.route.asset("markdown.css");

    page_wrapper(
        route,
        &heading,
        &[listing_css.as_str(), markdown_css.as_str()],
        html! {
            (breadcrumb(route, &[(heading.as_str(), None)]))

            main.listing {
                @if data.listing.posts.is_empty() {
                    div.empty-state {
                        p { "No posts here." }
                    }
                } @else {
                    @for post in &data.listing.posts {
                        (post_card(post, CardMode::Summary, route))
                    }
                }
            }

            (pagination(
                route,
                data.listing.before.as_deref(),
                data.listing.after.as_deref()
            ))
        },
    )
}
