//! Not found page generation

use maud::{Markup, html};

use crate::components::layout::page_wrapper;
use crate::route::Route;

/// Generates the page shown when upstream has nothing at a location
///
/// # Arguments
///
/// * `what`: Human readable description of the missing item
pub fn generate(what: &str) -> Markup {
    let route = Route::NotFound;
    let listing_css = route.asset("listing.css");
    let front = Route::front().href_from(&route);

    page_wrapper(
        &route,
        "Not found",
        &[listing_css.as_str()],
        html! {
            main.not-found {
                h1.page-title { "404" }
                p { "Nothing here: " (what) }
                p { a href=(front) { "Back to the front page" } }
            }
        },
    )
}
