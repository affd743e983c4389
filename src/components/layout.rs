//! Page layout wrapper component

use maud::{DOCTYPE, Markup, html};

use crate::route::Route;

/// Wraps page content with standard HTML structure
///
/// Provides DOCTYPE, head, site header and footer for every page type.
/// The caller provides stylesheet paths relative to the page and the
/// page-specific body content. Header links are relative to `route`.
///
/// # Arguments
///
/// * `route`: Route of the page being wrapped
/// * `title`: Page title text (without suffix)
/// * `stylesheets`: CSS file paths to include
/// * `body`: Page-specific body markup
///
/// # Returns
///
/// Complete HTML document with wrapped content
pub fn page_wrapper(route: &Route, title: &str, stylesheets: &[&str], body: Markup) -> Markup {
    let front = Route::front().href_from(route);
    let all = Route::subreddit("all").href_from(route);

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="referrer" content="no-referrer";
                title { (title) " - Lurkview" }
                script src="https://unpkg.com/@phosphor-icons/web" {}
                @for stylesheet in stylesheets {
                    link rel="stylesheet" href=(stylesheet);
                }
            }
            body {
                header class="site-header" {
                    a href=(front) class="site-name" { "lurkview" }
                    nav class="site-links" {
                        a href=(front) { "popular" }
                        a href=(all) { "all" }
                    }
                }
                div class="container" {
                    (body)
                }
                footer class="site-footer" {
                    "Read-only mirror. Content belongs to its authors."
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_wrapper_includes_title_and_styles() {
        // Arrange
        let body = html! { p { "content" } };

        // Act
        let page = page_wrapper(
            &Route::front(),
            "r/rust",
            &["assets/listing.css", "assets/markdown.css"],
            body,
        )
        .into_string();

        // Assert
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>r/rust - Lurkview</title>"));
        assert!(page.contains(r#"href="assets/listing.css""#));
        assert!(page.contains(r#"href="assets/markdown.css""#));
        assert!(page.contains("<p>content</p>"));
    }

    #[test]
    fn test_page_wrapper_escapes_title() {
        let page = page_wrapper(&Route::front(), "<b>x</b>", &[], html! {}).into_string();

        assert!(page.contains("&lt;b&gt;x&lt;/b&gt; - Lurkview"));
    }

    #[test]
    fn test_header_links_are_relative_to_page() {
        // Arrange
        let route = Route::post("rust", "p3");

        // Act
        let page = page_wrapper(&route, "post", &[], html! {}).into_string();

        // Assert
        assert!(page.contains(r#"<a href="../../../../index.html" class="site-name">"#));
        assert!(page.contains(r#"<a href="../../../../r/all/index.html">all</a>"#));
    }
}
