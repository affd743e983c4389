//! Breadcrumb and pagination components

use maud::{Markup, html};

use crate::route::Route;

/// Renders breadcrumb navigation
///
/// The first component links to the front page. Components with a link
/// target are rendered as links, the last one usually as plain text.
///
/// # Arguments
///
/// * `from`: Route of the page the breadcrumb is rendered on
/// * `components`: Labels with optional target routes (None for current)
///
/// # Returns
///
/// Breadcrumb navigation markup
pub fn breadcrumb(from: &Route, components: &[(&str, Option<Route>)]) -> Markup {
    html! {
        nav class="breadcrumb" {
            a href=(Route::front().href_from(from)) class="breadcrumb-link" { "front" }
            @for (label, target) in components {
                span class="breadcrumb-separator" { "/" }
                @if let Some(target) = target {
                    a href=(target.href_from(from)) class="breadcrumb-link" { (*label) }
                } @else {
                    span class="breadcrumb-current" { (*label) }
                }
            }
        }
    }
}

/// Renders previous/next links for a listing page
///
/// Links point at the `before-`/`after-` pages of the same listing.
/// Nothing is rendered when neither cursor is present.
pub fn pagination(route: &Route, before: Option<&str>, after: Option<&str>) -> Markup {
    html! {
        @if before.is_some() || after.is_some() {
            nav class="pagination" {
                @if let Some(cursor) = before {
                    a href=(route.with_cursor(None, Some(cursor.to_string())).href_from(route)) class="page-link" {
                        i class="ph ph-caret-left" {}
                        " prev"
                    }
                }
                @if let Some(cursor) = after {
                    a href=(route.with_cursor(Some(cursor.to_string()), None).href_from(route)) class="page-link" {
                        "next "
                        i class="ph ph-caret-right" {}
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breadcrumb_links_and_current() {
        // Arrange
        let from = Route::WikiIndex {
            subreddit: "rust".to_string(),
        };
        let components = [("r/rust", Some(Route::subreddit("rust"))), ("wiki", None)];

        // Act
        let html = breadcrumb(&from, &components).into_string();

        // Assert
        assert!(html.contains(r#"<a href="../../../index.html" class="breadcrumb-link">front</a>"#));
        assert!(html.contains(
            r#"<a href="../../../r/rust/index.html" class="breadcrumb-link">r/rust</a>"#
        ));
        assert!(html.contains(r#"<span class="breadcrumb-current">wiki</span>"#));
    }

    #[test]
    fn test_pagination_next_only() {
        let html = pagination(&Route::subreddit("rust"), None, Some("t3_abc")).into_string();

        assert!(html.contains(r#"href="../../r/rust/after-t3_abc.html""#));
        assert!(!html.contains("before-"));
    }

    #[test]
    fn test_pagination_from_later_page() {
        // Arrange
        let route = Route::subreddit("rust").with_cursor(Some("t3_abc".to_string()), None);

        // Act
        let html = pagination(&route, Some("t3_first"), Some("t3_next")).into_string();

        // Assert
        assert!(html.contains(r#"href="../../r/rust/before-t3_first.html""#));
        assert!(html.contains(r#"href="../../r/rust/after-t3_next.html""#));
    }

    #[test]
    fn test_pagination_empty_without_cursors() {
        assert_eq!(pagination(&Route::front(), None, None).into_string(), "");
    }
}
