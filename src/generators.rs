//! HTML page generators for upstream content.
//!
//! A generator loads records through [`Upstream`], enriches them, and
//! renders one page together with the [`Route`] it belongs at. Every route
//! is checked before rendering, since post routes are built from names
//! upstream sends back. Writing pages to disk is separate so generators can
//! be exercised without a filesystem.

use anyhow::{Context, Result};
use maud::Markup;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::client::{ListingQuery, ListingSource, Upstream};
use crate::comments::focus_comment;
use crate::config::Command;
use crate::listing::{ListingOptions, load_listing};
use crate::markdown::MarkdownRenderer;
use crate::pages;
use crate::post::{DEFAULT_BRIEF_LEN, PostNormalizer};
use crate::route::{PostView, Route};
use crate::thread::load_thread_with;

/// Rendered page and where it belongs in the output directory.
pub struct GeneratedPage {
    pub route: Route,
    pub markup: Markup,
}

/// Generates the page a command asks for.
///
/// # Arguments
///
/// * `upstream`: Client to fetch from
/// * `command`: Page to generate
/// * `options`: Listing options, also supplying the permalink root
///
/// # Returns
///
/// Rendered page with its route
///
/// # Errors
///
/// Returns the load error unchanged, so callers can tell a missing item
/// ([`crate::Error::is_not_found`]) from a failed request. Returns
/// [`crate::Error::Malformed`] when a name or id would not make a safe
/// output path.
pub fn generate_page<U>(
    upstream: &U,
    command: &Command,
    options: &ListingOptions,
) -> crate::Result<GeneratedPage>
where
    U: Upstream + ?Sized,
{
    let renderer = MarkdownRenderer::new();

    match command {
        Command::Listing { .. } => {
            let query = command
                .listing_query()
                .unwrap_or_else(|| ListingQuery::new(ListingSource::Front));
            generate_listing_page(upstream, &renderer, &query, options)
        }
        Command::Post { id, focus, .. } => {
            let normalizer = PostNormalizer::new(options.base_url.as_str(), DEFAULT_BRIEF_LEN);
            let wanted = command.wanted_comments();
            let mut post = load_thread_with(upstream, &normalizer, id, &wanted)?;

            let route = Route::post(post.subreddit.as_str(), post.id.as_str())
                .with_view(PostView::more(wanted).with_focus(focus.clone()));
            route.check()?;

            let focused = match focus {
                Some(fullname) => {
                    let forest = std::mem::take(&mut post.comments);
                    post.comments = focus_comment(forest, fullname);
                    matches!(
                        post.comments.as_slice(),
                        [node] if node.as_comment().is_some_and(|c| c.fullname.to_string() == *fullname)
                    )
                }
                None => false,
            };
            renderer.enrich_post(&mut post);

            let markup = pages::post::generate(pages::post::PostPageData {
                route: &route,
                post: &post,
                focused,
            });
            Ok(GeneratedPage { route, markup })
        }
        Command::Wiki { subreddit, page } => {
            let route = Route::Wiki {
                subreddit: subreddit.clone(),
                page: page.clone(),
            };
            route.check()?;

            let wiki = upstream.fetch_wiki_page(subreddit, page)?;
            let content_html = renderer.render(&wiki.content_md);
            let markup = pages::wiki::generate_page(&route, &wiki, &content_html);
            Ok(GeneratedPage { route, markup })
        }
        Command::WikiPages { subreddit } => {
            let route = Route::WikiIndex {
                subreddit: subreddit.clone(),
            };
            route.check()?;

            let names = upstream.fetch_wiki_pages(subreddit)?;
            let markup = pages::wiki::generate_index(&route, subreddit, &names);
            Ok(GeneratedPage { route, markup })
        }
    }
}

fn generate_listing_page<U>(
    upstream: &U,
    renderer: &MarkdownRenderer<'_>,
    query: &ListingQuery,
    options: &ListingOptions,
) -> crate::Result<GeneratedPage>
where
    U: Upstream + ?Sized,
{
    let route = match &query.source {
        ListingSource::Front => Route::front(),
        ListingSource::Subreddit(name) => Route::subreddit(name.as_str()),
        ListingSource::User(name) => Route::user(name.as_str()),
    };
    // `after` wins over `before`, as in the request
    let route = match &query.after {
        Some(after) => route.with_cursor(Some(after.clone()), None),
        None => route.with_cursor(None, query.before.clone()),
    };
    route.check()?;

    let mut listing = load_listing(upstream, query, options)?;
    renderer.enrich_listing(&mut listing);
    let markup = pages::listing::generate(pages::listing::ListingPageData {
        route: &route,
        listing: &listing,
    });

    Ok(GeneratedPage { route, markup })
}

/// Generates the not found page.
pub fn generate_not_found_page(what: &str) -> GeneratedPage {
    GeneratedPage {
        route: Route::NotFound,
        markup: pages::not_found::generate(what),
    }
}

/// Writes a generated page below the output directory.
///
/// # Arguments
///
/// * `output`: Output directory root
/// * `page`: Page to write
///
/// # Returns
///
/// Path of the written file
///
/// # Errors
///
/// Returns error if the route is not a safe output path, or if the page
/// directory cannot be created or the file cannot be written
pub fn write_page(output: &Path, page: &GeneratedPage) -> Result<PathBuf> {
    page.route
        .check()
        .context("Refusing to write page outside the output directory")?;

    let path = output.join(page.route.file_path());
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    fs::write(&path, page.markup.0.as_bytes())
        .with_context(|| format!("Failed to write page to {}", path.display()))?;

    info!(path = %path.display(), "page written");
    Ok(path)
}
