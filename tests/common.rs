//! Shared test utilities for integration tests.
//!
//! Provides an in-memory [`Upstream`] that answers from the JSON fixtures
//! under `tests/fixtures`, decoding them with the same parsers the HTTP
//! client uses.

#![allow(dead_code)]

use lurkview::client::{
    parse_listing, parse_more_children, parse_thread, parse_wiki_page, parse_wiki_pages,
};
use lurkview::{
    Error, Fullname, ListingQuery, ListingSource, RawListing, RawThread, Result, Upstream,
    WikiPage,
};
use serde_json::Value;
use std::cell::RefCell;

pub const LISTING_JSON: &str = include_str!("fixtures/listing.json");
pub const THREAD_JSON: &str = include_str!("fixtures/thread.json");
pub const MORECHILDREN_JSON: &str = include_str!("fixtures/morechildren.json");
pub const WIKI_JSON: &str = include_str!("fixtures/wiki.json");
pub const WIKI_HTML: &str = include_str!("fixtures/wiki.html");
pub const WIKI_PAGES_JSON: &str = include_str!("fixtures/wiki_pages.json");

/// Fixture-backed upstream serving `r/rust`, post `p3` and the rust wiki.
///
/// Anything else is reported as not found. `morechildren` calls are
/// recorded so tests can check batching. `post_fields` overrides fields of
/// the served post.
pub struct FixtureUpstream {
    pub wiki_as_html: bool,
    pub post_fields: Vec<(&'static str, Value)>,
    pub more_calls: RefCell<Vec<(String, Vec<String>)>>,
}

impl FixtureUpstream {
    pub fn new() -> Self {
        Self {
            wiki_as_html: false,
            post_fields: Vec::new(),
            more_calls: RefCell::new(Vec::new()),
        }
    }
}

fn json(text: &str) -> Value {
    serde_json::from_str(text).expect("Fixture should be valid JSON")
}

impl Upstream for FixtureUpstream {
    fn fetch_listing(&self, query: &ListingQuery) -> Result<RawListing> {
        match &query.source {
            ListingSource::Subreddit(name) if name == "rust" => parse_listing(&json(LISTING_JSON)),
            ListingSource::Front => parse_listing(&json(LISTING_JSON)),
            _ => Err(Error::NotFound(query.path())),
        }
    }

    fn fetch_post(&self, post_id: &str) -> Result<RawThread> {
        if post_id == "p3" {
            let mut thread = json(THREAD_JSON);
            if let Some(post) = thread.pointer_mut("/0/data/children/0/data") {
                for (key, value) in &self.post_fields {
                    post[*key] = value.clone();
                }
            }
            parse_thread(&thread)
        } else {
            Err(Error::NotFound(format!("/comments/{post_id}.json")))
        }
    }

    fn fetch_more_children(&self, link: &Fullname, children: &[String]) -> Result<Vec<Value>> {
        self.more_calls
            .borrow_mut()
            .push((link.to_string(), children.to_vec()));

        let things = parse_more_children(&json(MORECHILDREN_JSON));
        Ok(things
            .into_iter()
            .filter(|t| {
                t.pointer("/data/id")
                    .and_then(Value::as_str)
                    .is_some_and(|id| children.iter().any(|c| c == id))
            })
            .collect())
    }

    fn fetch_wiki_page(&self, subreddit: &str, page: &str) -> Result<WikiPage> {
        if subreddit != "rust" || page != "index" {
            return Err(Error::NotFound(format!("/r/{subreddit}/wiki/{page}")));
        }
        if self.wiki_as_html {
            parse_wiki_page(subreddit, page, "text/html; charset=UTF-8", WIKI_HTML)
        } else {
            parse_wiki_page(subreddit, page, "application/json; charset=UTF-8", WIKI_JSON)
        }
    }

    fn fetch_wiki_pages(&self, subreddit: &str) -> Result<Vec<String>> {
        if subreddit == "rust" {
            Ok(parse_wiki_pages(&json(WIKI_PAGES_JSON)))
        } else {
            Err(Error::NotFound(format!("/r/{subreddit}/wiki/pages")))
        }
    }
}
