//! Upstream API access.
//!
//! [`Upstream`] is the seam between the core and the network: loaders and
//! the comment tree builder only see this trait, and tests substitute an
//! in-memory implementation. [`HttpClient`] is the blocking reqwest
//! implementation used by the binary.

use regex::Regex;
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde_json::Value;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

use crate::error::{Error, Result};
use crate::fullname::Fullname;
use crate::util::{opt_f64, opt_i64, opt_str};

/// User agent sent with every request.
pub const USER_AGENT: &str = "linux:lurkview:v0.1.0";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Subreddit shown when no source is given.
pub const FRONT_PAGE_SUBREDDIT: &str = "popular";

/// Wiki body embedded in an HTML page.
static WIKI_BODY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<div[^>]*class="md wiki"[^>]*>(.*?)</div>"#)
        .expect("wiki body regex should compile")
});

/// Where a listing comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingSource {
    /// The default front page.
    Front,
    Subreddit(String),
    /// Submissions of one user.
    User(String),
}

/// Listing request with pagination cursors.
///
/// `after` wins when both cursors are set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub source: ListingSource,
    pub after: Option<String>,
    pub before: Option<String>,
}

impl ListingQuery {
    pub fn new(source: ListingSource) -> Self {
        Self {
            source,
            after: None,
            before: None,
        }
    }

    pub fn after(mut self, after: Option<String>) -> Self {
        self.after = after;
        self
    }

    pub fn before(mut self, before: Option<String>) -> Self {
        self.before = before;
        self
    }

    /// Path of the listing endpoint relative to the upstream root.
    pub fn path(&self) -> String {
        match &self.source {
            ListingSource::Front => format!("/r/{FRONT_PAGE_SUBREDDIT}.json"),
            ListingSource::Subreddit(name) => format!("/r/{name}.json"),
            ListingSource::User(name) => format!("/user/{name}/submitted.json"),
        }
    }
}

/// Unnormalized listing page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawListing {
    /// `data` objects of the listed posts.
    pub posts: Vec<Value>,
    pub after: Option<String>,
    pub before: Option<String>,
}

/// Unnormalized post with its top level comment things.
#[derive(Debug, Clone, PartialEq)]
pub struct RawThread {
    pub post: Value,
    pub comments: Vec<Value>,
}

/// Wiki page content and revision metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WikiPage {
    pub subreddit: String,
    pub page: String,
    pub content_md: String,
    pub revision_id: Option<String>,
    pub revision_date: Option<i64>,
    pub revision_by: Option<String>,
}

/// Read-only operations the core needs from upstream.
///
/// Every operation maps an upstream 404 to [`Error::NotFound`].
pub trait Upstream {
    /// Fetches one page of posts.
    fn fetch_listing(&self, query: &ListingQuery) -> Result<RawListing>;

    /// Fetches a post and its comment listing.
    fn fetch_post(&self, post_id: &str) -> Result<RawThread>;

    /// Fetches up to 100 child comments of `link` by bare id.
    fn fetch_more_children(&self, link: &Fullname, children: &[String]) -> Result<Vec<Value>>;

    fn fetch_wiki_page(&self, subreddit: &str, page: &str) -> Result<WikiPage>;

    /// Lists the wiki page names of a subreddit.
    fn fetch_wiki_pages(&self, subreddit: &str) -> Result<Vec<String>>;
}

/// Blocking HTTP implementation of [`Upstream`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: Client,
    base_url: String,
}

impl HttpClient {
    /// Creates client for the given upstream root.
    ///
    /// # Errors
    ///
    /// Returns error if the TLS backend cannot be initialized
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Response> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .map_err(|e| classify(e, &url))?;
        check_status(response, &url)
    }

    fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        let body = self.get(path, query)?.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl Upstream for HttpClient {
    fn fetch_listing(&self, query: &ListingQuery) -> Result<RawListing> {
        let mut params = vec![("sr_detail", "1")];
        match (&query.after, &query.before) {
            (Some(after), _) => params.push(("after", after.as_str())),
            (None, Some(before)) => params.push(("before", before.as_str())),
            (None, None) => {}
        }

        let json = self.get_json(&query.path(), &params)?;
        parse_listing(&json)
    }

    fn fetch_post(&self, post_id: &str) -> Result<RawThread> {
        let json = self.get_json(
            &format!("/comments/{post_id}.json"),
            &[
                ("limit", "500"),
                ("depth", "10"),
                ("raw_json", "1"),
                ("sr_detail", "1"),
            ],
        )?;
        parse_thread(&json)
    }

    fn fetch_more_children(&self, link: &Fullname, children: &[String]) -> Result<Vec<Value>> {
        if children.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.url("/api/morechildren.json");
        let link_id = link.to_string();
        let joined = children.join(",");
        debug!(%url, %link, count = children.len(), "POST");

        let response = self
            .http
            .post(&url)
            .form(&[
                ("link_id", link_id.as_str()),
                ("children", joined.as_str()),
                ("api_type", "json"),
                ("raw_json", "1"),
            ])
            .send()
            .map_err(|e| classify(e, &url))?;
        let body = check_status(response, &url)?.text()?;
        let json: Value = serde_json::from_str(&body)?;

        Ok(parse_more_children(&json))
    }

    fn fetch_wiki_page(&self, subreddit: &str, page: &str) -> Result<WikiPage> {
        let response = self.get(&format!("/r/{subreddit}/wiki/{page}"), &[("raw_json", "1")])?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let body = response.text()?;

        parse_wiki_page(subreddit, page, &content_type, &body)
    }

    fn fetch_wiki_pages(&self, subreddit: &str) -> Result<Vec<String>> {
        let json = self.get_json(&format!("/r/{subreddit}/wiki/pages"), &[("raw_json", "1")])?;
        Ok(parse_wiki_pages(&json))
    }
}

fn classify(err: reqwest::Error, url: &str) -> Error {
    if err.is_timeout() {
        Error::Timeout(url.to_string())
    } else {
        Error::Transport(err)
    }
}

fn check_status(response: Response, url: &str) -> Result<Response> {
    match response.status() {
        StatusCode::NOT_FOUND => Err(Error::NotFound(url.to_string())),
        status if !status.is_success() => Err(Error::Status {
            status: status.as_u16(),
            url: url.to_string(),
        }),
        _ => Ok(response),
    }
}

/// Reads `data.children[].data`, `after` and `before` from a listing.
///
/// # Errors
///
/// Returns [`Error::Malformed`] when the body is not a listing
pub fn parse_listing(json: &Value) -> Result<RawListing> {
    let data = json
        .get("data")
        .filter(|d| d.is_object())
        .ok_or_else(|| Error::missing("data"))?;

    let posts = data
        .get("children")
        .and_then(Value::as_array)
        .map(|children| {
            children
                .iter()
                .filter_map(|child| child.get("data"))
                .filter(|d| d.is_object())
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    Ok(RawListing {
        posts,
        after: opt_str(data, "after"),
        before: opt_str(data, "before"),
    })
}

/// Splits the two-listing comments response into post and comments.
///
/// # Errors
///
/// Returns [`Error::Malformed`] when the post listing is missing
pub fn parse_thread(json: &Value) -> Result<RawThread> {
    let post = json
        .get(0)
        .and_then(|l| l.pointer("/data/children/0/data"))
        .filter(|d| d.is_object())
        .cloned()
        .ok_or_else(|| Error::Malformed("response has no post listing".to_string()))?;

    let comments = json
        .get(1)
        .and_then(|l| l.pointer("/data/children"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    Ok(RawThread { post, comments })
}

/// Reads `json.data.things`, dropping anything that is not an object.
pub fn parse_more_children(json: &Value) -> Vec<Value> {
    json.pointer("/json/data/things")
        .and_then(Value::as_array)
        .map(|things| things.iter().filter(|t| t.is_object()).cloned().collect())
        .unwrap_or_default()
}

/// Normalizes a wiki reply to [`WikiPage`].
///
/// JSON replies carry content and revision metadata under `data`. HTML
/// replies only yield the rendered wiki body; revision fields stay empty.
///
/// # Errors
///
/// Returns [`Error::NotFound`] when a JSON reply cannot be decoded
pub fn parse_wiki_page(
    subreddit: &str,
    page: &str,
    content_type: &str,
    body: &str,
) -> Result<WikiPage> {
    let mut wiki = WikiPage {
        subreddit: subreddit.to_string(),
        page: page.to_string(),
        ..WikiPage::default()
    };

    if !content_type.contains("application/json") {
        wiki.content_md = WIKI_BODY_RE
            .captures(body)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        return Ok(wiki);
    }

    let not_found = || Error::NotFound(format!("/r/{subreddit}/wiki/{page}"));
    let json: Value = serde_json::from_str(body).map_err(|_| not_found())?;
    let data = json
        .get("data")
        .filter(|d| d.is_object())
        .ok_or_else(not_found)?;

    wiki.content_md = opt_str(data, "content_md").unwrap_or_default();
    wiki.revision_id = opt_str(data, "revision_id");
    wiki.revision_date = opt_i64(data, "revision_date")
        .or_else(|| opt_f64(data, "revision_date").map(|f| f as i64));
    wiki.revision_by = data
        .pointer("/revision_by/data/name")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(wiki)
}

/// Reads page names from a wiki page listing.
///
/// Accepts `data` as the name array itself or as an object wrapping it.
pub fn parse_wiki_pages(json: &Value) -> Vec<String> {
    let data = json.get("data");
    let names = data
        .and_then(Value::as_array)
        .or_else(|| data.and_then(|d| d.get("data")).and_then(Value::as_array));

    names
        .map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
