//! Output locations of generated pages.
//!
//! Pages are laid out the way the upstream site routes them, so a page
//! generated for `r/rust` lands at `r/rust/index.html`. Links between pages
//! are relative file paths built from routes, so they resolve both from a
//! static server and straight from disk.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// A generated page and the upstream location it mirrors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Front page listing.
    Front {
        after: Option<String>,
        before: Option<String>,
    },
    Subreddit {
        name: String,
        after: Option<String>,
        before: Option<String>,
    },
    User {
        name: String,
        after: Option<String>,
        before: Option<String>,
    },
    Post {
        subreddit: String,
        id: String,
        view: PostView,
    },
    Wiki {
        subreddit: String,
        page: String,
    },
    WikiIndex {
        subreddit: String,
    },
    NotFound,
}

/// Variant of a post page: the full thread, one focused subtree, or the
/// thread with some placeholders expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostView {
    pub focus: Option<String>,
    /// Expanded comment ids, sorted and deduplicated.
    pub more: Vec<String>,
}

impl PostView {
    /// Full thread view.
    pub fn full() -> Self {
        Self::default()
    }

    /// View narrowed to one comment.
    pub fn focus(fullname: impl Into<String>) -> Self {
        Self {
            focus: Some(fullname.into()),
            more: Vec::new(),
        }
    }

    /// View expanding the given comment ids.
    pub fn more<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let more: BTreeSet<String> = ids.into_iter().map(Into::into).collect();
        Self {
            focus: None,
            more: more.into_iter().collect(),
        }
    }

    /// Adds a focus to this view.
    pub fn with_focus(mut self, focus: Option<String>) -> Self {
        self.focus = focus;
        self
    }

    /// File name of the view inside the post directory.
    ///
    /// Expanded views are keyed by their smallest id and the id count. A
    /// comment id belongs to exactly one placeholder, so the key is unique
    /// for every "load more" link without growing with the id list.
    fn file_name(&self) -> String {
        let mut parts = Vec::new();
        if let Some(fullname) = &self.focus {
            parts.push(format!("focus-{fullname}"));
        }
        if let Some(first) = self.more.first() {
            parts.push(format!("more-{first}-{}", self.more.len()));
        }

        if parts.is_empty() {
            "index.html".to_string()
        } else {
            format!("{}.html", parts.join("."))
        }
    }
}

impl Route {
    /// Listing route for the front page.
    pub fn front() -> Self {
        Route::Front {
            after: None,
            before: None,
        }
    }

    /// Listing route for a subreddit's first page.
    pub fn subreddit(name: impl Into<String>) -> Self {
        Route::Subreddit {
            name: name.into(),
            after: None,
            before: None,
        }
    }

    /// Listing route for a user's first page.
    pub fn user(name: impl Into<String>) -> Self {
        Route::User {
            name: name.into(),
            after: None,
            before: None,
        }
    }

    /// Full thread route of a post.
    pub fn post(subreddit: impl Into<String>, id: impl Into<String>) -> Self {
        Route::Post {
            subreddit: subreddit.into(),
            id: id.into(),
            view: PostView::full(),
        }
    }

    /// Same post with a different view.
    ///
    /// Routes other than posts are returned unchanged.
    pub fn with_view(&self, view: PostView) -> Self {
        match self {
            Route::Post { subreddit, id, .. } => Route::Post {
                subreddit: subreddit.clone(),
                id: id.clone(),
                view,
            },
            other => other.clone(),
        }
    }

    /// View of a post route.
    pub fn view(&self) -> Option<&PostView> {
        match self {
            Route::Post { view, .. } => Some(view),
            _ => None,
        }
    }

    /// Same listing positioned at a cursor.
    ///
    /// Routes other than listings are returned unchanged.
    pub fn with_cursor(&self, after: Option<String>, before: Option<String>) -> Self {
        match self {
            Route::Front { .. } => Route::Front { after, before },
            Route::Subreddit { name, .. } => Route::Subreddit {
                name: name.clone(),
                after,
                before,
            },
            Route::User { name, .. } => Route::User {
                name: name.clone(),
                after,
                before,
            },
            other => other.clone(),
        }
    }

    /// Returns page path relative to the output directory.
    ///
    /// Listing pages after the first are written next to the first page as
    /// `after-<cursor>.html` or `before-<cursor>.html`. Post views other
    /// than the full thread sit next to its `index.html`.
    pub fn file_path(&self) -> PathBuf {
        let mut path = PathBuf::new();
        let file = match self {
            Route::Front { after, before } => listing_file(after, before),
            Route::Subreddit {
                name,
                after,
                before,
            } => {
                path.extend(["r", name.as_str()]);
                listing_file(after, before)
            }
            Route::User {
                name,
                after,
                before,
            } => {
                path.extend(["u", name.as_str()]);
                listing_file(after, before)
            }
            Route::Post {
                subreddit,
                id,
                view,
            } => {
                path.extend(["r", subreddit.as_str(), "comments", id.as_str()]);
                view.file_name()
            }
            Route::Wiki { subreddit, page } => {
                path.extend(["r", subreddit.as_str(), "wiki"]);
                // nested wiki pages such as `config/sidebar`
                let mut segments: Vec<&str> = page.split('/').filter(|s| !s.is_empty()).collect();
                let last = segments.pop().unwrap_or("index");
                path.extend(segments);
                format!("{last}.html")
            }
            Route::WikiIndex { subreddit } => {
                path.extend(["r", subreddit.as_str(), "wiki"]);
                "pages.html".to_string()
            }
            Route::NotFound => "404.html".to_string(),
        };
        path.push(file);
        path
    }

    /// Checks every value that ends up in the file path.
    ///
    /// Names, ids, cursors and wiki page segments may only contain ASCII
    /// letters, digits, `_` and `-`, so a page can never be written outside
    /// the output directory whatever upstream sends back.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] naming the first offending value
    pub fn check(&self) -> Result<()> {
        let mut values: Vec<(&str, &str)> = Vec::new();
        match self {
            Route::Front { after, before } => push_cursors(&mut values, after, before),
            Route::Subreddit {
                name,
                after,
                before,
            } => {
                values.push(("subreddit", name.as_str()));
                push_cursors(&mut values, after, before);
            }
            Route::User {
                name,
                after,
                before,
            } => {
                values.push(("user", name.as_str()));
                push_cursors(&mut values, after, before);
            }
            Route::Post {
                subreddit,
                id,
                view,
            } => {
                values.push(("subreddit", subreddit.as_str()));
                values.push(("post id", id.as_str()));
                if let Some(fullname) = &view.focus {
                    values.push(("focus", fullname.as_str()));
                }
                values.extend(view.more.iter().map(|id| ("comment id", id.as_str())));
            }
            Route::Wiki { subreddit, page } => {
                values.push(("subreddit", subreddit.as_str()));
                values.extend(page.split('/').map(|segment| ("wiki page", segment)));
            }
            Route::WikiIndex { subreddit } => values.push(("subreddit", subreddit.as_str())),
            Route::NotFound => {}
        }

        match values.into_iter().find(|(_, value)| !is_safe_segment(value)) {
            Some((what, value)) => Err(Error::Malformed(format!("invalid {what}: {value:?}"))),
            None => Ok(()),
        }
    }

    /// Number of directories between the page and the output root.
    pub fn depth(&self) -> usize {
        self.file_path().components().count().saturating_sub(1)
    }

    /// Relative prefix leading from the page back to the output root.
    pub fn root_prefix(&self) -> String {
        "../".repeat(self.depth())
    }

    /// Relative path from the page to a bundled stylesheet.
    pub fn asset(&self, name: &str) -> String {
        format!("{}assets/{}", self.root_prefix(), name)
    }

    /// Relative link from the page at `from` to this page.
    pub fn href_from(&self, from: &Route) -> String {
        let target: Vec<String> = self
            .file_path()
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        format!("{}{}", from.root_prefix(), target.join("/"))
    }
}

/// Whether a value is usable as a single path segment.
pub fn is_safe_segment(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn push_cursors<'a>(
    values: &mut Vec<(&'static str, &'a str)>,
    after: &'a Option<String>,
    before: &'a Option<String>,
) {
    if let Some(cursor) = after {
        values.push(("cursor", cursor.as_str()));
    }
    if let Some(cursor) = before {
        values.push(("cursor", cursor.as_str()));
    }
}

fn listing_file(after: &Option<String>, before: &Option<String>) -> String {
    match (after, before) {
        (Some(cursor), _) => format!("after-{cursor}.html"),
        (None, Some(cursor)) => format!("before-{cursor}.html"),
        (None, None) => "index.html".to_string(),
    }
}
