//! Command line configuration.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::client::{ListingQuery, ListingSource};
use crate::listing::ListingOptions;
use crate::post::UPSTREAM_BASE_URL;
use crate::route::is_safe_segment;

/// Command line configuration for Lurkview.
#[derive(Debug, Clone, Parser)]
#[command(name = "lurkview", version, about, long_about = None)]
pub struct Config {
    #[command(subcommand)]
    pub command: Command,

    /// Output directory
    #[arg(short, long, default_value = "dist", global = true)]
    pub output: PathBuf,

    /// Upstream API root
    #[arg(long, default_value = UPSTREAM_BASE_URL, global = true)]
    pub base_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10, global = true)]
    pub timeout: u64,

    /// Leave NSFW posts out of listings
    #[arg(long, global = true)]
    pub hide_nsfw: bool,

    /// Do not open the generated page in a browser
    #[arg(long, global = true)]
    pub no_open: bool,
}

/// Page to generate.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Front page, subreddit or user listing
    Listing {
        /// Subreddit name, without `r/`
        #[arg(short = 'r', long, conflicts_with = "user")]
        subreddit: Option<String>,

        /// User name, without `u/`
        #[arg(short, long)]
        user: Option<String>,

        /// Cursor of the page to continue after
        #[arg(long, conflicts_with = "before")]
        after: Option<String>,

        /// Cursor of the page to go back from
        #[arg(long)]
        before: Option<String>,
    },

    /// Post with its comments
    Post {
        /// Post id, e.g. `1abcde`
        id: String,

        /// Comma separated comment ids to load
        #[arg(long, value_delimiter = ',')]
        more: Vec<String>,

        /// Comment fullname to focus, e.g. `t1_k9x2f0`
        #[arg(long)]
        focus: Option<String>,
    },

    /// Subreddit wiki page
    Wiki {
        subreddit: String,

        #[arg(default_value = "index")]
        page: String,
    },

    /// Index of a subreddit's wiki pages
    WikiPages { subreddit: String },
}

impl Config {
    /// Parses configuration from command line arguments.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Validates configuration.
    ///
    /// Names and ids end up in output paths, so they are restricted to
    /// characters upstream itself allows.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Base URL is not http(s)
    /// - Timeout is zero
    /// - A subreddit, user, post id, cursor, comment id or wiki page name
    ///   has invalid characters
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            bail!("Base URL must start with http:// or https://: {}", self.base_url);
        }
        if self.timeout == 0 {
            bail!("Timeout must be at least one second");
        }

        match &self.command {
            Command::Listing {
                subreddit,
                user,
                after,
                before,
            } => {
                let named = [
                    ("subreddit", subreddit),
                    ("user", user),
                    ("cursor", after),
                    ("cursor", before),
                ];
                for (what, value) in named {
                    if let Some(value) = value {
                        check_name(what, value)?;
                    }
                }
            }
            Command::Post { id, focus, .. } => {
                check_name("post id", id)?;
                if let Some(fullname) = focus {
                    check_name("focus", fullname)?;
                }
                for id in self.command.wanted_comments() {
                    check_name("comment id", &id)?;
                }
            }
            Command::Wiki { subreddit, page } => {
                check_name("subreddit", subreddit)?;
                for segment in page.split('/') {
                    check_name("wiki page", segment)?;
                }
            }
            Command::WikiPages { subreddit } => check_name("subreddit", subreddit)?,
        }

        Ok(())
    }

    /// Returns request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Returns listing options derived from flags.
    pub fn listing_options(&self) -> ListingOptions {
        ListingOptions {
            hide_nsfw: self.hide_nsfw,
            base_url: self.base_url.clone(),
        }
    }
}

impl Command {
    /// Returns listing query for the `listing` command.
    pub fn listing_query(&self) -> Option<ListingQuery> {
        let Command::Listing {
            subreddit,
            user,
            after,
            before,
        } = self
        else {
            return None;
        };

        let source = match (subreddit, user) {
            (Some(name), _) => ListingSource::Subreddit(name.clone()),
            (None, Some(name)) => ListingSource::User(name.clone()),
            (None, None) => ListingSource::Front,
        };
        Some(
            ListingQuery::new(source)
                .after(after.clone())
                .before(before.clone()),
        )
    }

    /// Returns requested comment ids for the `post` command.
    pub fn wanted_comments(&self) -> HashSet<String> {
        match self {
            Command::Post { more, .. } => more
                .iter()
                .map(|id| id.trim())
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect(),
            _ => HashSet::new(),
        }
    }
}

fn check_name(what: &str, value: &str) -> Result<()> {
    if !is_safe_segment(value) {
        bail!("Invalid {}: {:?}", what, value);
    }
    Ok(())
}
