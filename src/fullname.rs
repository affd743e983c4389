//! Typed upstream identifiers.
//!
//! Every thing upstream is named by a kind prefix and an opaque base36 id
//! joined by an underscore (`t1_k9x2f0`). Comments reference their parent
//! by fullname, so the tree builder needs to tell comment parents apart
//! from the link itself.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Kind prefix of a fullname.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    Comment,
    Account,
    Link,
    Message,
    Subreddit,
    Award,
    Other(String),
}

impl Kind {
    /// Returns the wire prefix for this kind.
    pub fn prefix(&self) -> &str {
        match self {
            Self::Comment => "t1",
            Self::Account => "t2",
            Self::Link => "t3",
            Self::Message => "t4",
            Self::Subreddit => "t5",
            Self::Award => "t6",
            Self::Other(prefix) => prefix,
        }
    }

    fn from_prefix(prefix: &str) -> Self {
        match prefix {
            "t1" => Self::Comment,
            "t2" => Self::Account,
            "t3" => Self::Link,
            "t4" => Self::Message,
            "t5" => Self::Subreddit,
            "t6" => Self::Award,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Compound identifier: kind prefix plus id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fullname {
    kind: Kind,
    id: String,
}

impl Fullname {
    /// Creates fullname from kind and bare id.
    pub fn new(kind: Kind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    /// Fullname of a link (post) with the given bare id.
    pub fn link(id: impl Into<String>) -> Self {
        Self::new(Kind::Link, id)
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_comment(&self) -> bool {
        self.kind == Kind::Comment
    }
}

impl FromStr for Fullname {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('_') {
            Some((prefix, id)) if !prefix.is_empty() && !id.is_empty() => {
                Ok(Self::new(Kind::from_prefix(prefix), id))
            }
            _ => Err(Error::Malformed(format!("invalid fullname `{s}`"))),
        }
    }
}

impl fmt::Display for Fullname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.kind.prefix(), self.id)
    }
}

impl Serialize for Fullname {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
