//! Error types shared by the fetch client, normalizer and loaders.

/// Result alias used throughout the library.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure classes for fetching and normalizing upstream content.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Upstream answered 404 for the requested resource.
    #[error("not found: {0}")]
    NotFound(String),

    /// Request did not complete within the client timeout.
    #[error("timed out: {0}")]
    Timeout(String),

    /// Connection, TLS or protocol failure.
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream answered with a non-success status other than 404.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// A required field is missing or has the wrong type.
    #[error("malformed input: {0}")]
    Malformed(String),

    /// Response body is not valid JSON.
    #[error("decode: {0}")]
    Decode(#[from] serde_json::Error),
}

impl Error {
    /// Returns true for failures that should be shown as a "not found" page.
    ///
    /// Malformed payloads are treated like missing ones: a half-built record
    /// is never shown.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Malformed(_))
    }

    pub(crate) fn missing(field: &str) -> Self {
        Self::Malformed(format!("missing required field `{field}`"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        // Arrange
        let not_found = Error::NotFound("t3_abc".to_string());
        let malformed = Error::missing("id");
        let status = Error::Status {
            status: 503,
            url: "https://www.reddit.com/r/rust.json".to_string(),
        };

        // Act & Assert
        assert!(not_found.is_not_found());
        assert!(malformed.is_not_found());
        assert!(!status.is_not_found());
    }

    #[test]
    fn test_missing_field_message() {
        // Arrange & Act
        let err = Error::missing("permalink");

        // Assert
        assert_eq!(
            err.to_string(),
            "malformed input: missing required field `permalink`"
        );
    }
}
