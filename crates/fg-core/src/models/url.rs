use serde::{Serialize, Serializer};
use std::fmt;

/// Outcome of URL resolution for one call site.
///
/// Every variant serializes to its plain string so artifacts stay flat, while
/// consumers in Rust can still branch on whether resolution succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolvedUrl {
    /// Starts with `http://` or `https://`
    Absolute(String),
    /// A path with no base URL available to compose with
    Relative(String),
    /// An identifier whose declaration could not be found; the name is kept
    Placeholder(String),
}

impl ResolvedUrl {
    pub fn as_str(&self) -> &str {
        match self {
            ResolvedUrl::Absolute(s) | ResolvedUrl::Relative(s) | ResolvedUrl::Placeholder(s) => s,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, ResolvedUrl::Placeholder(_))
    }

    /// Classifies an already-expanded URL string
    pub fn classify(url: String) -> Self {
        if has_scheme(&url) {
            ResolvedUrl::Absolute(url)
        } else {
            ResolvedUrl::Relative(url)
        }
    }
}

/// `^https?://`
pub fn has_scheme(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

impl fmt::Display for ResolvedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ResolvedUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_detects_scheme() {
        assert_eq!(
            ResolvedUrl::classify("https://api.example.com/x".into()),
            ResolvedUrl::Absolute("https://api.example.com/x".into())
        );
        assert_eq!(
            ResolvedUrl::classify("/x".into()),
            ResolvedUrl::Relative("/x".into())
        );
    }

    #[test]
    fn placeholder_serializes_as_plain_string() {
        let url = ResolvedUrl::Placeholder("endpoint".into());
        assert!(!url.is_resolved());
        assert_eq!(serde_json::to_string(&url).unwrap(), "\"endpoint\"");
    }
}
