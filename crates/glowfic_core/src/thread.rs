use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static POST_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/posts/(\d+)").expect("post id pattern"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThreadUrlError {
    #[error("no glowfic URL given")]
    Missing,
    #[error("not a glowfic post URL: {0}")]
    Malformed(String),
}

/// Numeric identifier of a glowfic thread, as found in `.../posts/<id>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThreadId(pub u64);

impl ThreadId {
    pub fn from_url(input: &str) -> Result<Self, ThreadUrlError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ThreadUrlError::Missing);
        }
        POST_ID
            .captures(input)
            .and_then(|caps| caps.get(1))
            .and_then(|id| id.as_str().parse::<u64>().ok())
            .map(ThreadId)
            .ok_or_else(|| ThreadUrlError::Malformed(input.to_string()))
    }

    /// URL of the single-page ("flat") rendering of the whole thread.
    pub fn flat_url(&self, base_url: &str) -> String {
        format!("{}/posts/{}?view=flat", base_url.trim_end_matches('/'), self.0)
    }

    /// Name of the content document inside the archive.
    pub fn content_filename(&self) -> String {
        format!("glowfic_{}.html", self.0)
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_flat_urls() {
        assert_eq!(
            ThreadId::from_url("https://glowfic.com/posts/5111"),
            Ok(ThreadId(5111))
        );
        assert_eq!(
            ThreadId::from_url("  https://glowfic.com/posts/42?view=flat&page=2 "),
            Ok(ThreadId(42))
        );
    }

    #[test]
    fn rejects_missing_and_malformed() {
        assert_eq!(ThreadId::from_url("   "), Err(ThreadUrlError::Missing));
        assert!(matches!(
            ThreadId::from_url("https://glowfic.com/boards/12"),
            Err(ThreadUrlError::Malformed(_))
        ));
        assert!(matches!(
            ThreadId::from_url("https://glowfic.com/posts/99999999999999999999999"),
            Err(ThreadUrlError::Malformed(_))
        ));
    }

    #[test]
    fn flat_url_ignores_trailing_slash() {
        let id = ThreadId(7);
        assert_eq!(id.flat_url("https://glowfic.com/"), "https://glowfic.com/posts/7?view=flat");
        assert_eq!(id.content_filename(), "glowfic_7.html");
    }
}
