use std::collections::HashSet;

/// Stored name substituted for icons whose download failed.
pub const FALLBACK_ICON_FILENAME: &str = "missing_icon.svg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    pub source_url: String,
    pub title: Option<String>,
}

/// One entry of a thread. `body` holds normalized paragraphs in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Post {
    pub character: Option<String>,
    pub icon: Option<Icon>,
    pub body: Vec<String>,
}

impl Post {
    /// Markdown body: paragraphs separated by a blank line.
    pub fn markdown_body(&self) -> String {
        self.body.join("\n\n")
    }
}

/// Builds the display label from a character name and a screen name.
///
/// Both parts are trimmed first; blank parts count as missing. The separator
/// is only used when both are present, and a label with nothing left in it
/// is `None` rather than an empty string.
pub fn character_label(character: Option<&str>, screen_name: Option<&str>) -> Option<String> {
    let character = character.map(str::trim).filter(|s| !s.is_empty());
    let screen_name = screen_name.map(str::trim).filter(|s| !s.is_empty());
    match (character, screen_name) {
        (Some(name), Some(screen)) => Some(format!("{name} - {screen}")),
        (Some(only), None) | (None, Some(only)) => Some(only.to_string()),
        (None, None) => None,
    }
}

/// Distinct icon URLs across all posts, in first-seen order.
pub fn unique_icon_urls(posts: &[Post]) -> Vec<String> {
    let mut seen = HashSet::new();
    posts
        .iter()
        .filter_map(|post| post.icon.as_ref())
        .filter(|icon| seen.insert(icon.source_url.as_str()))
        .map(|icon| icon.source_url.clone())
        .collect()
}
