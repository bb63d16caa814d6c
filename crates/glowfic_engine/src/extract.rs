use chrono::{DateTime, NaiveDate, NaiveDateTime};
use glowfic_core::{character_label, extract_paragraphs, Icon, Post};
use scraper::{ElementRef, Html, Selector};

const TITLE_SUFFIX: &str = " | Glowfic Constellation";

/// Formats seen in the "last updated" detail line, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%b %d, %Y %I:%M %p",
    "%b %e, %Y %l:%M %p",
    "%B %d, %Y %I:%M %p",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M",
];
const DATE_FORMATS: &[&str] = &["%b %d, %Y", "%B %d, %Y", "%Y-%m-%d", "%m/%d/%Y"];

/// Everything read from the flat view of a thread.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ThreadDocument {
    pub title: Option<String>,
    pub author: Option<String>,
    pub last_updated: Option<NaiveDateTime>,
    pub posts: Vec<Post>,
}

pub trait Extractor: Send + Sync {
    fn extract(&self, html: &str) -> ThreadDocument;
}

/// Reads glowfic's flat thread layout:
/// - `<title>` without the site suffix
/// - the first `.post-author`
/// - the date after the last `": "` of `.details + .details`
/// - one [`Post`] per `.post-container`, in document order.
///
/// Missing elements leave the matching field empty; nothing here fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlowficExtractor;

impl Extractor for GlowficExtractor {
    fn extract(&self, html: &str) -> ThreadDocument {
        let doc = Html::parse_document(html);
        let root = doc.root_element();

        let title = first_text(root, "title")
            .map(|t| t.replace(TITLE_SUFFIX, "").trim().to_string())
            .filter(|t| !t.is_empty());
        let author = first_text(root, ".post-author").filter(|a| !a.is_empty());
        let last_updated = first_text(root, ".details + .details")
            .and_then(|details| details.rsplit(": ").next().map(str::to_string))
            .and_then(|raw| parse_last_updated(&raw));

        let posts = match Selector::parse(".post-container") {
            Ok(sel) => root.select(&sel).map(extract_post).collect(),
            Err(_) => Vec::new(),
        };

        ThreadDocument {
            title,
            author,
            last_updated,
            posts,
        }
    }
}

fn extract_post(container: ElementRef) -> Post {
    let character = first_text(container, ".post-character");
    let screen_name = first_text(container, ".post-screenname");
    let icon = first(container, ".post-icon > .icon").and_then(|img| {
        let src = img.value().attr("src")?.trim();
        if src.is_empty() {
            return None;
        }
        Some(Icon {
            source_url: src.to_string(),
            title: img.value().attr("title").map(str::to_string),
        })
    });
    let body = first(container, ".post-content")
        .map(|content| extract_paragraphs(&content.inner_html()))
        .unwrap_or_default();

    Post {
        character: character_label(character.as_deref(), screen_name.as_deref()),
        icon,
        body,
    }
}

fn first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let sel = Selector::parse(css).ok()?;
    scope.select(&sel).next()
}

fn first_text(scope: ElementRef, css: &str) -> Option<String> {
    first(scope, css).map(|el| el.text().collect::<String>().trim().to_string())
}

/// Best effort; an unknown format yields `None`.
pub fn parse_last_updated(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
