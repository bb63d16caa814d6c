use std::sync::LazyLock;

use regex::Regex;

static PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<p(?:\s[^>]*)?>(.*?)</p>").expect("paragraph pattern"));
static UNDERLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<span style="text-decoration: underline;">(.+?)</span>"#)
        .expect("underline pattern")
});
static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^([ \t]*)- ").expect("list marker pattern"));

/// Contents of every `<p>` span in `inner_html`, normalized, in order.
/// Markup outside paragraphs and blank paragraphs are dropped.
pub fn extract_paragraphs(inner_html: &str) -> Vec<String> {
    PARAGRAPH
        .captures_iter(inner_html)
        .filter_map(|caps| caps.get(1))
        .filter(|m| !m.as_str().trim().is_empty())
        .map(|m| normalize_paragraph(m.as_str()))
        .collect()
}

pub fn normalize_paragraph(paragraph: &str) -> String {
    escape_list_markers(&underline_spans(paragraph))
}

/// `<span style="text-decoration: underline;">X</span>` becomes `<u>X</u>`.
pub fn underline_spans(text: &str) -> String {
    UNDERLINE.replace_all(text, "<u>${1}</u>").into_owned()
}

/// Forum posts use `- ` as a dash, not a list; keep markdown from agreeing.
pub fn escape_list_markers(text: &str) -> String {
    LIST_MARKER.replace_all(text, r"${1}\- ").into_owned()
}
