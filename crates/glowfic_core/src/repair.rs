//! Repair of interleaved inline tags.
//!
//! The markdown renderer wraps every paragraph in `<p>` on its own, so an
//! `<em>` opened in one forum paragraph and closed in a later one comes out
//! as `<p><em>a</p><p>b</em></p>`. The input is too irregular for a strict
//! parser; instead the tags are scanned as a flat token stream and balanced
//! with an explicit stack of open elements:
//!
//! * a start tag is pushed;
//! * a void element written HTML-style (`<br>`) is rewritten as `<br/>`;
//! * an end tag matching nothing on the stack is deleted;
//! * an end tag matching the top pops it;
//! * an end tag matching a deeper entry closes everything above that entry,
//!   emits the end tag, then reopens the closed entries in their original
//!   order;
//! * whatever is still open at the end is closed in stack order.
//!
//! Rewrites are collected as edits on the original string and applied from
//! the back so earlier positions stay valid. The result nests properly with
//! respect to the tags it tracks; whether it *looks* right is not checked.

use std::sync::LazyLock;

use engine_logging::engine_debug;
use regex::Regex;

static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9]*)(?:\s[^<>]*?)?(/?)>").expect("tag pattern")
});

/// Elements that never take an end tag, written with or without `/>`.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Start,
    End,
    SelfClosing,
}

/// One start or end tag occurrence in a flat HTML string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagToken {
    pub position: usize,
    pub length: usize,
    /// Lowercase tag name.
    pub name: String,
    pub kind: TagKind,
}

impl TagToken {
    fn text<'a>(&self, html: &'a str) -> &'a str {
        &html[self.position..self.position + self.length]
    }
}

struct Edit {
    position: usize,
    length: usize,
    replacement: String,
}

/// Scans `html` left to right for start and end tags.
pub fn tokenize(html: &str) -> Vec<TagToken> {
    TAG.captures_iter(html)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(2)?.as_str().to_ascii_lowercase();
            let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
            let slash_end = caps.get(3).is_some_and(|m| !m.as_str().is_empty());
            let kind = if closing {
                TagKind::End
            } else if slash_end || VOID_ELEMENTS.contains(&name.as_str()) {
                TagKind::SelfClosing
            } else {
                TagKind::Start
            };
            Some(TagToken {
                position: whole.start(),
                length: whole.len(),
                name,
                kind,
            })
        })
        .collect()
}

/// Rewrites `html` so that every tracked start tag has exactly one matching,
/// properly nested end tag and every void element is self-closed. Balanced
/// XHTML comes back unchanged.
pub fn repair_markup(html: &str) -> String {
    let tokens = tokenize(html);
    let mut open: Vec<&TagToken> = Vec::new();
    let mut edits = Vec::new();

    for token in &tokens {
        match token.kind {
            TagKind::SelfClosing => {
                if !token.text(html).ends_with("/>") {
                    edits.push(Edit {
                        position: token.position + token.length - 1,
                        length: 1,
                        replacement: "/>".to_string(),
                    });
                }
            }
            TagKind::Start => open.push(token),
            TagKind::End => match open.iter().rposition(|tag| tag.name == token.name) {
                None => {
                    engine_debug!("dropping stray </{}> at {}", token.name, token.position);
                    edits.push(Edit {
                        position: token.position,
                        length: token.length,
                        replacement: String::new(),
                    });
                }
                Some(index) if index + 1 == open.len() => {
                    open.pop();
                }
                Some(index) => {
                    let above = open.split_off(index + 1);
                    open.pop();

                    let mut replacement = String::new();
                    for tag in above.iter().rev() {
                        replacement.push_str(&format!("</{}>", tag.name));
                    }
                    replacement.push_str(token.text(html));
                    for tag in &above {
                        replacement.push_str(tag.text(html));
                    }
                    edits.push(Edit {
                        position: token.position,
                        length: token.length,
                        replacement,
                    });

                    open.extend(above);
                }
            },
        }
    }

    if !open.is_empty() {
        let closing: String = open
            .iter()
            .rev()
            .map(|tag| format!("</{}>", tag.name))
            .collect();
        edits.push(Edit {
            position: html.len(),
            length: 0,
            replacement: closing,
        });
    }

    let mut repaired = html.to_string();
    for edit in edits.iter().rev() {
        repaired.replace_range(edit.position..edit.position + edit.length, &edit.replacement);
    }
    repaired
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Every start tag has exactly one end tag and they nest.
    fn is_well_nested(html: &str) -> bool {
        let mut open = Vec::new();
        for token in tokenize(html) {
            match token.kind {
                TagKind::SelfClosing => {}
                TagKind::Start => open.push(token.name),
                TagKind::End => {
                    if open.pop().as_deref() != Some(token.name.as_str()) {
                        return false;
                    }
                }
            }
        }
        open.is_empty()
    }

    #[test]
    fn tokenizer_classifies_tags() {
        let tokens = tokenize(r#"<P class="x">a<br><img src="i.png"/></p><hr />"#);
        let kinds: Vec<_> = tokens.iter().map(|t| (t.name.as_str(), t.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("p", TagKind::Start),
                ("br", TagKind::SelfClosing),
                ("img", TagKind::SelfClosing),
                ("p", TagKind::End),
                ("hr", TagKind::SelfClosing),
            ]
        );
        assert_eq!(tokens[0].position, 0);
        assert_eq!(tokens[0].length, r#"<P class="x">"#.len());
    }

    #[test]
    fn balanced_input_is_unchanged() {
        let html = r#"<p>a <em>b <strong>c</strong></em><br/> d<img src="x"/></p>
<hr />
<p><a href="https://example.com">link</a></p>"#;
        assert_eq!(repair_markup(html), html);
    }

    #[test]
    fn interleaved_tags_are_closed_and_reopened() {
        let repaired = repair_markup("<b>A<i>B</b>C</i>");
        assert_eq!(repaired, "<b>A<i>B</i></b><i>C</i>");
        assert!(is_well_nested(&repaired));
    }

    #[test]
    fn stray_end_tag_is_deleted_and_leftovers_closed() {
        assert_eq!(repair_markup("<b>A</i>"), "<b>A</b>");
        assert_eq!(repair_markup("x</em>y"), "xy");
    }

    #[test]
    fn unclosed_tags_are_closed_in_stack_order() {
        assert_eq!(repair_markup("<b><i>x"), "<b><i>x</i></b>");
    }

    #[test]
    fn reopening_keeps_original_order_and_attributes() {
        let repaired = repair_markup(r#"<s><b><span class="c">x</s>y</b></span>"#);
        assert_eq!(
            repaired,
            r#"<s><b><span class="c">x</span></b></s><b><span class="c">y</span></b><span class="c"></span>"#
        );
        assert!(is_well_nested(&repaired));
    }

    #[test]
    fn emphasis_across_rendered_paragraphs() {
        let repaired = repair_markup("<p><em>A</p>\n<p>B</em></p>");
        assert_eq!(repaired, "<p><em>A</em></p><em>\n<p>B</p></em><p></p>");
        assert!(is_well_nested(&repaired));
    }

    #[test]
    fn void_elements_are_self_closed() {
        assert_eq!(
            repair_markup(r#"<p>one<br>two<BR >three<img src="a.png" alt="a"></p>"#),
            r#"<p>one<br/>two<BR />three<img src="a.png" alt="a"/></p>"#
        );
        assert_eq!(repair_markup("<hr /><br/>"), "<hr /><br/>");
    }

    #[test]
    fn void_rewrite_combines_with_reopening() {
        let repaired = repair_markup("<p><em>a<br></p>\n<p>b</em></p>");
        assert_eq!(repaired, "<p><em>a<br/></em></p><em>\n<p>b</p></em><p></p>");
        assert!(is_well_nested(&repaired));
    }

    #[test]
    fn end_tag_matches_nearest_open_entry() {
        let repaired = repair_markup("<i>a<b><i>b</i>c</b></i>");
        assert_eq!(repaired, "<i>a<b><i>b</i>c</b></i>");
    }
}
