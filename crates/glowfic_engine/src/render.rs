use glowfic_core::repair_markup;
use html_escape::encode_text;
use pulldown_cmark::{html, Options, Parser};

const STYLESHEET: &str = "body { font-size: .75rem; }";

pub trait MarkdownRenderer: Send + Sync {
    fn to_html(&self, markdown: &str) -> String;
}

/// CommonMark via `pulldown-cmark`; inline HTML passes through untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct PulldownRenderer;

impl MarkdownRenderer for PulldownRenderer {
    fn to_html(&self, markdown: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        let parser = Parser::new_ext(markdown, options);
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}

/// Renders the thread markdown, repairs tag nesting, and wraps the result
/// in an XHTML document.
pub fn render_content_document(
    title: &str,
    markdown: &str,
    renderer: &dyn MarkdownRenderer,
) -> String {
    let body = repair_markup(&renderer.to_html(markdown));
    let title = encode_text(title);
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
         <!DOCTYPE html>\n\
         <html xmlns=\"http://www.w3.org/1999/xhtml\">\n\
         <head>\n\
         <meta http-equiv=\"Content-Type\" content=\"text/html; charset=utf-8\"/>\n\
         <title>{title}</title>\n\
         <style>{STYLESHEET}</style>\n\
         </head>\n\
         <body>\n{body}</body>\n\
         </html>\n"
    )
}
