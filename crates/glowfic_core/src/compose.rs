use std::collections::HashMap;

use html_escape::encode_double_quoted_attribute;

use crate::post::{Post, FALLBACK_ICON_FILENAME};

/// Markdown placed between two posts (a horizontal rule).
pub const POST_SEPARATOR: &str = "\n\n-----\n\n";
/// Rendered icon width in pixels.
pub const ICON_WIDTH: u32 = 50;

/// Builds the markdown for the whole thread.
///
/// `icon_files` maps an icon source URL to its stored file name under
/// `assets/`. Icons missing from the map point at [`FALLBACK_ICON_FILENAME`].
pub fn compose_markdown(posts: &[Post], icon_files: &HashMap<String, String>) -> String {
    posts
        .iter()
        .map(|post| compose_post(post, icon_files))
        .collect::<Vec<_>>()
        .join(POST_SEPARATOR)
}

fn compose_post(post: &Post, icon_files: &HashMap<String, String>) -> String {
    let mut out = String::new();
    if let Some(icon) = &post.icon {
        let filename = icon_files
            .get(&icon.source_url)
            .map(String::as_str)
            .unwrap_or(FALLBACK_ICON_FILENAME);
        let title = encode_double_quoted_attribute(icon.title.as_deref().unwrap_or(""));
        out.push_str(&format!(
            r#"<img title="{title}" alt="{title}" src="assets/{filename}" width="{ICON_WIDTH}"/> "#
        ));
    }
    if let Some(character) = &post.character {
        out.push_str(&format!("__[{character}]__"));
    }
    out.push_str("\n\n");
    out.push_str(&post.markdown_body());
    out
}
