//! Glowfic core: pure content transformations with no IO.
mod compose;
mod normalize;
mod post;
mod repair;
mod thread;

pub use compose::{compose_markdown, ICON_WIDTH, POST_SEPARATOR};
pub use normalize::{escape_list_markers, extract_paragraphs, normalize_paragraph, underline_spans};
pub use post::{character_label, unique_icon_urls, Icon, Post, FALLBACK_ICON_FILENAME};
pub use repair::{repair_markup, tokenize, TagKind, TagToken};
pub use thread::{ThreadId, ThreadUrlError};
