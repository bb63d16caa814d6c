#![allow(dead_code)]

use std::sync::Once;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

/// Panics unless `doc` reads as well-formed XML from start to end.
pub fn assert_well_formed_xml(doc: &str) {
    let mut reader = quick_xml::Reader::from_str(doc);
    loop {
        match reader.read_event() {
            Ok(quick_xml::events::Event::Eof) => break,
            Ok(_) => {}
            Err(err) => panic!("not well-formed at {}: {err}", reader.buffer_position()),
        }
    }
}

pub struct PostFixture<'a> {
    pub character: Option<&'a str>,
    pub screen_name: Option<&'a str>,
    /// `(src, title)`
    pub icon: Option<(&'a str, &'a str)>,
    pub content: &'a str,
}

/// A flat-view thread page shaped like the real site's markup.
pub fn thread_page(title: &str, author: &str, updated: &str, posts: &[PostFixture]) -> String {
    let mut html = format!(
        "<!DOCTYPE html><html><head><title>{title} | Glowfic Constellation</title></head><body>\
         <div class=\"post-header\"><div class=\"details\">Created: Jan 01, 2020 1:00 PM</div>\
         <div class=\"details\">Last updated: {updated}</div></div>"
    );
    for post in posts {
        html.push_str("<div class=\"post-container\"><div class=\"post-info-box\">");
        if let Some((src, icon_title)) = post.icon {
            html.push_str(&format!(
                "<div class=\"post-icon\"><img class=\"icon\" src=\"{src}\" title=\"{icon_title}\" alt=\"{icon_title}\"></div>"
            ));
        }
        if let Some(character) = post.character {
            html.push_str(&format!("<div class=\"post-character\"><a href=\"/characters/1\">{character}</a></div>"));
        }
        if let Some(screen) = post.screen_name {
            html.push_str(&format!("<div class=\"post-screenname\">{screen}</div>"));
        }
        html.push_str(&format!(
            "<div class=\"post-author\"><a href=\"/users/1\">{author}</a></div></div>\
             <div class=\"post-content\">{}</div></div>",
            post.content
        ));
    }
    html.push_str("</body></html>");
    html
}
