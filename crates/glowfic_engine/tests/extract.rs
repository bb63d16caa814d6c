mod common;

use chrono::NaiveDate;
use common::{init_logging, thread_page, PostFixture};
use glowfic_engine::{Extractor, GlowficExtractor};
use pretty_assertions::assert_eq;

#[test]
fn extracts_page_metadata() {
    init_logging();
    let html = thread_page(
        "Tea & Sympathy",
        "alicorn",
        "Mar 08, 2023 10:14 PM",
        &[PostFixture {
            character: None,
            screen_name: None,
            icon: None,
            content: "<p>hi</p>",
        }],
    );

    let thread = GlowficExtractor.extract(&html);
    assert_eq!(thread.title.as_deref(), Some("Tea & Sympathy"));
    assert_eq!(thread.author.as_deref(), Some("alicorn"));
    assert_eq!(
        thread.last_updated,
        NaiveDate::from_ymd_opt(2023, 3, 8).and_then(|d| d.and_hms_opt(22, 14, 0))
    );
}

#[test]
fn one_post_per_container_in_order() {
    let html = thread_page(
        "T",
        "a",
        "whenever",
        &[
            PostFixture {
                character: Some("Bell"),
                screen_name: Some("ringing"),
                icon: Some(("https://img.test/bell.png", "happy")),
                content: "<p>one</p><p>two</p>",
            },
            PostFixture {
                character: Some("Carissa"),
                screen_name: None,
                icon: None,
                content: "<p>three</p>",
            },
            PostFixture {
                character: None,
                screen_name: None,
                icon: None,
                content: "",
            },
        ],
    );

    let thread = GlowficExtractor.extract(&html);
    assert_eq!(thread.last_updated, None);
    assert_eq!(thread.posts.len(), 3);

    let first = &thread.posts[0];
    assert_eq!(first.character.as_deref(), Some("Bell - ringing"));
    let icon = first.icon.as_ref().expect("icon");
    assert_eq!(icon.source_url, "https://img.test/bell.png");
    assert_eq!(icon.title.as_deref(), Some("happy"));
    assert_eq!(first.body, vec!["one", "two"]);

    assert_eq!(thread.posts[1].character.as_deref(), Some("Carissa"));
    assert_eq!(thread.posts[1].icon, None);
    assert_eq!(thread.posts[1].body, vec!["three"]);

    assert_eq!(thread.posts[2].character, None);
    assert!(thread.posts[2].body.is_empty());
}

#[test]
fn body_is_normalized_during_extraction() {
    let html = thread_page(
        "T",
        "a",
        "-",
        &[PostFixture {
            character: None,
            screen_name: None,
            icon: None,
            content: r#"<p>- <span style="text-decoration: underline;">no</span></p><div>skip</div>"#,
        }],
    );
    let thread = GlowficExtractor.extract(&html);
    assert_eq!(thread.posts[0].body, vec![r"\- <u>no</u>"]);
}

#[test]
fn empty_document_degrades_gracefully() {
    let thread = GlowficExtractor.extract("<html><body><p>nothing here</p></body></html>");
    assert_eq!(thread.title, None);
    assert_eq!(thread.author, None);
    assert_eq!(thread.last_updated, None);
    assert!(thread.posts.is_empty());
}
