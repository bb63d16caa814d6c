use std::io::{Cursor, Read};

use chrono::NaiveDate;
use glowfic_core::ThreadId;
use glowfic_engine::{BookMetadata, IconAsset, Package, CONTAINER_PATH, MIMETYPE, PACKAGE_PATH};
use pretty_assertions::assert_eq;
use zip::{CompressionMethod, ZipArchive};

fn metadata() -> BookMetadata {
    BookMetadata {
        thread_id: ThreadId(77),
        title: "Tea & <Sympathy>".to_string(),
        author: Some("alicorn".to_string()),
        last_updated: NaiveDate::from_ymd_opt(2023, 3, 8).and_then(|d| d.and_hms_opt(22, 14, 0)),
        language: "en".to_string(),
    }
}

fn asset(name: &str) -> IconAsset {
    IconAsset {
        source_url: format!("https://img.test/{name}"),
        stored_filename: name.to_string(),
        bytes: name.as_bytes().to_vec(),
    }
}

fn read_entry(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
    let mut out = String::new();
    archive
        .by_name(name)
        .expect("entry exists")
        .read_to_string(&mut out)
        .expect("utf-8 entry");
    out
}

#[test]
fn entries_are_written_in_required_order() {
    let metadata = metadata();
    let a = asset("a.png");
    let b = asset("b.jpg");
    let package = Package {
        metadata: &metadata,
        content_html: "<html/>",
        assets: vec![&a, &b],
        include_fallback_icon: false,
    };

    let bytes = package.build().expect("archive builds");
    let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "mimetype",
            "assets/a.png",
            "assets/b.jpg",
            "glowfic_77.html",
            CONTAINER_PATH,
            PACKAGE_PATH,
        ]
    );

    let mimetype = archive.by_index(0).unwrap();
    assert_eq!(mimetype.compression(), CompressionMethod::Stored);
    drop(mimetype);
    assert_eq!(read_entry(&mut archive, "mimetype"), MIMETYPE);
    assert_eq!(read_entry(&mut archive, "glowfic_77.html"), "<html/>");
    assert!(read_entry(&mut archive, CONTAINER_PATH).contains("full-path=\"content.opf\""));
}

#[test]
fn manifest_lists_metadata_and_assets() {
    let metadata = metadata();
    let a = asset("a.png");
    let package = Package {
        metadata: &metadata,
        content_html: "<html/>",
        assets: vec![&a],
        include_fallback_icon: true,
    };

    let mut archive = ZipArchive::new(Cursor::new(package.build().unwrap())).unwrap();
    let opf = read_entry(&mut archive, PACKAGE_PATH);

    assert!(opf.contains("<dc:title>Tea &amp; &lt;Sympathy&gt;</dc:title>"));
    assert!(opf.contains("<dc:creator>alicorn</dc:creator>"));
    assert!(opf.contains("<dc:date>2023-03-08T22:14:00</dc:date>"));
    assert!(opf.contains("<dc:language>en</dc:language>"));
    assert!(opf.contains("<dc:identifier id=\"uuid_id\">glowfic-77</dc:identifier>"));
    assert!(opf.contains("href=\"glowfic_77.html\" id=\"content\""));
    assert!(opf.contains("href=\"assets/a.png\" id=\"asset_0\" media-type=\"image/png\""));
    assert!(opf.contains(
        "href=\"assets/missing_icon.svg\" id=\"asset_1\" media-type=\"image/svg+xml\""
    ));
    assert!(opf.contains("<itemref idref=\"content\"/>"));

    assert!(read_entry(&mut archive, "assets/missing_icon.svg").contains("<svg"));
}

#[test]
fn unknown_author_and_date_degrade() {
    let metadata = BookMetadata {
        author: None,
        last_updated: None,
        ..metadata()
    };
    let package = Package {
        metadata: &metadata,
        content_html: "",
        assets: Vec::new(),
        include_fallback_icon: false,
    };
    let mut archive = ZipArchive::new(Cursor::new(package.build().unwrap())).unwrap();
    let opf = read_entry(&mut archive, PACKAGE_PATH);
    assert!(!opf.contains("dc:creator"));
    assert!(opf.contains("<dc:date>1970-01-01T00:00:00</dc:date>"));
    assert_eq!(archive.len(), 4);
}
