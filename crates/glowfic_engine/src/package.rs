//! EPUB container assembly.
//!
//! Entry order: `mimetype` (stored, first), image assets, the content
//! document, `META-INF/container.xml`, `content.opf`.

use std::io::{Cursor, Write};

use chrono::NaiveDateTime;
use glowfic_core::{ThreadId, FALLBACK_ICON_FILENAME};
use html_escape::{encode_double_quoted_attribute, encode_text};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::IconAsset;

pub const MIMETYPE: &str = "application/epub+zip";
pub const CONTAINER_PATH: &str = "META-INF/container.xml";
pub const PACKAGE_PATH: &str = "content.opf";
pub const ASSET_DIR: &str = "assets";
pub const DEFAULT_LANGUAGE: &str = "en";

/// Grey square shown in place of icons that could not be downloaded.
const FALLBACK_ICON_SVG: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"50\" height=\"50\" viewBox=\"0 0 50 50\">\
<rect width=\"50\" height=\"50\" fill=\"#cccccc\"/>\
<text x=\"25\" y=\"32\" font-size=\"20\" text-anchor=\"middle\" fill=\"#666666\">?</text>\
</svg>\n";

#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookMetadata {
    pub thread_id: ThreadId,
    pub title: String,
    pub author: Option<String>,
    pub last_updated: Option<NaiveDateTime>,
    pub language: String,
}

impl BookMetadata {
    /// `dc:date` value; an unknown date is written as the Unix epoch.
    pub fn date(&self) -> String {
        self.last_updated
            .unwrap_or_default()
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string()
    }
}

/// Everything that goes into one archive.
pub struct Package<'a> {
    pub metadata: &'a BookMetadata,
    pub content_html: &'a str,
    pub assets: Vec<&'a IconAsset>,
    /// Adds `assets/missing_icon.svg`.
    pub include_fallback_icon: bool,
}

impl Package<'_> {
    pub fn content_filename(&self) -> String {
        self.metadata.thread_id.content_filename()
    }

    /// Archive paths of the image entries, in write order.
    fn asset_entries(&self) -> Vec<(String, &[u8])> {
        let mut entries: Vec<(String, &[u8])> = self
            .assets
            .iter()
            .map(|asset| {
                (
                    format!("{ASSET_DIR}/{}", asset.stored_filename),
                    asset.bytes.as_slice(),
                )
            })
            .collect();
        if self.include_fallback_icon {
            entries.push((
                format!("{ASSET_DIR}/{FALLBACK_ICON_FILENAME}"),
                FALLBACK_ICON_SVG.as_bytes(),
            ));
        }
        entries
    }

    /// Writes the archive into memory.
    pub fn build(&self) -> Result<Vec<u8>, PackageError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.start_file("mimetype", stored)?;
        zip.write_all(MIMETYPE.as_bytes())?;

        let assets = self.asset_entries();
        for (path, bytes) in &assets {
            zip.start_file(path.as_str(), deflated)?;
            zip.write_all(bytes)?;
        }

        zip.start_file(self.content_filename(), deflated)?;
        zip.write_all(self.content_html.as_bytes())?;

        zip.start_file(CONTAINER_PATH, deflated)?;
        zip.write_all(container_xml().as_bytes())?;

        let asset_paths: Vec<&str> = assets.iter().map(|(path, _)| path.as_str()).collect();
        zip.start_file(PACKAGE_PATH, deflated)?;
        zip.write_all(self.package_opf(&asset_paths).as_bytes())?;

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }

    fn package_opf(&self, asset_paths: &[&str]) -> String {
        let meta = self.metadata;
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        out.push_str("<package xmlns=\"http://www.idpf.org/2007/opf\" unique-identifier=\"uuid_id\" version=\"2.0\">\n");
        out.push_str("\t<metadata xmlns:dc=\"http://purl.org/dc/elements/1.1/\">\n");
        out.push_str(&format!(
            "\t\t<dc:identifier id=\"uuid_id\">glowfic-{}</dc:identifier>\n",
            meta.thread_id
        ));
        out.push_str(&format!("\t\t<dc:title>{}</dc:title>\n", encode_text(&meta.title)));
        if let Some(author) = &meta.author {
            out.push_str(&format!("\t\t<dc:creator>{}</dc:creator>\n", encode_text(author)));
        }
        out.push_str(&format!("\t\t<dc:date>{}</dc:date>\n", meta.date()));
        out.push_str(&format!(
            "\t\t<dc:language>{}</dc:language>\n",
            encode_text(&meta.language)
        ));
        out.push_str("\t</metadata>\n");

        out.push_str("\t<manifest>\n");
        out.push_str(&format!(
            "\t\t<item href=\"{}\" id=\"content\" media-type=\"application/xhtml+xml\"/>\n",
            encode_double_quoted_attribute(&self.content_filename())
        ));
        for (index, path) in asset_paths.iter().enumerate() {
            let media_type = mime_guess::from_path(path).first_or_octet_stream();
            out.push_str(&format!(
                "\t\t<item href=\"{}\" id=\"asset_{index}\" media-type=\"{}\"/>\n",
                encode_double_quoted_attribute(path),
                media_type.essence_str()
            ));
        }
        out.push_str("\t</manifest>\n");

        out.push_str("\t<spine>\n\t\t<itemref idref=\"content\"/>\n\t</spine>\n");
        out.push_str("</package>\n");
        out
    }
}

fn container_xml() -> String {
    format!(
        "<?xml version=\"1.0\"?>\n\
         <container version=\"1.0\" xmlns=\"urn:oasis:names:tc:opendocument:xmlns:container\">\n\
         \t<rootfiles>\n\
         \t\t<rootfile full-path=\"{PACKAGE_PATH}\" media-type=\"application/oebps-package+xml\"/>\n\
         \t</rootfiles>\n\
         </container>\n"
    )
}
