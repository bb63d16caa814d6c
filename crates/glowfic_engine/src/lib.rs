//! Glowfic engine: IO pipeline from thread URL to EPUB archive.
mod decode;
mod extract;
mod fetch;
mod filename;
mod images;
mod package;
mod persist;
mod pipeline;
mod progress;
mod render;
mod types;

pub use decode::{decode_page, DecodeError, DecodedPage};
pub use extract::{parse_last_updated, Extractor, GlowficExtractor, ThreadDocument};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher, DEFAULT_MAX_DOCUMENT_BYTES};
pub use filename::archive_filename;
pub use images::{
    stored_filename, IconAsset, IconFailure, IconResolver, ResolvedIcons, DEFAULT_BATCH_SIZE,
};
pub use package::{
    BookMetadata, Package, PackageError, ASSET_DIR, CONTAINER_PATH, DEFAULT_LANGUAGE, MIMETYPE,
    PACKAGE_PATH,
};
pub use persist::{ensure_output_dir, ArchiveWriter, PersistError};
pub use pipeline::{Pipeline, PipelineConfig, PipelineError, PipelineOutcome, DEFAULT_BASE_URL};
pub use progress::{ChannelProgressSink, NullProgressSink, ProgressSink};
pub use render::{render_content_document, MarkdownRenderer, PulldownRenderer};
pub use types::{
    FailureKind, FetchError, FetchMetadata, FetchOutput, PipelineEvent, ResourceKind, Stage,
};
