use std::path::PathBuf;
use std::sync::Arc;

use engine_logging::{engine_debug, engine_info};
use glowfic_core::{compose_markdown, unique_icon_urls, ThreadId, ThreadUrlError};

use crate::decode::{decode_page, DecodeError};
use crate::extract::{Extractor, GlowficExtractor};
use crate::filename::archive_filename;
use crate::images::{IconResolver, DEFAULT_BATCH_SIZE};
use crate::package::{BookMetadata, Package, PackageError, DEFAULT_LANGUAGE};
use crate::persist::{ArchiveWriter, PersistError};
use crate::render::{render_content_document, MarkdownRenderer, PulldownRenderer};
use crate::{
    FetchError, FetchSettings, Fetcher, PipelineEvent, ProgressSink, ReqwestFetcher,
    ResourceKind, Stage,
};

pub const DEFAULT_BASE_URL: &str = "https://glowfic.com";

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Site root the thread page is fetched from.
    pub base_url: String,
    pub output_dir: PathBuf,
    pub icon_batch_size: usize,
    pub language: String,
    pub fetch: FetchSettings,
}

impl PipelineConfig {
    pub fn default_with_output(output_dir: PathBuf) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir,
            icon_batch_size: DEFAULT_BATCH_SIZE,
            language: DEFAULT_LANGUAGE.to_string(),
            fetch: FetchSettings::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    InvalidUrl(#[from] ThreadUrlError),
    #[error("could not download thread page {url}: {source}")]
    ThreadFetch {
        url: String,
        #[source]
        source: FetchError,
    },
    #[error("could not set up http client: {0}")]
    Client(FetchError),
    #[error("could not decode thread page: {0}")]
    Decode(#[from] DecodeError),
    #[error("could not build archive: {0}")]
    Package(#[from] PackageError),
    #[error("could not write archive: {0}")]
    Persist(#[from] PersistError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    pub archive_path: PathBuf,
    pub title: String,
    pub author: Option<String>,
    pub post_count: usize,
    pub icon_count: usize,
    pub failed_icons: Vec<String>,
}

/// Thread URL in, EPUB file out. Stages run one after another; only the
/// icon downloads fan out.
pub struct Pipeline {
    config: PipelineConfig,
    fetcher: Arc<dyn Fetcher>,
    extractor: Box<dyn Extractor>,
    renderer: Box<dyn MarkdownRenderer>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        let fetcher = ReqwestFetcher::new(config.fetch.clone()).map_err(PipelineError::Client)?;
        Ok(Self::with_parts(
            config,
            Arc::new(fetcher),
            Box::new(GlowficExtractor),
            Box::new(PulldownRenderer),
        ))
    }

    pub fn with_parts(
        config: PipelineConfig,
        fetcher: Arc<dyn Fetcher>,
        extractor: Box<dyn Extractor>,
        renderer: Box<dyn MarkdownRenderer>,
    ) -> Self {
        Self {
            config,
            fetcher,
            extractor,
            renderer,
        }
    }

    pub async fn run(
        &self,
        thread_url: &str,
        sink: &dyn ProgressSink,
    ) -> Result<PipelineOutcome, PipelineError> {
        let thread_id = ThreadId::from_url(thread_url)?;
        engine_info!("thread id {}", thread_id);

        sink.emit(PipelineEvent::Stage(Stage::DownloadingThread));
        let page_url = thread_id.flat_url(&self.config.base_url);
        let page = self
            .fetcher
            .fetch(&page_url, ResourceKind::Document)
            .await
            .map_err(|source| PipelineError::ThreadFetch {
                url: page_url.clone(),
                source,
            })?;
        let decoded = decode_page(&page.bytes, page.metadata.content_type.as_deref())?;
        engine_debug!(
            "thread page {} bytes, {}",
            page.metadata.byte_len,
            decoded.encoding_label
        );

        sink.emit(PipelineEvent::Stage(Stage::Extracting));
        let thread = self.extractor.extract(&decoded.html);
        let title = thread
            .title
            .clone()
            .unwrap_or_else(|| format!("glowfic_{thread_id}"));
        engine_info!("'{}': {} posts", title, thread.posts.len());
        sink.emit(PipelineEvent::ThreadLoaded {
            title: title.clone(),
            author: thread.author.clone(),
            last_updated: thread.last_updated,
            posts: thread.posts.len(),
        });

        sink.emit(PipelineEvent::Stage(Stage::DownloadingIcons));
        let icon_urls = unique_icon_urls(&thread.posts);
        let resolver = IconResolver::new(self.fetcher.clone(), self.config.icon_batch_size);
        let icons = resolver.resolve(&icon_urls, sink).await;

        sink.emit(PipelineEvent::Stage(Stage::Converting));
        let markdown = compose_markdown(&thread.posts, &icons.filename_map());
        let content_html = render_content_document(&title, &markdown, self.renderer.as_ref());

        sink.emit(PipelineEvent::Stage(Stage::Packaging));
        let metadata = BookMetadata {
            thread_id,
            title: title.clone(),
            author: thread.author.clone(),
            last_updated: thread.last_updated,
            language: self.config.language.clone(),
        };
        // Keep asset order stable between runs: follow first use in the thread.
        let assets = icon_urls
            .iter()
            .filter_map(|url| icons.assets.get(url))
            .collect();
        let package = Package {
            metadata: &metadata,
            content_html: &content_html,
            assets,
            include_fallback_icon: !icons.failures.is_empty(),
        };
        let archive = package.build()?;

        sink.emit(PipelineEvent::Stage(Stage::Writing));
        let writer = ArchiveWriter::new(self.config.output_dir.clone());
        let archive_path = writer.write(&archive_filename(&title, thread_id), &archive)?;
        engine_info!("wrote {}", archive_path.display());

        sink.emit(PipelineEvent::Finished {
            archive_path: archive_path.clone(),
        });
        sink.emit(PipelineEvent::Stage(Stage::Done));

        Ok(PipelineOutcome {
            archive_path,
            title,
            author: thread.author,
            post_count: thread.posts.len(),
            icon_count: icons.assets.len(),
            failed_icons: icons
                .failures
                .into_iter()
                .map(|failure| failure.source_url)
                .collect(),
        })
    }
}
