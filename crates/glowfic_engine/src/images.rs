use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use engine_logging::{engine_debug, engine_warn};
use futures_util::future::join_all;
use uuid::Uuid;

use crate::{FetchError, Fetcher, PipelineEvent, ProgressSink, ResourceKind};

pub const DEFAULT_BATCH_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconAsset {
    pub source_url: String,
    pub stored_filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconFailure {
    pub source_url: String,
    pub error: FetchError,
}

/// Outcome of resolving every icon of a thread. Failed URLs have no asset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedIcons {
    pub assets: HashMap<String, IconAsset>,
    pub failures: Vec<IconFailure>,
}

impl ResolvedIcons {
    /// Source URL to stored file name, for markdown composition.
    pub fn filename_map(&self) -> HashMap<String, String> {
        self.assets
            .iter()
            .map(|(url, asset)| (url.clone(), asset.stored_filename.clone()))
            .collect()
    }
}

/// Downloads icons in fixed-size batches. Fetches within a batch run
/// concurrently; a batch finishes completely before the next one starts.
pub struct IconResolver {
    fetcher: Arc<dyn Fetcher>,
    batch_size: usize,
}

impl IconResolver {
    pub fn new(fetcher: Arc<dyn Fetcher>, batch_size: usize) -> Self {
        Self {
            fetcher,
            batch_size: batch_size.max(1),
        }
    }

    /// `urls` must already be distinct; every entry is fetched exactly once.
    pub async fn resolve(&self, urls: &[String], sink: &dyn ProgressSink) -> ResolvedIcons {
        let mut resolved = ResolvedIcons::default();
        let total = urls.len();
        let mut completed = 0;

        for batch in urls.chunks(self.batch_size) {
            let results = join_all(batch.iter().map(|url| async move {
                let result = self.fetcher.fetch(url, ResourceKind::Image).await;
                (url, result)
            }))
            .await;

            for (url, result) in results {
                match result {
                    Ok(output) => {
                        let stored_filename = stored_filename(url);
                        engine_debug!(
                            "icon {} -> {} ({} bytes)",
                            url,
                            stored_filename,
                            output.bytes.len()
                        );
                        resolved.assets.insert(
                            url.clone(),
                            IconAsset {
                                source_url: url.clone(),
                                stored_filename,
                                bytes: output.bytes,
                            },
                        );
                    }
                    Err(error) => {
                        engine_warn!("icon download failed for {}: {}", url, error);
                        sink.emit(PipelineEvent::IconFailed {
                            url: url.clone(),
                            error: error.clone(),
                        });
                        resolved.failures.push(IconFailure {
                            source_url: url.clone(),
                            error,
                        });
                    }
                }
            }

            completed += batch.len();
            sink.emit(PipelineEvent::IconBatchCompleted { completed, total });
        }

        resolved
    }
}

/// Fresh unique name keeping the source extension, e.g. `3f2c…e1.png`.
pub fn stored_filename(source_url: &str) -> String {
    match url_extension(source_url) {
        Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
        None => Uuid::new_v4().to_string(),
    }
}

/// Extension of the URL's path, ignoring any query string or fragment.
fn url_extension(source_url: &str) -> Option<String> {
    let path = match url::Url::parse(source_url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => source_url
            .split(['?', '#'])
            .next()
            .unwrap_or(source_url)
            .to_string(),
    };
    Path::new(&path)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase())
}
