use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;

use crate::{FailureKind, FetchError, FetchMetadata, FetchOutput, ResourceKind};

pub const DEFAULT_MAX_DOCUMENT_BYTES: u64 = 256 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    /// Body cap for [`ResourceKind::Document`]. A flat view carries every
    /// reply of the thread, so this is far above the image cap.
    pub max_document_bytes: u64,
    /// Body cap for [`ResourceKind::Image`].
    pub max_image_bytes: u64,
    /// Accepted for [`ResourceKind::Document`]. Entries ending in `/` match as prefixes.
    pub document_content_types: Vec<String>,
    /// Accepted for [`ResourceKind::Image`]. Entries ending in `/` match as prefixes.
    pub image_content_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
            max_image_bytes: 5 * 1024 * 1024,
            document_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
            ],
            image_content_types: vec![
                "image/".to_string(),
                "application/octet-stream".to_string(),
            ],
        }
    }
}

impl FetchSettings {
    fn allowed(&self, kind: ResourceKind) -> &[String] {
        match kind {
            ResourceKind::Document => &self.document_content_types,
            ResourceKind::Image => &self.image_content_types,
        }
    }

    fn max_bytes(&self, kind: ResourceKind) -> u64 {
        match kind {
            ResourceKind::Document => self.max_document_bytes,
            ResourceKind::Image => self.max_image_bytes,
        }
    }

    fn is_content_type_allowed(&self, kind: ResourceKind, content_type: &str) -> bool {
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        self.allowed(kind).iter().any(|allowed| {
            if allowed.ends_with('/') {
                ct.get(..allowed.len())
                    .is_some_and(|prefix| prefix.eq_ignore_ascii_case(allowed))
            } else {
                allowed.eq_ignore_ascii_case(ct)
            }
        })
    }
}

/// HTTP GET capability used for the thread page and every icon.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, kind: ResourceKind) -> Result<FetchOutput, FetchError>;
}

/// [`Fetcher`] over one shared `reqwest::Client`; concurrent fetches reuse it.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .user_agent(concat!("glowfic-epub/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { client, settings })
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str, kind: ResourceKind) -> Result<FetchOutput, FetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let max_bytes = self.settings.max_bytes(kind);
        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        if let Some(ct) = content_type.as_deref() {
            if !self.settings.is_content_type_allowed(kind, ct) {
                return Err(FetchError::new(
                    FailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    "unsupported content type",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        let metadata = FetchMetadata {
            original_url: url.to_string(),
            final_url,
            content_type,
            byte_len: bytes.len() as u64,
        };

        Ok(FetchOutput { bytes, metadata })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
