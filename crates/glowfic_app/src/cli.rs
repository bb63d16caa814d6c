use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use glowfic_engine::{
    PipelineConfig, DEFAULT_BASE_URL, DEFAULT_BATCH_SIZE, DEFAULT_LANGUAGE,
    DEFAULT_MAX_DOCUMENT_BYTES,
};
use log::LevelFilter;

/// Download a glowfic thread and package it as an EPUB.
#[derive(Debug, Parser)]
#[command(name = "glowfic-epub", version)]
pub struct Args {
    /// Link to the thread, e.g. https://glowfic.com/posts/1234
    pub url: String,

    /// Directory the .epub is written to.
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Icons downloaded concurrently per batch.
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE, value_parser = parse_batch_size)]
    pub batch_size: usize,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Largest thread page accepted, in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_DOCUMENT_BYTES)]
    pub max_page_bytes: u64,

    /// Value of dc:language in the package manifest.
    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    pub language: String,

    /// Site the thread is downloaded from.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// off, error, warn, info, debug or trace.
    #[arg(long, default_value = "error")]
    pub log_level: LevelFilter,

    /// Also write the log to ./glowfic-epub.log.
    #[arg(long)]
    pub log_file: bool,
}

fn parse_batch_size(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("batch size must be at least 1".to_string()),
        Ok(size) => Ok(size),
        Err(err) => Err(err.to_string()),
    }
}

impl Args {
    pub fn pipeline_config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::default_with_output(self.output_dir.clone());
        config.base_url = self.base_url.clone();
        config.icon_batch_size = self.batch_size;
        config.language = self.language.clone();
        config.fetch.request_timeout = Duration::from_secs(self.timeout_secs);
        config.fetch.max_document_bytes = self.max_page_bytes;
        config
    }
}
