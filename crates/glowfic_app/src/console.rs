use std::io::Write;

use glowfic_engine::{PipelineEvent, ProgressSink, Stage};

/// Prints pipeline progress as plain status lines on stdout.
#[derive(Debug, Default)]
pub struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn emit(&self, event: PipelineEvent) {
        if let Some(line) = describe(&event) {
            let mut out = std::io::stdout().lock();
            let _ = writeln!(out, "{line}");
        }
    }
}

pub fn describe(event: &PipelineEvent) -> Option<String> {
    match event {
        PipelineEvent::Stage(stage) => match stage {
            Stage::DownloadingThread => Some("Downloading posts...".to_string()),
            Stage::Converting => Some("Converting to html...".to_string()),
            Stage::Packaging => Some("Generating ePUB...".to_string()),
            Stage::Extracting | Stage::DownloadingIcons | Stage::Writing | Stage::Done => None,
        },
        PipelineEvent::ThreadLoaded {
            title,
            author,
            last_updated,
            posts,
        } => {
            let updated = last_updated
                .map(|at| at.format("%a, %d %b %Y, %H:%M").to_string())
                .unwrap_or_else(|| "unknown".to_string());
            Some(format!(
                "Glowfic: {title}\nAuthor: {}\nLast updated: {updated}\nPosts: {posts}",
                author.as_deref().unwrap_or("unknown")
            ))
        }
        PipelineEvent::IconBatchCompleted { completed, total } => {
            Some(format!("Downloaded icons {completed:03}/{total:03}"))
        }
        PipelineEvent::IconFailed { url, error } => {
            Some(format!("warning: icon {url} skipped ({error})"))
        }
        PipelineEvent::Finished { archive_path } => {
            Some(format!("ePUB generated: {}", archive_path.display()))
        }
    }
}
