use std::sync::mpsc;

use crate::PipelineEvent;

/// Receives progress from pipeline stages. Implementations must not block.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: PipelineEvent);
}

/// Drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn emit(&self, _event: PipelineEvent) {}
}

/// Forwards events to a channel, for callers that consume progress on
/// another thread.
pub struct ChannelProgressSink {
    tx: mpsc::Sender<PipelineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<PipelineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: PipelineEvent) {
        let _ = self.tx.send(event);
    }
}
