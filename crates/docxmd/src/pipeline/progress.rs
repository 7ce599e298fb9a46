use log::debug;

use crate::patterns::DocumentType;
use crate::quality::QualityBucket;
use crate::report::SkipReason;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingPhase {
    Reading,
    Analyzing,
    Rendering,
    Writing,
}

/// Events emitted by the pipeline while it works on one file.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    Phase {
        phase: ProcessingPhase,
        message: String,
    },
    Completed {
        document_type: DocumentType,
        bucket: QualityBucket,
    },
    Skipped {
        reason: SkipReason,
    },
    Failed {
        error: String,
    },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// No-op reporter for unit tests.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Forwards events to the `log` facade at debug level.
pub struct LogProgress {
    filename: String,
}

impl LogProgress {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
        }
    }
}

impl ProgressReporter for LogProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Phase { phase, message } => {
                debug!("[{}] {:?}: {}", self.filename, phase, message);
            }
            ProgressEvent::Completed {
                document_type,
                bucket,
            } => {
                debug!(
                    "[{}] done: {} ({} quality)",
                    self.filename,
                    document_type.slug(),
                    bucket
                );
            }
            ProgressEvent::Skipped { reason } => {
                debug!("[{}] skipped: {}", self.filename, reason.describe());
            }
            ProgressEvent::Failed { error } => {
                debug!("[{}] failed: {}", self.filename, error);
            }
        }
    }
}
