use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::document::DocumentMetadata;
use crate::worker::job::Job;

use super::analysis::DocumentAnalysis;
use super::error::PipelineWarning;

pub struct PipelineContext {
    // Input
    pub job: Job,
    pub started: Instant,
    pub started_at: DateTime<Utc>,

    // Set after reading
    pub raw_text: Option<String>,

    // Footer of an earlier run, when processing was forced
    pub previous_metadata: Option<DocumentMetadata>,

    // Set after analysis
    pub analysis: Option<DocumentAnalysis>,

    // Canonical layout plus footer, as written back
    pub rendered: Option<String>,

    // Non-fatal warnings
    pub warnings: Vec<PipelineWarning>,
}

impl PipelineContext {
    pub fn new(job: Job) -> Self {
        Self {
            job,
            started: Instant::now(),
            started_at: Utc::now(),
            raw_text: None,
            previous_metadata: None,
            analysis: None,
            rendered: None,
            warnings: Vec::new(),
        }
    }
}
