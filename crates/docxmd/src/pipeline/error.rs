use serde::Serialize;
use thiserror::Error;

use crate::patterns::DocumentType;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Document processing failed: {0}")]
    Processing(#[from] crate::error::ProcessError),

    #[error("Write-back failed: {0}")]
    Write(crate::error::ProcessError),
}

/// Conditions worth reporting that do not stop a file from being processed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PipelineWarning {
    /// No candidate type scored above the classification threshold.
    ClassificationAmbiguous { best_score: f64, threshold: f64 },
    /// None of the canonical headings of the detected type was found.
    SegmentationIncomplete { document_type: DocumentType },
}

impl std::fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineWarning::ClassificationAmbiguous {
                best_score,
                threshold,
            } => write!(
                f,
                "document type is ambiguous (best score {:.3} below {:.3})",
                best_score, threshold
            ),
            PipelineWarning::SegmentationIncomplete { document_type } => write!(
                f,
                "no section headings of '{}' were recognised",
                document_type.slug()
            ),
        }
    }
}
