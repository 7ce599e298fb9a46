use serde::Serialize;

use crate::classifier::Classification;
use crate::cleaner::DocumentText;
use crate::quality::QualityAssessment;
use crate::segmenter::Section;

use super::error::PipelineWarning;

/// Everything the text pipeline derives from one document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentAnalysis {
    #[serde(skip)]
    pub text: DocumentText,
    pub classification: Classification,
    pub sections: Vec<Section>,
    pub assessment: QualityAssessment,
    pub warnings: Vec<PipelineWarning>,
}
