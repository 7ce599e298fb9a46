pub mod classifier;
pub mod cleaner;
pub mod config;
pub mod convert;
pub mod document;
pub mod error;
pub mod history;
pub mod patterns;
pub mod pipeline;
pub mod quality;
pub mod report;
pub mod safety;
pub mod sanitize;
pub mod segmenter;
pub mod worker;

pub use classifier::{Classification, DocumentTypeClassifier};
pub use cleaner::{ArtifactCleaner, DocumentText};
pub use config::{load_config, load_default_config, Config};
pub use convert::{convert_directory, ConversionFormat, ConversionSummary, Converter, PandocConverter};
pub use error::{
    ConfigError, ConversionError, DocxmdError, ProcessError, ReportError, Result, WorkerError,
};
pub use history::{HistoryError, HistoryStatistics, HistoryStore};
pub use patterns::{DocumentType, PatternLibrary};
pub use pipeline::{
    DocumentAnalysis, Pipeline, PipelineConfig, PipelineContext, PipelineWarning,
    ProcessingOptions,
};
pub use quality::{QualityAssessment, QualityAssessor, QualityBucket};
pub use report::{ProcessingReport, ProcessingResult, ProcessingStatus, SkipReason};
pub use safety::{ProtectionPolicy, SafetyPolicy};
pub use segmenter::{Section, SectionSegmenter};
pub use worker::{BatchRunner, DirectoryScanner, Job, WorkerPool};
