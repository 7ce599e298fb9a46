pub mod analysis;
pub mod config;
pub mod context;
pub mod error;
pub mod progress;
pub mod runner;

pub use analysis::DocumentAnalysis;
pub use config::{PipelineConfig, ProcessingOptions};
pub use context::PipelineContext;
pub use error::{PipelineError, PipelineWarning};
pub use progress::{LogProgress, NoopProgress, ProcessingPhase, ProgressEvent, ProgressReporter};
pub use runner::Pipeline;
