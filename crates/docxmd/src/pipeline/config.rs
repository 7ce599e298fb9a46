use std::sync::Arc;

use crate::config::{Config, ScoringConfig};
use crate::error::ConfigError;
use crate::patterns::PatternLibrary;

/// Caller toggles for a processing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingOptions {
    /// Re-process files that already carry a metadata footer.
    pub force: bool,
    /// Report what would be processed without analysing or writing.
    pub dry_run: bool,
    /// Rewrite processed files in place. Off means analysis only.
    pub write_back: bool,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            force: false,
            dry_run: false,
            write_back: true,
        }
    }
}

pub struct PipelineConfig {
    pub library: Arc<PatternLibrary>,
    pub scoring: ScoringConfig,
    pub options: ProcessingOptions,
}

impl PipelineConfig {
    /// Compiles the pattern library once; every worker shares it.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            library: Arc::new(PatternLibrary::from_config(config)?),
            scoring: config.scoring.clone(),
            options: ProcessingOptions::default(),
        })
    }

    pub fn with_options(mut self, options: ProcessingOptions) -> Self {
        self.options = options;
        self
    }
}
