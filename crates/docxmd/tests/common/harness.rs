//! Test harness for isolated test execution.
//!
//! The `TestHarness` owns a temporary directory with a `Conversion`
//! subdirectory (a safe batch root) and a `config` directory, and wires the
//! pipeline and batch runner from a `Config`.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use docxmd::config::{load_default_config, Config};
use docxmd::pipeline::{DocumentAnalysis, Pipeline, PipelineConfig, ProcessingOptions};
use docxmd::report::ProcessingReport;
use docxmd::safety::{ProtectionPolicy, SafetyPolicy};
use docxmd::worker::BatchRunner;
use docxmd::HistoryStore;

pub struct TestHarness {
    temp_dir: TempDir,
    /// Batch root holding the Markdown inputs.
    pub input_dir: PathBuf,
    pub config_dir: PathBuf,
    config: Config,
}

impl TestHarness {
    /// Harness with the built-in configuration.
    pub fn new() -> Self {
        Self::with_config(load_default_config().expect("default config"))
    }

    pub fn with_config(config: Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let input_dir = temp_dir.path().join("Conversion");
        let config_dir = temp_dir.path().join("config");
        std::fs::create_dir_all(&input_dir).expect("Failed to create input dir");
        std::fs::create_dir_all(&config_dir).expect("Failed to create config dir");

        Self {
            temp_dir,
            input_dir,
            config_dir,
            config,
        }
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Writes a Markdown file below the batch root, creating parents.
    pub fn write_input(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.input_dir.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(&path, content).expect("Failed to write input file");
        path
    }

    pub fn read_input(&self, relative: &str) -> String {
        std::fs::read_to_string(self.input_dir.join(relative)).expect("Failed to read input file")
    }

    pub fn write_config(&self, filename: &str, config: &Config) -> PathBuf {
        let path = self.config_dir.join(filename);
        let json = serde_json::to_string_pretty(config).expect("Failed to serialize config");
        std::fs::write(&path, json).expect("Failed to write config file");
        path
    }

    pub fn pipeline_config(&self, options: ProcessingOptions) -> Arc<PipelineConfig> {
        Arc::new(
            PipelineConfig::from_config(&self.config)
                .expect("pipeline config")
                .with_options(options),
        )
    }

    /// Runs the in-memory text pipeline.
    pub fn analyze(&self, text: &str) -> DocumentAnalysis {
        Pipeline::from_config(self.pipeline_config(ProcessingOptions::default()))
            .analyze(text)
            .expect("analysis")
    }

    pub fn policy(&self) -> Arc<dyn ProtectionPolicy> {
        Arc::new(SafetyPolicy::from_config(&self.config.safety).expect("safety policy"))
    }

    pub fn run_batch(&self, options: ProcessingOptions, workers: usize) -> ProcessingReport {
        BatchRunner::new(self.pipeline_config(options), self.policy())
            .with_workers(workers)
            .run_directory(&self.input_dir)
            .expect("batch run")
    }

    pub fn run_batch_with_history(
        &self,
        options: ProcessingOptions,
        history: HistoryStore,
    ) -> ProcessingReport {
        BatchRunner::new(self.pipeline_config(options), self.policy())
            .with_history(history)
            .run_directory(&self.input_dir)
            .expect("batch run")
    }
}
