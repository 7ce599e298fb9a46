mod analyze;
mod convert;
mod history;
mod process;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::ValueEnum;
use tracing::{info, warn};

use docxmd::history::default_history_path;
use docxmd::report::{brief_summary, render_console, write_json_report, write_markdown_report};
use docxmd::safety::ProtectionPolicy;
use docxmd::{
    BatchRunner, Config, HistoryStore, PipelineConfig, ProcessingOptions, ProcessingReport,
};

pub use analyze::AnalyzeCommand;
pub use convert::ConvertCommand;
pub use history::HistoryCommand;
pub use process::ProcessCommand;

/// State shared by every subcommand.
pub struct AppContext {
    pub config: Config,
    history_path: Option<PathBuf>,
    no_history: bool,
}

impl AppContext {
    pub fn new(config_path: Option<&Path>, history_db: Option<PathBuf>, no_history: bool) -> Result<Self> {
        let config = load_config(config_path)?;
        Ok(Self {
            config,
            history_path: history_db.or_else(default_history_path),
            no_history,
        })
    }

    /// Opens the history store for recording. Failure to open only disables
    /// recording.
    pub fn history(&self) -> Option<HistoryStore> {
        if self.no_history {
            return None;
        }
        let path = self.history_path.as_ref()?;
        match HistoryStore::open(path) {
            Ok(store) => Some(store),
            Err(e) => {
                warn!("History disabled, cannot open {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn history_path(&self) -> Option<&Path> {
        self.history_path.as_deref()
    }

    pub fn pipeline_config(&self, options: ProcessingOptions) -> docxmd::Result<Arc<PipelineConfig>> {
        let config = PipelineConfig::from_config(&self.config)?.with_options(options);
        Ok(Arc::new(config))
    }

    /// Processes every Markdown file below `dir` and returns the report.
    pub fn run_batch(
        &self,
        dir: &Path,
        options: ProcessingOptions,
        workers: Option<usize>,
        policy: Arc<dyn ProtectionPolicy>,
    ) -> Result<ProcessingReport> {
        let config = self.pipeline_config(options)?;
        let mut runner = BatchRunner::new(config, policy)
            .with_workers(workers.unwrap_or_else(|| self.config.effective_worker_count()));
        if let Some(history) = self.history() {
            runner = runner.with_history(history);
        }
        runner
            .run_directory(dir)
            .with_context(|| format!("Failed to process {}", dir.display()))
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return docxmd::load_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }

    match docxmd::config::default_config_path().filter(|p| p.exists()) {
        Some(path) => {
            info!("Using config file {}", path.display());
            docxmd::load_config(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
        None => docxmd::load_default_config().context("Failed to load built-in configuration"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Summary on standard output
    Console,
    /// processing_report.md next to the processed files
    File,
    /// Full JSON report on standard output
    Json,
}

pub fn emit_report(
    report: &ProcessingReport,
    format: ReportFormat,
    dir: &Path,
    update: bool,
) -> Result<()> {
    match format {
        ReportFormat::Console => {
            println!("{}", render_console(report));
        }
        ReportFormat::File => {
            let path = write_markdown_report(report, dir, update)?;
            println!("{}", brief_summary(report));
            println!("Отчет сохранен: {}", path.display());
        }
        ReportFormat::Json => {
            println!("{}", report.to_json()?);
        }
    }
    Ok(())
}

/// Writes the JSON report to a file instead of standard output.
pub fn save_json_report(report: &ProcessingReport, path: &Path) -> Result<()> {
    write_json_report(report, path)
        .with_context(|| format!("Failed to write {}", path.display()))
}
