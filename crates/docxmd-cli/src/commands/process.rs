use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use tracing::info;

use docxmd::{ProcessingOptions, SafetyPolicy, WorkerError};

use super::{emit_report, save_json_report, AppContext, ReportFormat};

#[derive(Args)]
pub struct ProcessCommand {
    /// Directory with converted Markdown files
    #[arg(value_name = "DIR")]
    dir: PathBuf,

    /// Re-process files that already carry a metadata footer
    #[arg(long)]
    force: bool,

    /// Report what would be processed without changing files
    #[arg(long)]
    dry_run: bool,

    /// Analyze only; leave files untouched
    #[arg(long)]
    no_write: bool,

    /// Worker threads (defaults to the config value)
    #[arg(long)]
    workers: Option<usize>,

    /// Report output
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Overwrite an existing processing_report.md instead of adding a timestamped one
    #[arg(long)]
    report_update: bool,

    /// Also write the full JSON report to this file
    #[arg(long, value_name = "FILE")]
    json_out: Option<PathBuf>,

    /// Process a directory outside the configured safe directories
    #[arg(long)]
    allow_unsafe_dir: bool,
}

impl ProcessCommand {
    pub fn execute(self, ctx: &AppContext) -> Result<ExitCode> {
        let policy = SafetyPolicy::from_config(&ctx.config.safety)?;
        if !self.allow_unsafe_dir && !policy.is_safe_directory(&self.dir) {
            return Err(WorkerError::UnsafeDirectory(self.dir).into());
        }

        let options = ProcessingOptions {
            force: self.force,
            dry_run: self.dry_run,
            write_back: !self.no_write,
        };
        info!("Processing {}", self.dir.display());

        let report = ctx.run_batch(&self.dir, options, self.workers, Arc::new(policy))?;
        emit_report(&report, self.report, &self.dir, self.report_update)?;
        if let Some(path) = &self.json_out {
            save_json_report(&report, path)?;
        }

        Ok(if report.errors() > 0 {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        })
    }
}
