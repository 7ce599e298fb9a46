use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Args;
use tracing::info;

use docxmd::{convert_directory, ConversionFormat, PandocConverter, ProcessingOptions, SafetyPolicy};

use super::{emit_report, AppContext, ReportFormat};

#[derive(Args)]
pub struct ConvertCommand {
    /// Source directory
    #[arg(long)]
    src: PathBuf,

    /// Destination directory
    #[arg(long)]
    dst: PathBuf,

    /// Conversion direction: docx2md or md2docx
    #[arg(long)]
    format: ConversionFormat,

    /// Reference .docx template for md2docx
    #[arg(long)]
    template: Option<PathBuf>,

    /// Post-process the Markdown side after conversion
    #[arg(long)]
    post_process: bool,

    /// Post-process files that already carry a metadata footer
    #[arg(long)]
    force_process: bool,

    /// Show what post-processing would do without changing files
    #[arg(long)]
    dry_run_process: bool,

    /// Report output for post-processing
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Overwrite an existing processing_report.md
    #[arg(long)]
    report_update: bool,
}

impl ConvertCommand {
    pub fn execute(self, ctx: &AppContext) -> Result<ExitCode> {
        let converter = PandocConverter::from_config(&ctx.config.conversion)?
            .with_template(self.template.clone());
        if let Some(template) = converter.reference_template() {
            PandocConverter::validate_template(template)?;
        }
        converter
            .check_available()
            .context("Pandoc is required for conversion: https://pandoc.org/installing.html")?;

        let summary = convert_directory(&converter, &self.src, &self.dst, self.format)?;
        println!(
            "Конвертировано: {}/{} файлов ({})",
            summary.converted, summary.total, self.format
        );
        for failure in &summary.failures {
            println!("  - {}: {}", failure.path.display(), failure.error);
        }

        if self.post_process {
            let markdown_dir = self.format.markdown_side(&self.src, &self.dst);
            if markdown_dir.is_dir() {
                info!("Post-processing {}", markdown_dir.display());
                let options = ProcessingOptions {
                    force: self.force_process,
                    dry_run: self.dry_run_process,
                    write_back: true,
                };
                let policy = SafetyPolicy::from_config(&ctx.config.safety)?;
                let report = ctx.run_batch(markdown_dir, options, None, Arc::new(policy))?;
                emit_report(&report, self.report, markdown_dir, self.report_update)?;
            }
        }

        Ok(if summary.is_complete() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }
}
