//! docxmd - DOCX/Markdown conversion and post-processing of HR documents.

mod commands;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{AnalyzeCommand, AppContext, ConvertCommand, HistoryCommand, ProcessCommand};
use logging::LogFormat;

#[derive(Parser)]
#[command(
    name = "docxmd",
    version,
    about = "Convert DOCX and Markdown, then clean, classify and assess HR documents",
    after_help = "EXAMPLES:\n  \
                  docxmd convert --src docs/word --dst docs/Conversion --format docx2md --post-process\n  \
                  docxmd process docs/Conversion --workers 4 --report file\n  \
                  docxmd analyze docs/Conversion/Бухгалтер.md --json\n  \
                  docxmd history"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (JSON or YAML); defaults to ~/.docxmd/config.json when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    /// History database; defaults to ~/.docxmd/history.db
    #[arg(long, global = true)]
    history_db: Option<PathBuf>,

    /// Do not record results in the history database
    #[arg(long, global = true)]
    no_history: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a directory between DOCX and Markdown with Pandoc
    Convert(ConvertCommand),

    /// Clean, classify and re-render every Markdown file in a directory
    Process(ProcessCommand),

    /// Analyze a single Markdown file without modifying it
    Analyze(AnalyzeCommand),

    /// Show aggregate statistics from the history database
    History(HistoryCommand),
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.log_format)?;
    tracing::debug!("docxmd v{}", env!("CARGO_PKG_VERSION"));

    let ctx = AppContext::new(cli.config.as_deref(), cli.history_db, cli.no_history)?;

    match cli.command {
        Commands::Convert(cmd) => cmd.execute(&ctx),
        Commands::Process(cmd) => cmd.execute(&ctx),
        Commands::Analyze(cmd) => cmd.execute(&ctx),
        Commands::History(cmd) => cmd.execute(&ctx),
    }
}
