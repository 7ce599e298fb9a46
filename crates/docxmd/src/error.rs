use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocxmdError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Processing error: {0}")]
    Process(#[from] ProcessError),

    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("History error: {0}")]
    History(#[from] crate::history::HistoryError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Failed to parse config YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("Invalid pattern '{name}': {reason}")]
    InvalidPattern { name: String, reason: String },

    #[error("Invalid artifact rule '{id}': {reason}")]
    InvalidRule { id: String, reason: String },
}

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to read document '{path}': {source}")]
    ReadDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write document '{path}': {source}")]
    WriteDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Empty, whitespace-only or undecodable input. Recorded per file, the
    /// batch keeps going.
    #[error("Malformed input: {reason}")]
    MalformedInput { reason: String },

    #[error("Failed to render metadata: {0}")]
    Metadata(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Pandoc executable '{program}' is not available: {source}")]
    PandocUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Pandoc failed for '{path}' (exit code {code:?}): {stderr}")]
    PandocFailed {
        path: PathBuf,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Pandoc timed out after {timeout:?} on '{path}'")]
    Timeout { path: PathBuf, timeout: Duration },

    #[error("Invalid reference template '{path}': {reason}")]
    InvalidTemplate { path: PathBuf, reason: String },

    #[error("Unknown conversion format '{0}' (expected docx2md or md2docx)")]
    UnknownFormat(String),

    #[error("Source directory '{0}' does not exist")]
    MissingSource(PathBuf),

    #[error("Input file '{0}' does not exist")]
    MissingInput(PathBuf),

    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Worker channel closed unexpectedly")]
    ChannelClosed,

    #[error("Directory scan failed for '{path}': {source}")]
    ScanFailed {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Directory '{0}' does not exist")]
    MissingDirectory(PathBuf),

    #[error("Directory '{0}' is outside the safe directories; pass the override flag to process it")]
    UnsafeDirectory(PathBuf),
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DocxmdError>;
