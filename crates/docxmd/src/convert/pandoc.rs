use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use log::{debug, info};
use tokio::process::Command as TokioCommand;
use tokio::runtime::{Builder, Runtime};

use crate::config::ConversionConfig;
use crate::error::ConversionError;

use super::{ConversionFormat, Converter};

/// Runs the `pandoc` executable, one process per file, under a timeout.
pub struct PandocConverter {
    program: String,
    timeout: Duration,
    extract_media: bool,
    reference_template: Option<PathBuf>,
    runtime: Runtime,
}

impl PandocConverter {
    pub fn from_config(config: &ConversionConfig) -> Result<Self, ConversionError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ConversionError::Runtime)?;

        Ok(Self {
            program: config.pandoc_path.clone(),
            timeout: Duration::from_secs(config.timeout_secs.max(1)),
            extract_media: config.extract_media,
            reference_template: config.reference_template.as_ref().map(PathBuf::from),
            runtime,
        })
    }

    /// Overrides the reference template from the config file.
    pub fn with_template(mut self, template: Option<PathBuf>) -> Self {
        if template.is_some() {
            self.reference_template = template;
        }
        self
    }

    pub fn reference_template(&self) -> Option<&Path> {
        self.reference_template.as_deref()
    }

    /// Returns the first line of `pandoc --version`.
    pub fn check_available(&self) -> Result<String, ConversionError> {
        let output = self.runtime.block_on(async {
            let mut cmd = TokioCommand::new(&self.program);
            cmd.arg("--version")
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true);
            tokio::time::timeout(self.timeout, cmd.output()).await
        });

        let output = match output {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => {
                return Err(ConversionError::PandocUnavailable {
                    program: self.program.clone(),
                    source,
                })
            }
            Err(_) => {
                return Err(ConversionError::Timeout {
                    path: PathBuf::from(&self.program),
                    timeout: self.timeout,
                })
            }
        };
        if !output.status.success() {
            return Err(ConversionError::PandocFailed {
                path: PathBuf::from(&self.program),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let version = String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();
        info!("Using {}", version);
        Ok(version)
    }

    /// A usable reference template is an existing `.docx` file.
    pub fn validate_template(path: &Path) -> Result<(), ConversionError> {
        let invalid = |reason: &str| ConversionError::InvalidTemplate {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };

        if !path.exists() {
            return Err(invalid("file does not exist"));
        }
        if !path.is_file() {
            return Err(invalid("not a regular file"));
        }
        let is_docx = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("docx"));
        if !is_docx {
            return Err(invalid("expected a .docx file"));
        }
        Ok(())
    }

    fn arguments(
        &self,
        input: &Path,
        output: &Path,
        format: ConversionFormat,
    ) -> Result<Vec<String>, ConversionError> {
        let mut args = vec![
            input.to_string_lossy().to_string(),
            "-o".to_string(),
            output.to_string_lossy().to_string(),
            "--wrap=none".to_string(),
        ];

        match format {
            ConversionFormat::DocxToMd => {
                args.push("--to=markdown".to_string());
                if self.extract_media {
                    let media = output
                        .parent()
                        .map(|p| p.join("media"))
                        .unwrap_or_else(|| PathBuf::from("media"));
                    args.push(format!("--extract-media={}", media.to_string_lossy()));
                }
            }
            ConversionFormat::MdToDocx => {
                args.push("--from=markdown".to_string());
                args.push("--to=docx".to_string());
                if let Some(template) = &self.reference_template {
                    Self::validate_template(template)?;
                    args.push(format!("--reference-doc={}", template.to_string_lossy()));
                }
            }
        }
        Ok(args)
    }
}

impl Converter for PandocConverter {
    fn convert(
        &self,
        input: &Path,
        output: &Path,
        format: ConversionFormat,
    ) -> Result<(), ConversionError> {
        if !input.is_file() {
            return Err(ConversionError::MissingInput(input.to_path_buf()));
        }

        let args = self.arguments(input, output, format)?;
        debug!("{} {}", self.program, args.join(" "));

        let result = self.runtime.block_on(async {
            let mut cmd = TokioCommand::new(&self.program);
            cmd.args(&args)
                .stdout(Stdio::null())
                .stderr(Stdio::piped())
                .kill_on_drop(true);
            tokio::time::timeout(self.timeout, cmd.output()).await
        });

        match result {
            Ok(Ok(out)) if out.status.success() => Ok(()),
            Ok(Ok(out)) => Err(ConversionError::PandocFailed {
                path: input.to_path_buf(),
                code: out.status.code(),
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            }),
            Ok(Err(source)) => Err(ConversionError::PandocUnavailable {
                program: self.program.clone(),
                source,
            }),
            Err(_) => Err(ConversionError::Timeout {
                path: input.to_path_buf(),
                timeout: self.timeout,
            }),
        }
    }
}
