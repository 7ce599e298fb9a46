//! DOCX and Markdown conversion through an external converter.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{info, warn};
use serde::Serialize;
use walkdir::WalkDir;

use crate::error::ConversionError;

pub mod pandoc;

pub use pandoc::PandocConverter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConversionFormat {
    #[serde(rename = "docx2md")]
    DocxToMd,
    #[serde(rename = "md2docx")]
    MdToDocx,
}

impl ConversionFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionFormat::DocxToMd => "docx2md",
            ConversionFormat::MdToDocx => "md2docx",
        }
    }

    pub fn source_extension(&self) -> &'static str {
        match self {
            ConversionFormat::DocxToMd => "docx",
            ConversionFormat::MdToDocx => "md",
        }
    }

    pub fn target_extension(&self) -> &'static str {
        match self {
            ConversionFormat::DocxToMd => "md",
            ConversionFormat::MdToDocx => "docx",
        }
    }

    /// Directory holding the Markdown side of a conversion.
    pub fn markdown_side<'a>(&self, src: &'a Path, dst: &'a Path) -> &'a Path {
        match self {
            ConversionFormat::DocxToMd => dst,
            ConversionFormat::MdToDocx => src,
        }
    }
}

impl FromStr for ConversionFormat {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "docx2md" => Ok(ConversionFormat::DocxToMd),
            "md2docx" => Ok(ConversionFormat::MdToDocx),
            other => Err(ConversionError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ConversionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait Converter: Send + Sync {
    fn convert(
        &self,
        input: &Path,
        output: &Path,
        format: ConversionFormat,
    ) -> Result<(), ConversionError>;
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversionFailure {
    pub path: PathBuf,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionSummary {
    pub converted: usize,
    pub total: usize,
    pub outputs: Vec<PathBuf>,
    pub failures: Vec<ConversionFailure>,
}

impl ConversionSummary {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Converts every source file below `src` into `dst`, mirroring the
/// relative directory layout. Per-file failures are collected, not fatal.
pub fn convert_directory(
    converter: &dyn Converter,
    src: &Path,
    dst: &Path,
    format: ConversionFormat,
) -> Result<ConversionSummary, ConversionError> {
    if !src.is_dir() {
        return Err(ConversionError::MissingSource(src.to_path_buf()));
    }

    let sources = find_sources(src, format);
    let mut summary = ConversionSummary {
        total: sources.len(),
        ..ConversionSummary::default()
    };
    if sources.is_empty() {
        warn!(
            "No .{} files found in {}",
            format.source_extension(),
            src.display()
        );
        return Ok(summary);
    }

    for input in sources {
        let relative = input.strip_prefix(src).unwrap_or(&input);
        let output = dst.join(relative).with_extension(format.target_extension());

        let result = match output.parent() {
            Some(parent) => std::fs::create_dir_all(parent).map_err(|source| {
                ConversionError::CreateDirectory {
                    path: parent.to_path_buf(),
                    source,
                }
            }),
            None => Ok(()),
        }
        .and_then(|_| converter.convert(&input, &output, format));

        match result {
            Ok(()) => {
                info!("Converted {} -> {}", input.display(), output.display());
                summary.converted += 1;
                summary.outputs.push(output);
            }
            Err(e) => {
                warn!("Failed to convert {}: {}", input.display(), e);
                summary.failures.push(ConversionFailure {
                    path: input.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    info!(
        "Converted {}/{} files from {}",
        summary.converted,
        summary.total,
        src.display()
    );
    Ok(summary)
}

fn find_sources(src: &Path, format: ConversionFormat) -> Vec<PathBuf> {
    WalkDir::new(src)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(format.source_extension()))
        })
        // Word lock files such as "~$report.docx"
        .filter(|p| {
            !p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("~$"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Copies input to output, failing on names containing "broken".
    struct CopyConverter;

    impl Converter for CopyConverter {
        fn convert(
            &self,
            input: &Path,
            output: &Path,
            _format: ConversionFormat,
        ) -> Result<(), ConversionError> {
            if input.to_string_lossy().contains("broken") {
                return Err(ConversionError::PandocFailed {
                    path: input.to_path_buf(),
                    code: Some(64),
                    stderr: "cannot parse".to_string(),
                });
            }
            std::fs::copy(input, output).map(|_| ()).map_err(ConversionError::Runtime)
        }
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("docx2md".parse::<ConversionFormat>().unwrap(), ConversionFormat::DocxToMd);
        assert_eq!(" MD2DOCX ".parse::<ConversionFormat>().unwrap(), ConversionFormat::MdToDocx);
        assert!(matches!(
            "pdf2md".parse::<ConversionFormat>(),
            Err(ConversionError::UnknownFormat(f)) if f == "pdf2md"
        ));
        assert_eq!(ConversionFormat::MdToDocx.to_string(), "md2docx");
    }

    #[test]
    fn test_convert_directory_preserves_layout() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        std::fs::create_dir_all(src.path().join("отдел/кадры")).unwrap();
        std::fs::write(src.path().join("a.docx"), "a").unwrap();
        std::fs::write(src.path().join("отдел/кадры/b.docx"), "b").unwrap();
        std::fs::write(src.path().join("~$a.docx"), "lock").unwrap();
        std::fs::write(src.path().join("notes.md"), "ignored").unwrap();

        let summary =
            convert_directory(&CopyConverter, src.path(), dst.path(), ConversionFormat::DocxToMd)
                .unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.converted, 2);
        assert!(summary.is_complete());
        assert!(dst.path().join("a.md").exists());
        assert!(dst.path().join("отдел/кадры/b.md").exists());
    }

    #[test]
    fn test_failures_are_collected() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        std::fs::write(src.path().join("ok.md"), "ok").unwrap();
        std::fs::write(src.path().join("broken.md"), "x").unwrap();

        let summary =
            convert_directory(&CopyConverter, src.path(), dst.path(), ConversionFormat::MdToDocx)
                .unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.converted, 1);
        assert_eq!(summary.failures.len(), 1);
        assert!(summary.failures[0].path.ends_with("broken.md"));
        assert!(dst.path().join("ok.docx").exists());
    }

    #[test]
    fn test_missing_source_directory() {
        let dst = TempDir::new().unwrap();
        let result = convert_directory(
            &CopyConverter,
            &dst.path().join("absent"),
            dst.path(),
            ConversionFormat::DocxToMd,
        );
        assert!(matches!(result, Err(ConversionError::MissingSource(_))));
    }

    #[test]
    fn test_markdown_side() {
        let (src, dst) = (Path::new("/in"), Path::new("/out"));
        assert_eq!(ConversionFormat::DocxToMd.markdown_side(src, dst), dst);
        assert_eq!(ConversionFormat::MdToDocx.markdown_side(src, dst), src);
    }
}
