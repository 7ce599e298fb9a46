use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::WorkerError;
use crate::worker::job::Job;

/// Prefix of report files written into batch roots; never queued.
const REPORT_PREFIX: &str = "processing_report";

pub struct DirectoryScanner {
    input_directory: PathBuf,
}

impl DirectoryScanner {
    pub fn new<P: AsRef<Path>>(input_directory: P) -> Self {
        Self {
            input_directory: input_directory.as_ref().to_path_buf(),
        }
    }

    pub fn input_directory(&self) -> &Path {
        &self.input_directory
    }

    /// Collects every Markdown file below the input directory, in file-name
    /// order. Unreadable entries below the root are logged and skipped; only
    /// a failure on the root itself aborts the scan.
    pub fn scan(&self) -> Result<Vec<Job>, WorkerError> {
        if !self.input_directory.is_dir() {
            return Err(WorkerError::MissingDirectory(self.input_directory.clone()));
        }

        let mut jobs = Vec::new();
        for entry in WalkDir::new(&self.input_directory)
            .min_depth(1)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(source) if source.depth() == 0 => {
                    return Err(WorkerError::ScanFailed {
                        path: self.input_directory.clone(),
                        source,
                    });
                }
                Err(err) => {
                    let path = err.path().unwrap_or(self.input_directory.as_path());
                    warn!("Skipping unreadable entry {}: {}", path.display(), err);
                    continue;
                }
            };
            let path = entry.path();

            if !entry.file_type().is_file() || !Job::is_markdown(path) {
                continue;
            }
            if is_report_file(path) {
                debug!("Skipping generated report: {}", path.display());
                continue;
            }

            debug!("Found document: {}", path.display());
            jobs.push(Job::new(path.to_path_buf()));
        }

        info!(
            "Scanned {} Markdown documents in {}",
            jobs.len(),
            self.input_directory.display()
        );
        Ok(jobs)
    }
}

fn is_report_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(REPORT_PREFIX))
}
