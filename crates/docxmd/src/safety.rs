//! Decides which files a batch may rewrite.

use std::path::{Component, Path};

use glob::{MatchOptions, Pattern};

use crate::config::SafetyConfig;
use crate::error::ConfigError;

/// Predicate consulted by the batch runner before a file is queued.
pub trait ProtectionPolicy: Send + Sync {
    fn is_protected(&self, path: &Path) -> bool;
}

impl<F> ProtectionPolicy for F
where
    F: Fn(&Path) -> bool + Send + Sync,
{
    fn is_protected(&self, path: &Path) -> bool {
        self(path)
    }
}

/// Protects nothing.
pub struct AllowAll;

impl ProtectionPolicy for AllowAll {
    fn is_protected(&self, _path: &Path) -> bool {
        false
    }
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Config-driven policy: protected directory names anywhere in the path and
/// glob patterns on the file name.
#[derive(Debug, Clone)]
pub struct SafetyPolicy {
    protected_directories: Vec<String>,
    protected_files: Vec<Pattern>,
    safe_directories: Vec<String>,
}

impl SafetyPolicy {
    pub fn from_config(config: &SafetyConfig) -> Result<Self, ConfigError> {
        let protected_files = config
            .protected_files
            .iter()
            .map(|glob| {
                Pattern::new(glob).map_err(|e| ConfigError::InvalidPattern {
                    name: glob.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            protected_directories: lowercase_all(&config.protected_directories),
            protected_files,
            safe_directories: lowercase_all(&config.safe_directories),
        })
    }

    /// True when `dir` contains one of the configured safe components, or
    /// lies under the system temporary directory.
    pub fn is_safe_directory(&self, dir: &Path) -> bool {
        if dir.starts_with(std::env::temp_dir()) {
            return true;
        }
        components(dir).any(|c| self.safe_directories.contains(&c))
    }
}

impl ProtectionPolicy for SafetyPolicy {
    fn is_protected(&self, path: &Path) -> bool {
        let parent_protected = path
            .parent()
            .map(|parent| components(parent).any(|c| self.protected_directories.contains(&c)))
            .unwrap_or(false);
        if parent_protected {
            return true;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        self.protected_files
            .iter()
            .any(|pattern| pattern.matches_with(name, MATCH_OPTIONS))
    }
}

fn lowercase_all(values: &[String]) -> Vec<String> {
    values.iter().map(|v| v.to_lowercase()).collect()
}

fn components(path: &Path) -> impl Iterator<Item = String> + '_ {
    path.components().filter_map(|c| match c {
        Component::Normal(name) => Some(name.to_string_lossy().to_lowercase()),
        _ => None,
    })
}
