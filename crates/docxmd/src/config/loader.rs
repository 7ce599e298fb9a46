use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::schema::{ArtifactRule, Config};
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../schema/config-v1.json");
const DEFAULT_ARTIFACTS_JSON: &str = include_str!("../../defaults/artifacts.json");

/// Loads a configuration file. `.yaml`/`.yml` files are parsed as YAML,
/// everything else as JSON; both go through the same schema validation.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);

    if is_yaml {
        load_config_from_yaml_str(&content)
    } else {
        load_config_from_str(&content)
    }
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;
    load_config_from_value(json_value)
}

pub fn load_config_from_yaml_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = serde_yaml::from_str(content)?;
    load_config_from_value(json_value)
}

/// Configuration used when no file is given: every default, built-in rules.
pub fn load_default_config() -> Result<Config, ConfigError> {
    load_config_from_str(r#"{"version": "1.0"}"#)
}

/// The built-in artifact rule table.
pub fn default_artifact_rules() -> Result<Vec<ArtifactRule>, ConfigError> {
    Ok(serde_json::from_str(DEFAULT_ARTIFACTS_JSON)?)
}

/// `~/.docxmd/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".docxmd").join("config.json"))
}

fn load_config_from_value(json_value: serde_json::Value) -> Result<Config, ConfigError> {
    validate_schema(&json_value)?;

    let mut config: Config = serde_json::from_value(json_value)?;

    if config.artifacts.is_empty() {
        config.artifacts = default_artifact_rules()?;
    }

    validate_config(&config)?;

    Ok(config)
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();

    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    let mut rule_ids = HashSet::new();
    for rule in &config.artifacts {
        if !rule_ids.insert(rule.id.as_str()) {
            return Err(ConfigError::InvalidRule {
                id: rule.id.clone(),
                reason: "Duplicate rule ID".to_string(),
            });
        }

        if let Err(e) = regex::Regex::new(&rule.pattern) {
            return Err(ConfigError::InvalidRule {
                id: rule.id.clone(),
                reason: format!("Invalid regex pattern: {}", e),
            });
        }
    }

    validate_scoring(config)?;

    for group in &config.terminology {
        if group.variants.len() < 2 {
            return Err(ConfigError::InvalidPattern {
                name: group.concept.clone(),
                reason: "A terminology group needs at least two variants".to_string(),
            });
        }
    }

    for pattern in &config.safety.protected_files {
        if let Err(e) = glob::Pattern::new(pattern) {
            return Err(ConfigError::InvalidPattern {
                name: pattern.clone(),
                reason: e.to_string(),
            });
        }
    }

    Ok(())
}

fn validate_scoring(config: &Config) -> Result<(), ConfigError> {
    let scoring = &config.scoring;
    let weights = scoring.weights;

    if (weights.sum() - 1.0).abs() > 1e-6 {
        return Err(ConfigError::Validation {
            message: format!("Score weights must sum to 1.0, got {:.4}", weights.sum()),
        });
    }

    if scoring.medium_min_sections > scoring.high_min_sections {
        return Err(ConfigError::Validation {
            message: format!(
                "medium_min_sections ({}) exceeds high_min_sections ({})",
                scoring.medium_min_sections, scoring.high_min_sections
            ),
        });
    }

    if scoring.keyword_saturation == 0 || scoring.content_word_target == 0 {
        return Err(ConfigError::Validation {
            message: "keyword_saturation and content_word_target must be positive".to_string(),
        });
    }

    if scoring.min_vocabulary_richness <= 0.0 {
        return Err(ConfigError::Validation {
            message: "min_vocabulary_richness must be positive".to_string(),
        });
    }

    Ok(())
}
