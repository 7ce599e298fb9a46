pub mod loader;
pub mod schema;

pub use loader::{
    default_artifact_rules, default_config_path, load_config, load_config_from_str,
    load_config_from_yaml_str, load_default_config,
};
pub use schema::{
    ArtifactRule, Config, ConversionConfig, SafetyConfig, ScoreWeights, ScoringConfig, TermGroup,
};
