use serde::{Deserialize, Serialize};

/// Top-level configuration file.
///
/// Everything except `version` has a default, so `{"version": "1.0"}` is a
/// complete configuration. An empty `artifacts` list is replaced by the
/// built-in rule table when the file is loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    /// Number of worker threads for batch runs; `0` means one per CPU.
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
    /// Ordered cleanup rules, applied once each in declared order.
    #[serde(default)]
    pub artifacts: Vec<ArtifactRule>,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default = "default_terminology")]
    pub terminology: Vec<TermGroup>,
    #[serde(default)]
    pub safety: SafetyConfig,
    #[serde(default)]
    pub conversion: ConversionConfig,
}

fn default_worker_count() -> usize {
    1
}

impl Config {
    pub fn effective_worker_count(&self) -> usize {
        if self.worker_count == 0 {
            num_cpus::get()
        } else {
            self.worker_count
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactRule {
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub pattern: String,
    #[serde(default)]
    pub replacement: String,
}

/// Relative weight of each sub-score in the overall quality score.
/// The loader rejects weights that do not sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    #[serde(default = "default_structure_weight")]
    pub structure: f64,
    #[serde(default = "default_content_weight")]
    pub content: f64,
    #[serde(default = "default_consistency_weight")]
    pub consistency: f64,
    #[serde(default = "default_completeness_weight")]
    pub completeness: f64,
}

fn default_structure_weight() -> f64 {
    0.25
}

fn default_content_weight() -> f64 {
    0.35
}

fn default_consistency_weight() -> f64 {
    0.20
}

fn default_completeness_weight() -> f64 {
    0.20
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            structure: default_structure_weight(),
            content: default_content_weight(),
            consistency: default_consistency_weight(),
            completeness: default_completeness_weight(),
        }
    }
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.structure + self.content + self.consistency + self.completeness
    }
}

/// Every tunable heuristic of classification and quality assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub weights: ScoreWeights,
    /// Best keyword score below this falls back to the generic type.
    #[serde(default = "default_classification_threshold")]
    pub classification_threshold: f64,
    /// Occurrences of a single keyword counted towards the type score.
    #[serde(default = "default_keyword_saturation")]
    pub keyword_saturation: usize,
    /// A section needs more words than this to count as filled.
    #[serde(default = "default_min_section_words")]
    pub min_section_words: usize,
    /// Word count at which the length part of the content score saturates.
    #[serde(default = "default_content_word_target")]
    pub content_word_target: usize,
    /// Unique/total word ratio at which the diversity part saturates.
    #[serde(default = "default_min_vocabulary_richness")]
    pub min_vocabulary_richness: f64,
    /// Sub-scores below this produce recommendations.
    #[serde(default = "default_recommendation_threshold")]
    pub recommendation_threshold: f64,
    /// Completeness below this is reported as a critical issue.
    #[serde(default = "default_completeness_floor")]
    pub completeness_floor: f64,
    /// Documents with fewer words are reported as a critical issue.
    #[serde(default = "default_critical_min_words")]
    pub critical_min_words: usize,
    #[serde(default = "default_high_min_sections")]
    pub high_min_sections: usize,
    #[serde(default = "default_medium_min_sections")]
    pub medium_min_sections: usize,
    #[serde(default = "default_terminology_penalty")]
    pub terminology_penalty: f64,
    #[serde(default = "default_max_terminology_penalty")]
    pub max_terminology_penalty: f64,
    #[serde(default = "default_numbering_penalty")]
    pub numbering_penalty: f64,
    #[serde(default = "default_mixed_numbering_penalty")]
    pub mixed_numbering_penalty: f64,
    #[serde(default = "default_heading_case_penalty")]
    pub heading_case_penalty: f64,
}

fn default_classification_threshold() -> f64 {
    0.1
}

fn default_keyword_saturation() -> usize {
    2
}

fn default_min_section_words() -> usize {
    5
}

fn default_content_word_target() -> usize {
    300
}

fn default_min_vocabulary_richness() -> f64 {
    0.3
}

fn default_recommendation_threshold() -> f64 {
    0.7
}

fn default_completeness_floor() -> f64 {
    0.25
}

fn default_critical_min_words() -> usize {
    20
}

fn default_high_min_sections() -> usize {
    4
}

fn default_medium_min_sections() -> usize {
    2
}

fn default_terminology_penalty() -> f64 {
    0.1
}

fn default_max_terminology_penalty() -> f64 {
    0.3
}

fn default_numbering_penalty() -> f64 {
    0.3
}

fn default_mixed_numbering_penalty() -> f64 {
    0.1
}

fn default_heading_case_penalty() -> f64 {
    0.1
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            classification_threshold: default_classification_threshold(),
            keyword_saturation: default_keyword_saturation(),
            min_section_words: default_min_section_words(),
            content_word_target: default_content_word_target(),
            min_vocabulary_richness: default_min_vocabulary_richness(),
            recommendation_threshold: default_recommendation_threshold(),
            completeness_floor: default_completeness_floor(),
            critical_min_words: default_critical_min_words(),
            high_min_sections: default_high_min_sections(),
            medium_min_sections: default_medium_min_sections(),
            terminology_penalty: default_terminology_penalty(),
            max_terminology_penalty: default_max_terminology_penalty(),
            numbering_penalty: default_numbering_penalty(),
            mixed_numbering_penalty: default_mixed_numbering_penalty(),
            heading_case_penalty: default_heading_case_penalty(),
        }
    }
}

/// Several spellings of one concept; using more than one of them in a
/// document counts as inconsistent terminology. Variants are word stems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermGroup {
    pub concept: String,
    pub variants: Vec<String>,
}

impl TermGroup {
    fn new(concept: &str, variants: &[&str]) -> Self {
        Self {
            concept: concept.to_string(),
            variants: variants.iter().map(|v| v.to_string()).collect(),
        }
    }
}

fn default_terminology() -> Vec<TermGroup> {
    vec![
        TermGroup::new("работник", &["работник", "сотрудник", "служащ"]),
        TermGroup::new("руководитель", &["руководител", "начальник"]),
        TermGroup::new(
            "организация",
            &["организаци", "предприяти", "учреждени", "компани"],
        ),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyConfig {
    /// Path components that put a file out of reach of the batch runner.
    #[serde(default = "default_protected_directories")]
    pub protected_directories: Vec<String>,
    /// Case-insensitive glob patterns matched against the file name.
    #[serde(default = "default_protected_files")]
    pub protected_files: Vec<String>,
    /// Batch roots must contain one of these path components unless forced.
    #[serde(default = "default_safe_directories")]
    pub safe_directories: Vec<String>,
}

fn default_protected_directories() -> Vec<String> {
    [
        "documentation_management",
        ".git",
        ".github",
        "__pycache__",
        "venv",
        ".venv",
        "node_modules",
        "target",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_protected_files() -> Vec<String> {
    ["README*", "CHANGELOG*", "LICENSE*", "CONTRIBUTING*"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_safe_directories() -> Vec<String> {
    ["Conversion", "converted", "documents", "markdown", "temp", "test"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            protected_directories: default_protected_directories(),
            protected_files: default_protected_files(),
            safe_directories: default_safe_directories(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    #[serde(default = "default_pandoc_path")]
    pub pandoc_path: String,
    /// Per-file limit for a single Pandoc run.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Extract embedded media next to the Markdown output.
    #[serde(default = "default_true")]
    pub extract_media: bool,
    /// Reference DOCX used for Markdown to DOCX conversion.
    #[serde(default)]
    pub reference_template: Option<String>,
}

fn default_pandoc_path() -> String {
    "pandoc".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_true() -> bool {
    true
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            pandoc_path: default_pandoc_path(),
            timeout_secs: default_timeout_secs(),
            extract_media: true,
            reference_template: None,
        }
    }
}
