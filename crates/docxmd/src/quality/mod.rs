pub mod assessor;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use assessor::QualityAssessor;

/// Coarse quality label derived from the number of filled canonical sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityBucket {
    High,
    Medium,
    Low,
}

impl QualityBucket {
    pub const ALL: [QualityBucket; 3] = [QualityBucket::High, QualityBucket::Medium, QualityBucket::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityBucket::High => "high",
            QualityBucket::Medium => "medium",
            QualityBucket::Low => "low",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QualityBucket::High => "высокое",
            QualityBucket::Medium => "среднее",
            QualityBucket::Low => "низкое",
        }
    }
}

impl fmt::Display for QualityBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four independent sub-scores, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub structure: f64,
    pub content: f64,
    pub consistency: f64,
    pub completeness: f64,
}

impl SubScores {
    pub const ZERO: SubScores = SubScores {
        structure: 0.0,
        content: 0.0,
        consistency: 0.0,
        completeness: 0.0,
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub scores: SubScores,
    /// Weighted sum of the sub-scores, in [0, 1].
    pub overall: f64,
    pub bucket: QualityBucket,
    pub word_count: usize,
    /// Canonical sections with more than the minimum number of words.
    pub filled_sections: usize,
    pub recommendations: Vec<String>,
    /// Conditions severe enough to suggest a misclassified or broken document.
    pub critical_issues: Vec<String>,
}

impl QualityAssessment {
    pub fn has_critical_issues(&self) -> bool {
        !self.critical_issues.is_empty()
    }
}
