use std::sync::Arc;

use serde::Serialize;

use crate::cleaner::DocumentText;
use crate::config::ScoringConfig;
use crate::patterns::{DocumentType, PatternLibrary};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeScore {
    pub document_type: DocumentType,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub document_type: DocumentType,
    /// Winning score in [0, 1]; `0.0` for the generic fallback.
    pub confidence: f64,
    /// Scores of every candidate type, in declaration order.
    pub scores: Vec<TypeScore>,
}

impl Classification {
    pub fn is_fallback(&self) -> bool {
        self.document_type == DocumentType::Generic
    }
}

pub struct DocumentTypeClassifier {
    library: Arc<PatternLibrary>,
    threshold: f64,
    saturation: usize,
}

impl DocumentTypeClassifier {
    pub fn new(library: Arc<PatternLibrary>, scoring: &ScoringConfig) -> Self {
        Self {
            library,
            threshold: scoring.classification_threshold,
            saturation: scoring.keyword_saturation.max(1),
        }
    }

    /// Picks the candidate type with the highest keyword score. Exact ties go
    /// to the type declared first; a best score under the threshold yields
    /// `Generic` with zero confidence.
    pub fn classify(&self, text: &DocumentText) -> Classification {
        let scores: Vec<TypeScore> = DocumentType::CANDIDATES
            .iter()
            .map(|&document_type| TypeScore {
                document_type,
                score: self.score(document_type, text.as_str()),
            })
            .collect();

        let mut best: Option<&TypeScore> = None;
        for candidate in &scores {
            match best {
                Some(current) if candidate.score <= current.score => {}
                _ => best = Some(candidate),
            }
        }

        match best {
            Some(winner) if winner.score > 0.0 && winner.score >= self.threshold => {
                Classification {
                    document_type: winner.document_type,
                    confidence: winner.score,
                    scores,
                }
            }
            _ => Classification {
                document_type: DocumentType::Generic,
                confidence: 0.0,
                scores,
            },
        }
    }

    fn score(&self, document_type: DocumentType, text: &str) -> f64 {
        let keywords = self.library.keywords(document_type);
        if keywords.is_empty() {
            return 0.0;
        }

        let saturation = self.saturation as f64;
        let total: f64 = keywords
            .iter()
            .map(|k| k.count(text).min(self.saturation) as f64 / saturation)
            .sum();

        total / keywords.len() as f64
    }
}
