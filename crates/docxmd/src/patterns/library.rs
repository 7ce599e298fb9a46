use std::borrow::Cow;

use regex::Regex;

use crate::config::schema::{ArtifactRule, Config, TermGroup};
use crate::error::ConfigError;

use super::document_type::DocumentType;

/// An artifact rule with its regex compiled.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub id: String,
    regex: Regex,
    replacement: String,
}

impl CompiledRule {
    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.regex.replace_all(text, self.replacement.as_str())
    }
}

/// Case-insensitive stem matcher anchored at word starts.
#[derive(Debug, Clone)]
pub struct StemMatcher {
    pub stem: String,
    regex: Regex,
}

impl StemMatcher {
    fn compile(stem: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(&stem_pattern(stem)).map_err(|e| ConfigError::InvalidPattern {
            name: stem.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            stem: stem.to_string(),
            regex,
        })
    }

    pub fn count(&self, text: &str) -> usize {
        self.regex.find_iter(text).count()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// `"должностн инструкци"` becomes
/// `(?i)\bдолжностн\w*\s+инструкци\w*`, with `е` also matching `ё`.
fn stem_pattern(stem: &str) -> String {
    let words: Vec<String> = stem
        .split_whitespace()
        .map(|w| format!(r"\b{}\w*", regex::escape(w).replace('е', "[её]")))
        .collect();
    format!("(?i){}", words.join(r"\s+"))
}

#[derive(Debug, Clone)]
pub struct TermMatcher {
    pub concept: String,
    variants: Vec<StemMatcher>,
}

impl TermMatcher {
    /// Variants of this concept that occur in `text`, in declared order.
    pub fn variants_present(&self, text: &str) -> Vec<&str> {
        self.variants
            .iter()
            .filter(|v| v.is_match(text))
            .map(|v| v.stem.as_str())
            .collect()
    }
}

/// Every pattern the pipeline needs, compiled once at startup and shared
/// read-only between workers.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    rules: Vec<CompiledRule>,
    keywords: Vec<(DocumentType, Vec<StemMatcher>)>,
    terminology: Vec<TermMatcher>,
}

impl PatternLibrary {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Self::new(&config.artifacts, &config.terminology)
    }

    pub fn new(rules: &[ArtifactRule], terminology: &[TermGroup]) -> Result<Self, ConfigError> {
        let rules = rules
            .iter()
            .map(|rule| {
                let regex = Regex::new(&rule.pattern).map_err(|e| ConfigError::InvalidRule {
                    id: rule.id.clone(),
                    reason: e.to_string(),
                })?;
                Ok(CompiledRule {
                    id: rule.id.clone(),
                    regex,
                    replacement: rule.replacement.clone(),
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let mut keywords = Vec::with_capacity(DocumentType::CANDIDATES.len());
        for doc_type in DocumentType::CANDIDATES {
            let matchers = doc_type
                .keywords()
                .iter()
                .map(|k| StemMatcher::compile(k))
                .collect::<Result<Vec<_>, _>>()?;
            keywords.push((doc_type, matchers));
        }

        let terminology = terminology
            .iter()
            .map(|group| {
                let variants = group
                    .variants
                    .iter()
                    .map(|v| StemMatcher::compile(v))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(TermMatcher {
                    concept: group.concept.clone(),
                    variants,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Self {
            rules,
            keywords,
            terminology,
        })
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    /// Keyword matchers of a candidate type; empty for `Generic`.
    pub fn keywords(&self, doc_type: DocumentType) -> &[StemMatcher] {
        self.keywords
            .iter()
            .find(|(t, _)| *t == doc_type)
            .map(|(_, m)| m.as_slice())
            .unwrap_or(&[])
    }

    pub fn terminology(&self) -> &[TermMatcher] {
        &self.terminology
    }
}
