//! Removal of conversion artifacts and whitespace normalisation.
//!
//! The cleaner runs every rule of the [`PatternLibrary`] exactly once, in
//! declared order, so cleaning must stay idempotent through ordering alone:
//! `clean(clean(x)) == clean(x)`. The built-in table runs escape handling,
//! then the hyphenation join, then inline markup and text removals before
//! whole-line removals, and whitespace normalisation last. A second join
//! follows whitespace normalisation for words split around a removed
//! artifact.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::trace;

use crate::patterns::PatternLibrary;

/// Cleaned document text. Only the cleaner constructs it, and nothing
/// mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DocumentText(String);

impl DocumentText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.0.lines()
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DocumentText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub struct ArtifactCleaner {
    library: Arc<PatternLibrary>,
}

impl ArtifactCleaner {
    pub fn new(library: Arc<PatternLibrary>) -> Self {
        Self { library }
    }

    pub fn clean(&self, raw: &str) -> DocumentText {
        let mut text = raw.replace("\r\n", "\n").replace('\r', "\n");

        for rule in self.library.rules() {
            let updated = match rule.apply(&text) {
                Cow::Owned(updated) => Some(updated),
                Cow::Borrowed(_) => None,
            };
            if let Some(updated) = updated {
                trace!(rule = %rule.id, "artifact rule changed text");
                text = updated;
            }
        }

        DocumentText(text)
    }
}
