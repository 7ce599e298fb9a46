use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::cleaner::DocumentText;
use crate::patterns::{DocumentType, SectionSpec, CATCH_ALL_SECTION};

static RE_NUMBERING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})((?:\.\d+)+)?\.?\s+").unwrap());
static RE_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\p{L}+(?:-\p{L}+)*").unwrap());

/// Plain, undecorated lines longer than this are never headings.
const MAX_PLAIN_HEADING_WORDS: usize = 6;
/// Words a decorated heading may carry beyond the matched alias.
const MAX_EXTRA_HEADING_WORDS: usize = 4;

/// Lower-cased words of `text` (letters, with inner hyphens).
pub fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    RE_WORD.find_iter(text).map(|m| m.as_str().to_lowercase())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub name: String,
    pub paragraphs: Vec<String>,
    /// Source line of the heading that first opened the section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
}

impl Section {
    fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            paragraphs: Vec::new(),
            heading: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    pub fn is_catch_all(&self) -> bool {
        self.name == CATCH_ALL_SECTION
    }

    pub fn word_count(&self) -> usize {
        self.paragraphs.iter().map(|p| words(p).count()).sum()
    }

    pub fn text(&self) -> String {
        self.paragraphs.join("\n")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadingStyle {
    Upper,
    Capitalized,
    Lower,
}

impl HeadingStyle {
    fn of(text: &str) -> Self {
        let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
        if letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()) {
            HeadingStyle::Upper
        } else if letters.first().is_some_and(|c| c.is_uppercase()) {
            HeadingStyle::Capitalized
        } else {
            HeadingStyle::Lower
        }
    }
}

/// A line that looks like a heading, with decorations stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Lower-cased text without markers, numbering or trailing punctuation.
    pub text: String,
    /// Top-level section number, if the heading was numbered.
    pub number: Option<u32>,
    /// Written as a Markdown heading (`#`).
    pub markdown: bool,
    /// Markdown heading or fully emphasised line.
    pub decorated: bool,
    pub style: HeadingStyle,
}

impl Heading {
    pub fn parse(line: &str) -> Option<Self> {
        let mut rest = line.trim();
        let mut markdown = false;
        let mut emphasised = false;

        if rest.starts_with('#') {
            rest = rest.trim_start_matches('#').trim();
            markdown = true;
        }
        if let Some(inner) = strip_emphasis(rest) {
            rest = inner;
            emphasised = true;
        }

        let mut number = None;
        if let Some(caps) = RE_NUMBERING.captures(rest) {
            // "3.1." starts a numbered paragraph, not a section.
            if caps.get(2).is_some() && !markdown && !emphasised {
                return None;
            }
            number = caps.get(1).and_then(|m| m.as_str().parse().ok());
            rest = &rest[caps.get(0).map_or(0, |m| m.end())..];
        }
        if let Some(inner) = strip_emphasis(rest) {
            rest = inner;
            emphasised = true;
        }

        let rest = rest
            .trim()
            .trim_end_matches(|c| c == ':' || c == '.')
            .trim_end_matches("**")
            .trim();
        if rest.is_empty() {
            return None;
        }

        let text = normalise(rest);
        let decorated = markdown || emphasised;
        if !decorated && text.split_whitespace().count() > MAX_PLAIN_HEADING_WORDS {
            return None;
        }

        Some(Self {
            text,
            number,
            markdown,
            decorated,
            style: HeadingStyle::of(rest),
        })
    }

    /// Plain lines, numbered or not, must equal the alias; decorated
    /// headings may continue after it ("Права работника") up to a few words.
    fn matches_alias(&self, alias: &str) -> bool {
        if self.text == alias {
            return true;
        }
        if !self.decorated {
            return false;
        }
        let Some(tail) = self.text.strip_prefix(alias) else {
            return false;
        };
        let continues_word = tail.chars().next().is_some_and(|c| c.is_alphanumeric());
        let extra_words = tail.split_whitespace().count();
        !continues_word && extra_words <= MAX_EXTRA_HEADING_WORDS
    }
}

fn strip_emphasis(text: &str) -> Option<&str> {
    for marker in ["**", "__"] {
        if text.len() > marker.len() * 2 && text.starts_with(marker) && text.ends_with(marker) {
            return Some(text[marker.len()..text.len() - marker.len()].trim());
        }
    }
    None
}

fn normalise(text: &str) -> String {
    text.to_lowercase()
        .replace('ё', "е")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Longest alias wins, so "должностные обязанности" beats "обязанности".
fn match_section(heading: &Heading, specs: &'static [SectionSpec]) -> Option<&'static SectionSpec> {
    let mut best: Option<(&'static SectionSpec, usize)> = None;
    for spec in specs {
        for alias in spec.aliases {
            if heading.matches_alias(alias) && best.map_or(true, |(_, len)| alias.len() > len) {
                best = Some((spec, alias.len()));
            }
        }
    }
    best.map(|(spec, _)| spec)
}

/// Splits cleaned text into the canonical sections of a document type.
#[derive(Debug, Default, Clone, Copy)]
pub struct SectionSegmenter;

impl SectionSegmenter {
    pub fn new() -> Self {
        Self
    }

    /// Returns one section per canonical name of `doc_type`, in order of
    /// first occurrence, followed by the canonical sections that never
    /// appeared (empty, in canonical order). Text outside any recognised
    /// section lands in the catch-all, which is only kept when it has
    /// content or is itself canonical.
    pub fn segment(&self, text: &DocumentText, doc_type: DocumentType) -> Vec<Section> {
        let specs = doc_type.sections();
        let catch_all_alias = normalise(CATCH_ALL_SECTION);
        let mut sections: Vec<Section> = Vec::new();
        let mut current: Option<usize> = None;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(heading) = Heading::parse(line) {
                if let Some(spec) = match_section(&heading, specs) {
                    current = Some(open_section(&mut sections, spec.name, Some(line)));
                    continue;
                }
                if heading.text == catch_all_alias {
                    current = Some(open_section(&mut sections, CATCH_ALL_SECTION, Some(line)));
                    continue;
                }
                if heading.markdown {
                    let idx = open_section(&mut sections, CATCH_ALL_SECTION, None);
                    sections[idx].paragraphs.push(line.to_string());
                    current = Some(idx);
                    continue;
                }
            }

            let idx = match current {
                Some(idx) => idx,
                None => {
                    let idx = open_section(&mut sections, CATCH_ALL_SECTION, None);
                    current = Some(idx);
                    idx
                }
            };
            sections[idx].paragraphs.push(line.to_string());
        }

        for spec in specs {
            if !sections.iter().any(|s| s.name == spec.name) {
                sections.push(Section::empty(spec.name));
            }
        }

        let keep_empty_catch_all = doc_type.is_catch_all_canonical();
        sections.retain(|s| !s.is_catch_all() || keep_empty_catch_all || !s.is_empty());
        sections
    }
}

/// Number of canonical (non catch-all) sections that were opened by a
/// heading in the source.
pub fn recognised_headings(sections: &[Section]) -> usize {
    sections
        .iter()
        .filter(|s| !s.is_catch_all() && s.heading.is_some())
        .count()
}

/// True when `line` would open a canonical section of `doc_type`.
pub fn is_section_heading(line: &str, doc_type: DocumentType) -> bool {
    Heading::parse(line).is_some_and(|h| match_section(&h, doc_type.sections()).is_some())
}

fn open_section(sections: &mut Vec<Section>, name: &str, heading: Option<&str>) -> usize {
    if let Some(idx) = sections.iter().position(|s| s.name == name) {
        if sections[idx].heading.is_none() {
            sections[idx].heading = heading.map(str::to_string);
        }
        return idx;
    }
    let mut section = Section::empty(name);
    section.heading = heading.map(str::to_string);
    sections.push(section);
    sections.len() - 1
}
