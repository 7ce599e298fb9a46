use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::cleaner::DocumentText;
use crate::patterns::DocumentType;
use crate::sanitize;
use crate::segmenter::is_section_heading;

static RE_JOB_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[#*_\s]*должностн\w*\s+инструкци\w*[\s:\-–—]*(.*?)[*_\s]*$").unwrap()
});
static RE_BOLD_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*([^*]{3,80})\*\*$").unwrap());
static RE_FILE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^пр[\s_\-]+").unwrap());

/// Only the head of the document is searched for a job title.
const TITLE_SEARCH_LINES: usize = 15;
const MAX_POSITION_WORDS: usize = 8;

pub const DEFAULT_POSITION: &str = "Специалист";
pub const DEFAULT_DEPARTMENT: &str = "общий_отдел";

/// Directory names that say nothing about the owning department.
const NON_DEPARTMENT_DIRS: &[&str] = &["docs", "documents", "markdown", "converted", "src", "dst"];

/// Bold lines that are approval stamps rather than job titles.
const STAMP_WORDS: &[&str] = &["утверждаю", "утверждено", "согласовано", "приложение"];

/// Position named by the document, in order of preference: a "должностная
/// инструкция ..." title line, a bold line near the top that is not a
/// section heading, then the file name.
pub fn extract_position(text: &DocumentText, source: &Path, doc_type: DocumentType) -> String {
    let head: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(TITLE_SEARCH_LINES)
        .collect();

    let from_title = head.iter().find_map(|line| {
        RE_JOB_TITLE
            .captures(line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim())
            .filter(|p| is_plausible_position(p))
    });
    if let Some(position) = from_title {
        return capitalise(position);
    }

    let from_bold = head.iter().find_map(|line| {
        let inner = RE_BOLD_LINE.captures(line)?.get(1)?.as_str().trim();
        let lower = inner.to_lowercase();
        let is_stamp = STAMP_WORDS.iter().any(|w| lower.starts_with(w));
        if is_stamp || is_section_heading(line, doc_type) || !is_plausible_position(inner) {
            return None;
        }
        Some(inner.trim_end_matches(|c| c == ':' || c == '.'))
    });
    if let Some(position) = from_bold {
        return capitalise(position);
    }

    position_from_file_name(source).unwrap_or_else(|| DEFAULT_POSITION.to_string())
}

fn position_from_file_name(source: &Path) -> Option<String> {
    let stem = source.file_stem()?.to_str()?;
    let stem = RE_FILE_PREFIX.replace(stem, "");
    let cleaned = stem.replace('_', " ");
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.chars().any(char::is_alphabetic) {
        Some(capitalise(&cleaned))
    } else {
        None
    }
}

fn is_plausible_position(text: &str) -> bool {
    let words = text.split_whitespace().count();
    words > 0 && words <= MAX_POSITION_WORDS && text.chars().any(char::is_alphabetic)
}

fn capitalise(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Department slug taken from the nearest meaningful parent directory.
pub fn extract_department(source: &Path) -> String {
    source
        .parent()
        .into_iter()
        .flat_map(Path::ancestors)
        .filter_map(|dir| dir.file_name().and_then(|n| n.to_str()))
        .find(|name| !NON_DEPARTMENT_DIRS.contains(&name.to_lowercase().as_str()))
        .map(sanitize::slug)
        .filter(|slug| !slug.is_empty())
        .unwrap_or_else(|| DEFAULT_DEPARTMENT.to_string())
}
