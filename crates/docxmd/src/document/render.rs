use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::patterns::{DocumentType, CATCH_ALL_SECTION};
use crate::segmenter::Section;

use super::metadata::strip_footer;

static RE_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^_\(.+\)_$").unwrap());

pub const INFO_HEADING: &str = "## Информация о документе";

const INFO_FIELDS: &[(&str, &str)] = &[
    ("Организация", "наименование организации"),
    ("Утверждено", "подпись, инициалы, фамилия руководителя"),
    ("Дата утверждения", "дата"),
];

fn is_title(line: &str) -> bool {
    line.starts_with("# ")
}

/// Paragraphs of `section` without the leading level-one heading of the
/// catch-all, which the rendered title replaces.
fn body_paragraphs(section: &Section) -> &[String] {
    match section.paragraphs.split_first() {
        Some((first, rest)) if section.is_catch_all() && is_title(first) => rest,
        _ => &section.paragraphs,
    }
}

/// Renders sections in the canonical layout of `doc_type`.
///
/// Canonical sections come first, numbered, in canonical order; an empty
/// one gets a fill-in placeholder. Catch-all content follows under
/// `## Прочее`. A level-one heading opening the document becomes the title
/// (job descriptions get a generated one instead); any later level-one
/// heading stays where it was.
pub fn render_document(doc_type: DocumentType, position: &str, sections: &[Section]) -> String {
    let catch_all = sections.iter().find(|s| s.is_catch_all());
    let source_title = catch_all
        .and_then(|s| s.paragraphs.first())
        .filter(|p| is_title(p));

    let title = match doc_type {
        DocumentType::JobDescription => format!("# {}: {}", doc_type.title(), position),
        _ => source_title
            .cloned()
            .unwrap_or_else(|| format!("# {}", doc_type.title())),
    };

    let mut out = String::new();
    out.push_str(&title);
    out.push_str("\n\n");

    if doc_type == DocumentType::JobDescription {
        out.push_str(INFO_HEADING);
        out.push_str("\n\n");
        for (label, hint) in INFO_FIELDS {
            let _ = write!(out, "**{}:** _({})_\n\n", label, hint);
        }
    }

    for (idx, spec) in doc_type.sections().iter().enumerate() {
        let _ = write!(out, "## {}. {}\n\n", idx + 1, spec.name);
        let paragraphs = sections
            .iter()
            .find(|s| s.name == spec.name)
            .map(body_paragraphs)
            .unwrap_or_default();
        if paragraphs.is_empty() {
            let _ = write!(out, "_(заполните раздел «{}»)_\n\n", spec.name);
        } else {
            push_paragraphs(&mut out, paragraphs);
        }
    }

    if !doc_type.is_catch_all_canonical() {
        let rest = catch_all.map(body_paragraphs).unwrap_or_default();
        if !rest.is_empty() {
            let _ = write!(out, "## {}\n\n", CATCH_ALL_SECTION);
            push_paragraphs(&mut out, rest);
        }
    }

    out.trim_end().to_string()
}

fn push_paragraphs(out: &mut String, paragraphs: &[String]) {
    for paragraph in paragraphs {
        out.push_str(paragraph);
        out.push_str("\n\n");
    }
}

/// Removes what [`render_document`] and the metadata footer add on top of
/// the source content: the footer, the document information block and
/// placeholder lines.
pub fn strip_generated(text: &str) -> String {
    let body = strip_footer(text);
    let mut out: Vec<&str> = Vec::new();
    let mut in_info_block = false;

    for line in body.lines() {
        let trimmed = line.trim();
        if trimmed == INFO_HEADING {
            in_info_block = true;
            continue;
        }
        if in_info_block {
            if trimmed.starts_with('#') {
                in_info_block = false;
            } else {
                continue;
            }
        }
        if RE_PLACEHOLDER.is_match(trimmed) {
            continue;
        }
        out.push(line);
    }

    out.join("\n")
}
