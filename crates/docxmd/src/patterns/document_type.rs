use std::fmt;

use serde::{Deserialize, Serialize};

/// Label of the section that receives content outside any canonical section.
pub const CATCH_ALL_SECTION: &str = "Прочее";

/// A canonical section of a document type.
///
/// Aliases are normalised heading texts (lower case, `ё` written as `е`)
/// that open this section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub required: bool,
}

const fn section(
    name: &'static str,
    aliases: &'static [&'static str],
    required: bool,
) -> SectionSpec {
    SectionSpec {
        name,
        aliases,
        required,
    }
}

const JOB_DESCRIPTION_SECTIONS: &[SectionSpec] = &[
    section("Общие положения", &["общие положения"], true),
    section(
        "Функции",
        &["функции", "основные функции", "трудовые функции"],
        false,
    ),
    section(
        "Должностные обязанности",
        &[
            "должностные обязанности",
            "обязанности",
            "обязанности работника",
        ],
        true,
    ),
    section("Права", &["права", "права работника"], true),
    section(
        "Ответственность",
        &["ответственность", "ответственность работника"],
        true,
    ),
    section(
        "Заключительные положения",
        &["заключительные положения"],
        false,
    ),
    section(
        "Согласование и утверждение",
        &[
            "согласование и утверждение",
            "согласование",
            "утверждение",
            "лист ознакомления",
            "ознакомление",
        ],
        false,
    ),
];

const REGULATION_SECTIONS: &[SectionSpec] = &[
    section("Общие положения", &["общие положения"], true),
    section(
        "Основные понятия",
        &[
            "основные понятия",
            "термины и определения",
            "основные термины",
        ],
        true,
    ),
    section("Цели и задачи", &["цели и задачи", "цели", "задачи"], false),
    section("Порядок", &["порядок"], true),
    section("Права и обязанности", &["права и обязанности"], false),
    section("Ответственность", &["ответственность"], false),
    section(
        "Заключительные положения",
        &["заключительные положения"],
        true,
    ),
];

const REPORT_SECTIONS: &[SectionSpec] = &[
    section("Введение", &["введение"], true),
    section("Основная часть", &["основная часть"], false),
    section("Результаты", &["результаты"], true),
    section("Анализ", &["анализ"], false),
    section("Выводы", &["выводы", "заключение"], true),
    section("Приложения", &["приложения", "приложение"], false),
];

const INSTRUCTION_SECTIONS: &[SectionSpec] = &[
    section("Общие положения", &["общие положения"], true),
    section("Требования", &["требования"], false),
    section(
        "Порядок выполнения",
        &["порядок выполнения", "порядок работы", "порядок действий"],
        true,
    ),
    section("Контроль", &["контроль"], false),
    section(
        "Заключительные положения",
        &["заключительные положения"],
        false,
    ),
];

const GENERIC_SECTIONS: &[SectionSpec] = &[section(CATCH_ALL_SECTION, &["прочее"], true)];

// Keywords are word stems; multi-word keywords require the stems to follow
// each other separated by whitespace.
const JOB_DESCRIPTION_KEYWORDS: &[&str] = &[
    "должностн инструкци",
    "должностн обязанност",
    "обязанност",
    "подчиня",
    "работник",
    "квалификаци",
    "имеет прав",
    "несет ответственност",
    "трудов договор",
    "рабоч мест",
];

const REGULATION_KEYWORDS: &[&str] = &[
    "положени",
    "настоящ положени",
    "основн поняти",
    "цел",
    "задач",
    "порядок",
    "структурн подразделени",
    "утвержда",
];

const REPORT_KEYWORDS: &[&str] = &[
    "отчет",
    "отчетн период",
    "результат",
    "анализ",
    "вывод",
    "показател",
    "динамик",
    "итог",
];

const INSTRUCTION_KEYWORDS: &[&str] = &[
    "инструкци",
    "порядок выполнени",
    "алгоритм",
    "этап",
    "шаг",
    "последовательност",
    "требовани безопасност",
    "необходимо",
];

/// Closed set of document types the classifier can produce.
///
/// Declaration order is observable: it breaks exact classification ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    JobDescription,
    Regulation,
    Report,
    Instruction,
    Generic,
}

impl DocumentType {
    pub const ALL: [DocumentType; 5] = [
        DocumentType::JobDescription,
        DocumentType::Regulation,
        DocumentType::Report,
        DocumentType::Instruction,
        DocumentType::Generic,
    ];

    /// Types that take part in keyword classification, in tie-break order.
    pub const CANDIDATES: [DocumentType; 4] = [
        DocumentType::JobDescription,
        DocumentType::Regulation,
        DocumentType::Report,
        DocumentType::Instruction,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            DocumentType::JobDescription => "Должностная инструкция",
            DocumentType::Regulation => "Положение",
            DocumentType::Report => "Отчет",
            DocumentType::Instruction => "Инструкция",
            DocumentType::Generic => "Документ",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            DocumentType::JobDescription => "job_description",
            DocumentType::Regulation => "regulation",
            DocumentType::Report => "report",
            DocumentType::Instruction => "instruction",
            DocumentType::Generic => "generic",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.slug() == slug)
    }

    /// Canonical sections in rendering order. Never empty.
    pub fn sections(&self) -> &'static [SectionSpec] {
        match self {
            DocumentType::JobDescription => JOB_DESCRIPTION_SECTIONS,
            DocumentType::Regulation => REGULATION_SECTIONS,
            DocumentType::Report => REPORT_SECTIONS,
            DocumentType::Instruction => INSTRUCTION_SECTIONS,
            DocumentType::Generic => GENERIC_SECTIONS,
        }
    }

    pub fn required_sections(&self) -> impl Iterator<Item = &'static SectionSpec> {
        self.sections().iter().filter(|s| s.required)
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            DocumentType::JobDescription => JOB_DESCRIPTION_KEYWORDS,
            DocumentType::Regulation => REGULATION_KEYWORDS,
            DocumentType::Report => REPORT_KEYWORDS,
            DocumentType::Instruction => INSTRUCTION_KEYWORDS,
            DocumentType::Generic => &[],
        }
    }

    pub fn is_catch_all_canonical(&self) -> bool {
        self.sections().iter().any(|s| s.name == CATCH_ALL_SECTION)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_has_sections_and_a_required_one() {
        for doc_type in DocumentType::ALL {
            assert!(!doc_type.sections().is_empty(), "{:?}", doc_type);
            assert!(doc_type.required_sections().count() > 0, "{:?}", doc_type);
        }
    }

    #[test]
    fn test_job_description_layout() {
        let names: Vec<&str> = DocumentType::JobDescription
            .sections()
            .iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "Общие положения",
                "Функции",
                "Должностные обязанности",
                "Права",
                "Ответственность",
                "Заключительные положения",
                "Согласование и утверждение",
            ]
        );

        let required: Vec<&str> = DocumentType::JobDescription
            .required_sections()
            .map(|s| s.name)
            .collect();
        assert_eq!(
            required,
            vec![
                "Общие положения",
                "Должностные обязанности",
                "Права",
                "Ответственность"
            ]
        );
    }

    #[test]
    fn test_aliases_are_normalised() {
        for doc_type in DocumentType::ALL {
            for spec in doc_type.sections() {
                for alias in spec.aliases {
                    assert_eq!(*alias, alias.to_lowercase());
                    assert!(!alias.contains('ё'));
                }
            }
        }
    }

    #[test]
    fn test_section_names_unique_per_type() {
        for doc_type in DocumentType::ALL {
            let mut names: Vec<&str> = doc_type.sections().iter().map(|s| s.name).collect();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), doc_type.sections().len());
        }
    }

    #[test]
    fn test_slug_roundtrip_and_serde() {
        for doc_type in DocumentType::ALL {
            assert_eq!(DocumentType::from_slug(doc_type.slug()), Some(doc_type));
            let json = serde_json::to_string(&doc_type).unwrap();
            assert_eq!(json, format!("\"{}\"", doc_type.slug()));
        }
    }

    #[test]
    fn test_only_generic_owns_the_catch_all() {
        for doc_type in DocumentType::ALL {
            assert_eq!(
                doc_type.is_catch_all_canonical(),
                doc_type == DocumentType::Generic
            );
        }
        assert!(DocumentType::Generic.keywords().is_empty());
    }
}
