use std::collections::HashSet;
use std::sync::Arc;

use crate::config::ScoringConfig;
use crate::patterns::{DocumentType, PatternLibrary};
use crate::segmenter::{words, Heading, Section};

use super::{QualityAssessment, QualityBucket, SubScores};

/// Share of the content score taken by document length; the rest comes from
/// vocabulary diversity.
const LENGTH_SHARE: f64 = 0.6;

struct ConsistencyCheck {
    score: f64,
    issues: Vec<String>,
}

pub struct QualityAssessor {
    library: Arc<PatternLibrary>,
    scoring: ScoringConfig,
}

impl QualityAssessor {
    pub fn new(library: Arc<PatternLibrary>, scoring: ScoringConfig) -> Self {
        Self { library, scoring }
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    pub fn assess(&self, sections: &[Section], doc_type: DocumentType) -> QualityAssessment {
        let all_words: Vec<String> = sections
            .iter()
            .flat_map(|s| s.paragraphs.iter())
            .flat_map(|p| words(p))
            .collect();

        if all_words.is_empty() {
            return QualityAssessment {
                scores: SubScores::ZERO,
                overall: 0.0,
                bucket: QualityBucket::Low,
                word_count: 0,
                filled_sections: 0,
                recommendations: vec![
                    "Проверьте исходный документ и повторите конвертацию".to_string()
                ],
                critical_issues: vec!["Документ пуст".to_string()],
            };
        }

        let min_words = self.scoring.min_section_words;
        let threshold = self.scoring.recommendation_threshold;
        let specs = doc_type.sections();

        let section_of = |name: &str| sections.iter().find(|s| s.name == name);
        let is_present = |name: &str| section_of(name).is_some_and(|s| !s.is_empty());
        let is_filled = |name: &str| section_of(name).is_some_and(|s| s.word_count() > min_words);

        let present = specs.iter().filter(|spec| is_present(spec.name)).count();
        let structure = ratio(present, specs.len());

        let (length_score, diversity_score) = self.content_parts(&all_words);
        let content = LENGTH_SHARE * length_score + (1.0 - LENGTH_SHARE) * diversity_score;

        let full_text: String = sections
            .iter()
            .map(Section::text)
            .collect::<Vec<_>>()
            .join("\n");
        let consistency = self.consistency(sections, &full_text);

        let required: Vec<&str> = doc_type.required_sections().map(|s| s.name).collect();
        let satisfied = required.iter().filter(|name| is_filled(name)).count();
        let completeness = ratio(satisfied, required.len());

        let scores = SubScores {
            structure,
            content,
            consistency: consistency.score,
            completeness,
        };
        let weights = self.scoring.weights;
        let overall = (weights.structure * structure
            + weights.content * content
            + weights.consistency * consistency.score
            + weights.completeness * completeness)
            .clamp(0.0, 1.0);

        let filled_sections = sections
            .iter()
            .filter(|s| !s.is_catch_all() && s.word_count() > min_words)
            .count();
        let bucket = if filled_sections >= self.scoring.high_min_sections {
            QualityBucket::High
        } else if filled_sections >= self.scoring.medium_min_sections {
            QualityBucket::Medium
        } else {
            QualityBucket::Low
        };

        let mut recommendations = Vec::new();
        for spec in specs.iter().filter(|s| !is_present(s.name)) {
            if spec.required {
                recommendations.push(format!("Добавьте обязательный раздел «{}»", spec.name));
            } else if structure < threshold {
                recommendations.push(format!("Добавьте раздел «{}»", spec.name));
            }
        }
        for name in required.iter().filter(|n| is_present(n) && !is_filled(n)) {
            recommendations.push(format!("Заполните обязательный раздел «{}»", name));
        }
        if content < threshold {
            if length_score < 1.0 {
                recommendations.push(format!(
                    "Расширьте содержание документа (сейчас {} слов)",
                    all_words.len()
                ));
            }
            if diversity_score < 1.0 {
                recommendations.push("Используйте более разнообразную лексику".to_string());
            }
        }
        recommendations.extend(consistency.issues);
        if doc_type == DocumentType::Generic {
            recommendations.push(
                "Тип документа не определен: проверьте заголовки и ключевые формулировки"
                    .to_string(),
            );
        }
        if recommendations.is_empty() {
            recommendations.push("Документ соответствует основным требованиям качества".to_string());
        }

        let mut critical_issues = Vec::new();
        if all_words.len() < self.scoring.critical_min_words {
            critical_issues.push(format!(
                "Критически малый объем документа ({} слов)",
                all_words.len()
            ));
        }
        if completeness < self.scoring.completeness_floor {
            critical_issues.push(
                "Отсутствует большая часть обязательных разделов: возможно, тип документа определен неверно"
                    .to_string(),
            );
        }

        QualityAssessment {
            scores,
            overall,
            bucket,
            word_count: all_words.len(),
            filled_sections,
            recommendations,
            critical_issues,
        }
    }

    /// Length and diversity parts of the content score. Both saturate at 1.
    fn content_parts(&self, all_words: &[String]) -> (f64, f64) {
        let total = all_words.len();
        let unique: HashSet<&str> = all_words.iter().map(String::as_str).collect();

        let length = (total as f64 / self.scoring.content_word_target as f64).min(1.0);
        let richness = unique.len() as f64 / total as f64;
        let diversity = (richness / self.scoring.min_vocabulary_richness).min(1.0);
        (length, diversity)
    }

    fn consistency(&self, sections: &[Section], full_text: &str) -> ConsistencyCheck {
        let scoring = &self.scoring;
        let mut penalty = 0.0;
        let mut issues = Vec::new();

        let mut terminology_penalty: f64 = 0.0;
        for group in self.library.terminology() {
            let present = group.variants_present(full_text);
            if present.len() > 1 {
                terminology_penalty += scoring.terminology_penalty;
                issues.push(format!(
                    "Унифицируйте терминологию для понятия «{}»: {}",
                    group.concept,
                    present.join(" / ")
                ));
            }
        }
        penalty += terminology_penalty.min(scoring.max_terminology_penalty);

        let headings: Vec<Heading> = sections
            .iter()
            .filter(|s| !s.is_catch_all())
            .filter_map(|s| s.heading.as_deref())
            .filter_map(Heading::parse)
            .collect();

        let numbers: Vec<u32> = headings.iter().filter_map(|h| h.number).collect();
        if !numbers.is_empty() && numbers.len() < headings.len() {
            penalty += scoring.mixed_numbering_penalty;
            issues.push("Пронумеруйте все заголовки разделов единообразно".to_string());
        }
        if numbers.windows(2).any(|pair| pair[1] <= pair[0]) {
            penalty += scoring.numbering_penalty;
            issues.push("Проверьте порядок нумерации разделов".to_string());
        }

        let styles: HashSet<_> = headings.iter().map(|h| h.style).collect();
        if styles.len() > 1 {
            penalty += scoring.heading_case_penalty;
            issues.push("Оформите заголовки разделов в едином регистре".to_string());
        }

        ConsistencyCheck {
            score: (1.0 - penalty).clamp(0.0, 1.0),
            issues,
        }
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_default_config;
    use crate::patterns::CATCH_ALL_SECTION;

    fn assessor() -> QualityAssessor {
        let config = load_default_config().unwrap();
        let library = Arc::new(PatternLibrary::from_config(&config).unwrap());
        QualityAssessor::new(library, config.scoring)
    }

    fn section(name: &str, heading: Option<&str>, paragraphs: &[&str]) -> Section {
        Section {
            name: name.to_string(),
            paragraphs: paragraphs.iter().map(|p| p.to_string()).collect(),
            heading: heading.map(str::to_string),
        }
    }

    fn filled(name: &str, number: u32, body: &str) -> Section {
        section(name, Some(&format!("## {}. {}", number, name)), &[body])
    }

    fn job_description_sections() -> Vec<Section> {
        vec![
            filled("Общие положения", 1, "Бухгалтер относится к категории специалистов и назначается приказом директора."),
            filled("Функции", 2, "Ведение бухгалтерского учета хозяйственных операций и составление отчетности."),
            filled("Должностные обязанности", 3, "Принимает первичные документы, проверяет их оформление и отражает операции в регистрах."),
            filled("Права", 4, "Вправе запрашивать у подразделений сведения, необходимые для выполнения своих обязанностей."),
            filled("Ответственность", 5, "Отвечает за ненадлежащее исполнение обязанностей в пределах трудового законодательства."),
            filled("Заключительные положения", 6, "Инструкция пересматривается при изменении штатного расписания или структуры бухгалтерии."),
            filled("Согласование и утверждение", 7, "Согласовано с главным бухгалтером, утверждено генеральным директором в установленном порядке."),
        ]
    }

    fn assert_bounded(assessment: &QualityAssessment) {
        let s = assessment.scores;
        for value in [s.structure, s.content, s.consistency, s.completeness, assessment.overall] {
            assert!((0.0..=1.0).contains(&value), "score out of range: {}", value);
        }
    }

    #[test]
    fn test_complete_job_description_scores_high() {
        let assessment = assessor().assess(&job_description_sections(), DocumentType::JobDescription);
        assert_bounded(&assessment);
        assert_eq!(assessment.scores.structure, 1.0);
        assert_eq!(assessment.scores.completeness, 1.0);
        assert_eq!(assessment.bucket, QualityBucket::High);
        assert_eq!(assessment.filled_sections, 7);
        assert!(assessment.critical_issues.is_empty());
    }

    #[test]
    fn test_missing_required_section_is_recommended() {
        let sections: Vec<Section> = job_description_sections()
            .into_iter()
            .map(|s| {
                if s.name == "Ответственность" {
                    section("Ответственность", None, &[])
                } else {
                    s
                }
            })
            .collect();
        let assessment = assessor().assess(&sections, DocumentType::JobDescription);
        assert!((assessment.scores.completeness - 0.75).abs() < 1e-9);
        assert!(assessment
            .recommendations
            .iter()
            .any(|r| r.contains("Ответственность")));
    }

    #[test]
    fn test_thin_required_section_asks_to_fill() {
        let mut sections = job_description_sections();
        sections[3] = section("Права", Some("## 4. Права"), &["Вправе запрашивать."]);
        let assessment = assessor().assess(&sections, DocumentType::JobDescription);
        assert!(assessment
            .recommendations
            .contains(&"Заполните обязательный раздел «Права»".to_string()));
    }

    #[test]
    fn test_empty_document_scores_zero_with_one_critical_issue() {
        let sections: Vec<Section> = DocumentType::JobDescription
            .sections()
            .iter()
            .map(|s| section(s.name, None, &[]))
            .collect();
        let assessment = assessor().assess(&sections, DocumentType::JobDescription);
        assert_eq!(assessment.scores, SubScores::ZERO);
        assert_eq!(assessment.overall, 0.0);
        assert_eq!(assessment.bucket, QualityBucket::Low);
        assert_eq!(assessment.critical_issues.len(), 1);
    }

    #[test]
    fn test_tiny_document_is_critical() {
        let sections = vec![section(CATCH_ALL_SECTION, None, &["Несколько слов."])];
        let assessment = assessor().assess(&sections, DocumentType::Generic);
        assert_bounded(&assessment);
        assert!(assessment
            .critical_issues
            .iter()
            .any(|i| i.contains("малый объем")));
        assert_eq!(assessment.bucket, QualityBucket::Low);
    }

    #[test]
    fn test_content_saturates_for_long_documents() {
        let assessor = assessor();
        let vocabulary: Vec<String> = (0..400).map(|i| format!("слово{}", "а".repeat(i % 40 + 1))).collect();
        let moderate = vec![section(CATCH_ALL_SECTION, None, &[&vocabulary[..300].join(" ")])];
        let long_text = vocabulary.join(" ").repeat(10);
        let long = vec![section(CATCH_ALL_SECTION, None, &[&long_text])];

        let moderate = assessor.assess(&moderate, DocumentType::Generic);
        let long = assessor.assess(&long, DocumentType::Generic);
        assert!(long.scores.content <= moderate.scores.content);
        assert!(long.scores.content <= 1.0);
    }

    #[test]
    fn test_terminology_variation_lowers_consistency() {
        let mut sections = job_description_sections();
        sections[0] = filled(
            "Общие положения",
            1,
            "Работник назначается приказом. Сотрудник подчиняется руководителю отдела напрямую.",
        );
        let assessment = assessor().assess(&sections, DocumentType::JobDescription);
        assert!(assessment.scores.consistency < 1.0);
        assert!(assessment
            .recommendations
            .iter()
            .any(|r| r.contains("работник / сотрудник")));
    }

    #[test]
    fn test_numbering_out_of_order_penalised() {
        let mut sections = job_description_sections();
        sections[1].heading = Some("## 5. Функции".to_string());
        let assessment = assessor().assess(&sections, DocumentType::JobDescription);
        assert!(assessment.scores.consistency < 1.0);
        assert!(assessment
            .recommendations
            .iter()
            .any(|r| r.contains("нумерации")));
    }

    #[test]
    fn test_weights_applied_to_overall() {
        let assessment = assessor().assess(&job_description_sections(), DocumentType::JobDescription);
        let s = assessment.scores;
        let expected = 0.25 * s.structure + 0.35 * s.content + 0.20 * s.consistency + 0.20 * s.completeness;
        assert!((assessment.overall - expected).abs() < 1e-9);
    }

    #[test]
    fn test_generic_gets_type_recommendation() {
        let text = "Слово ".repeat(60);
        let sections = vec![section(CATCH_ALL_SECTION, None, &[&text])];
        let assessment = assessor().assess(&sections, DocumentType::Generic);
        assert!(assessment
            .recommendations
            .iter()
            .any(|r| r.contains("Тип документа не определен")));
    }
}
