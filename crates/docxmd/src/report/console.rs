use std::fmt::Write;

use crate::quality::QualityBucket;
use crate::sanitize;

use super::ProcessingReport;

const RULE_WIDTH: usize = 60;
/// Errors listed individually before the rest is summarised.
const MAX_LISTED_ERRORS: usize = 10;

pub fn render_console(report: &ProcessingReport) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "ОТЧЕТ О ПОСТОБРАБОТКЕ ДОКУМЕНТОВ");
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(
        out,
        "Время запуска: {}",
        report.started_at.format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(out, "Всего файлов: {}", report.total());
    let _ = writeln!(out, "Обработано: {}", report.processed());
    let _ = writeln!(out, "Пропущено: {}", report.skipped());
    let _ = writeln!(out, "Ошибок: {}", report.errors());
    if report.total() > 0 {
        let _ = writeln!(out, "Процент успеха: {:.1}%", report.success_rate());
    }

    let histogram = report.quality_histogram();
    if histogram.values().any(|&n| n > 0) {
        let _ = writeln!(out);
        let _ = writeln!(out, "СТАТИСТИКА КАЧЕСТВА:");
        for bucket in QualityBucket::ALL {
            let _ = writeln!(
                out,
                "  {} качество: {} файлов",
                capitalised_label(bucket),
                histogram.get(&bucket).copied().unwrap_or(0)
            );
        }
        if let Some(average) = report.average_score() {
            let _ = writeln!(out, "  Средняя оценка: {:.2}", average);
        }
    }

    let errors: Vec<_> = report.errored().collect();
    if !errors.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "ОШИБКИ ({}):", errors.len());
        for (path, message) in errors.iter().take(MAX_LISTED_ERRORS) {
            let _ = writeln!(out, "  - {}: {}", sanitize::redact_path(path), message);
        }
        if errors.len() > MAX_LISTED_ERRORS {
            let _ = writeln!(out, "  ... и еще {} ошибок", errors.len() - MAX_LISTED_ERRORS);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "ОБЩИЙ СТАТУС: {}", report.overall_status());
    let _ = write!(out, "{}", rule);
    out
}

/// One-line summary for the end of a command.
pub fn brief_summary(report: &ProcessingReport) -> String {
    if report.total() == 0 {
        return "Нет файлов для обработки".to_string();
    }

    let mut summary = format!(
        "Обработка завершена: {}/{} файлов",
        report.processed(),
        report.total()
    );
    if report.skipped() > 0 {
        let _ = write!(summary, ", пропущено: {}", report.skipped());
    }
    if report.errors() > 0 {
        let _ = write!(summary, ", ошибок: {}", report.errors());
    }
    summary
}

fn capitalised_label(bucket: QualityBucket) -> String {
    let label = bucket.label();
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
