use std::fmt::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::info;

use crate::error::ReportError;
use crate::quality::QualityBucket;
use crate::sanitize;

use super::{ProcessingReport, ProcessingStatus};

pub const REPORT_FILE_NAME: &str = "processing_report.md";
/// Longer file lists show only the head and tail.
const LIST_EDGE: usize = 10;

fn bucket_description(bucket: QualityBucket) -> &'static str {
    match bucket {
        QualityBucket::High => "Все основные разделы заполнены",
        QualityBucket::Medium => "Часть разделов заполнена",
        QualityBucket::Low => "Только структура, минимум содержимого",
    }
}

pub fn render_markdown(report: &ProcessingReport, updated: bool) -> String {
    let mut out = String::new();
    let generated = report
        .finished_at
        .unwrap_or_else(Utc::now)
        .format("%Y-%m-%d %H:%M:%S");

    if updated {
        out.push_str("# Отчет о постобработке документов (обновлен)\n\n");
    } else {
        out.push_str("# Отчет о постобработке документов\n\n");
    }
    let _ = writeln!(out, "**Дата создания:** {}", generated);
    let _ = writeln!(out, "**Идентификатор запуска:** `{}`", report.run_id);
    let _ = writeln!(
        out,
        "**Генератор:** docxmd v{}\n",
        env!("CARGO_PKG_VERSION")
    );

    out.push_str("## Краткое резюме\n\n");
    let _ = writeln!(out, "- **Успешно обработано:** {}", report.processed());
    let _ = writeln!(out, "- **Пропущено:** {}", report.skipped());
    let _ = writeln!(out, "- **Ошибок:** {}", report.errors());
    let _ = writeln!(out, "- **Всего файлов:** {}\n", report.total());
    let _ = writeln!(out, "**Общий статус:** {}\n", report.overall_status());
    if report.total() > 0 {
        let _ = writeln!(out, "**Процент успеха:** {:.1}%\n", report.success_rate());
    }

    let histogram = report.quality_histogram();
    let assessed: usize = histogram.values().sum();
    if assessed > 0 {
        out.push_str("## Статистика качества\n\n");
        out.push_str("| Качество | Файлов | Процент | Описание |\n");
        out.push_str("|----------|--------|---------|----------|\n");
        for bucket in QualityBucket::ALL {
            let count = histogram.get(&bucket).copied().unwrap_or(0);
            let _ = writeln!(
                out,
                "| {} | {} | {:.1}% | {} |",
                bucket.label(),
                count,
                count as f64 * 100.0 / assessed as f64,
                bucket_description(bucket)
            );
        }
        out.push('\n');
    }

    let processed: Vec<_> = report.results().filter(|r| r.is_processed()).collect();
    if !processed.is_empty() {
        out.push_str("## Обработанные файлы\n\n");
        out.push_str("| № | Файл | Тип | Качество | Оценка |\n");
        out.push_str("|---|------|-----|----------|--------|\n");
        let shown = edges(processed.len());
        for (idx, result) in processed.iter().enumerate() {
            if !shown(idx) {
                if idx == LIST_EDGE {
                    let _ = writeln!(
                        out,
                        "| … | пропущено {} файлов | | | |",
                        processed.len() - 2 * LIST_EDGE
                    );
                }
                continue;
            }
            let _ = writeln!(
                out,
                "| {} | `{}` | {} | {} | {:.2} |",
                idx + 1,
                sanitize::redact_path(&result.path),
                result.document_type.map(|t| t.title()).unwrap_or("—"),
                result.bucket().map(|b| b.label()).unwrap_or("—"),
                result.overall_score().unwrap_or(0.0)
            );
        }
        out.push('\n');
    }

    let skipped: Vec<_> = report
        .results()
        .filter_map(|r| match &r.status {
            ProcessingStatus::Skipped { reason } => Some((&r.path, *reason)),
            _ => None,
        })
        .collect();
    if !skipped.is_empty() {
        out.push_str("## Пропущенные файлы\n\n");
        for (path, reason) in skipped.iter().take(LIST_EDGE) {
            let _ = writeln!(
                out,
                "- `{}` ({})",
                sanitize::redact_path(path),
                reason.describe()
            );
        }
        if skipped.len() > LIST_EDGE {
            let _ = writeln!(out, "- … и еще {} файлов", skipped.len() - LIST_EDGE);
        }
        out.push('\n');
    }

    let errors: Vec<_> = report.errored().collect();
    if !errors.is_empty() {
        out.push_str("## Ошибки обработки\n\n");
        for (path, message) in errors.iter().take(LIST_EDGE) {
            let _ = writeln!(out, "- `{}`: {}", sanitize::redact_path(path), message);
        }
        if errors.len() > LIST_EDGE {
            let _ = writeln!(out, "- … и еще {} ошибок", errors.len() - LIST_EDGE);
        }
        out.push('\n');
    }

    out.push_str("## Рекомендации\n\n");
    let low = histogram.get(&QualityBucket::Low).copied().unwrap_or(0);
    if low > 0 {
        let _ = writeln!(
            out,
            "- Доработайте вручную документы низкого качества ({} шт.): найдите `\"quality_bucket\": \"low\"` в метаданных.",
            low
        );
    }
    if !errors.is_empty() {
        out.push_str("- Проверьте кодировку (UTF-8) и содержимое файлов с ошибками, затем повторите обработку с `--force`.\n");
    }
    if low == 0 && errors.is_empty() {
        out.push_str("- Дополнительных действий не требуется.\n");
    }

    out
}

/// Writes the Markdown report into `dir`. An existing report is replaced
/// only when `update` is set; otherwise a timestamped name is used.
pub fn write_markdown_report(
    report: &ProcessingReport,
    dir: &Path,
    update: bool,
) -> Result<PathBuf, ReportError> {
    let mut path = dir.join(REPORT_FILE_NAME);
    let updating = path.exists();
    if updating && !update {
        let stamp = report.started_at.format("%Y%m%d_%H%M%S");
        path = dir.join(format!("processing_report_{}.md", stamp));
    }

    std::fs::create_dir_all(dir).map_err(|source| ReportError::WriteFile {
        path: dir.to_path_buf(),
        source,
    })?;
    std::fs::write(&path, render_markdown(report, updating && update)).map_err(|source| {
        ReportError::WriteFile {
            path: path.clone(),
            source,
        }
    })?;

    info!("Report written to {}", path.display());
    Ok(path)
}

pub fn write_json_report(report: &ProcessingReport, path: &Path) -> Result<(), ReportError> {
    let json = report.to_json()?;
    std::fs::write(path, json).map_err(|source| ReportError::WriteFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Index filter that keeps the first and last `LIST_EDGE` entries.
fn edges(len: usize) -> impl Fn(usize) -> bool {
    move |idx| len <= 2 * LIST_EDGE || idx < LIST_EDGE || idx >= len - LIST_EDGE
}
