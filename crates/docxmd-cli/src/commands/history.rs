use std::process::ExitCode;

use anyhow::{anyhow, Context as _, Result};
use clap::Args;

use docxmd::{DocumentType, HistoryStatistics, HistoryStore};

use super::AppContext;

#[derive(Args)]
pub struct HistoryCommand {
    /// Print the statistics as JSON
    #[arg(long)]
    json: bool,
}

impl HistoryCommand {
    pub fn execute(self, ctx: &AppContext) -> Result<ExitCode> {
        let path = ctx
            .history_path()
            .ok_or_else(|| anyhow!("No history database path; pass --history-db"))?;
        if !path.exists() {
            println!("История обработки пуста ({})", path.display());
            return Ok(ExitCode::SUCCESS);
        }

        let store = HistoryStore::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let stats = store.statistics()?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            print!("{}", describe(&stats));
        }
        Ok(ExitCode::SUCCESS)
    }
}

fn describe(stats: &HistoryStatistics) -> String {
    let mut out = format!(
        "Запусков: {}\nЗаписей: {} (обработано {}, пропущено {}, ошибок {})\n",
        stats.runs, stats.total, stats.processed, stats.skipped, stats.errors
    );
    if let Some(average) = stats.average_score {
        out.push_str(&format!("Средняя оценка: {:.2}\n", average));
    }
    out.push_str(&format!(
        "Среднее время обработки: {:.0} мс\n",
        stats.average_duration_ms
    ));

    if !stats.by_type.is_empty() {
        out.push_str("\nПо типам документов:\n");
        for stat in &stats.by_type {
            let title = DocumentType::from_slug(&stat.document_type)
                .map(|t| t.title())
                .unwrap_or(stat.document_type.as_str());
            out.push_str(&format!(
                "  {:<26} {:>5}  средняя оценка {:.2}\n",
                title, stat.count, stat.average_score
            ));
        }
    }
    if !stats.by_bucket.is_empty() {
        out.push_str("\nПо качеству:\n");
        for (bucket, count) in &stats.by_bucket {
            out.push_str(&format!("  {:<10} {:>5}\n", bucket, count));
        }
    }
    out
}
