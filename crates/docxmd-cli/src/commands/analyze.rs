use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::Args;

use docxmd::{DocumentAnalysis, Pipeline, ProcessingOptions};

use super::AppContext;

#[derive(Args)]
pub struct AnalyzeCommand {
    /// Markdown file to analyze
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Print the analysis as JSON
    #[arg(long)]
    json: bool,
}

impl AnalyzeCommand {
    pub fn execute(self, ctx: &AppContext) -> Result<ExitCode> {
        let raw = std::fs::read_to_string(&self.file)
            .with_context(|| format!("Failed to read {}", self.file.display()))?;

        let options = ProcessingOptions {
            write_back: false,
            ..ProcessingOptions::default()
        };
        let pipeline = Pipeline::from_config(ctx.pipeline_config(options)?);
        let analysis = pipeline.analyze(&raw)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&analysis)?);
        } else {
            print!("{}", describe(&analysis));
        }
        Ok(ExitCode::SUCCESS)
    }
}

fn describe(analysis: &DocumentAnalysis) -> String {
    let classification = &analysis.classification;
    let assessment = &analysis.assessment;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Тип документа: {} (уверенность {:.3})",
        classification.document_type.title(),
        classification.confidence
    );
    for score in &classification.scores {
        let _ = writeln!(out, "  {:<16} {:.3}", score.document_type.slug(), score.score);
    }

    let _ = writeln!(out, "\nРазделы:");
    for section in &analysis.sections {
        let _ = writeln!(out, "  {:<40} {} слов", section.name, section.word_count());
    }

    let scores = &assessment.scores;
    let _ = writeln!(out, "\nКачество: {} ({:.2})", assessment.bucket.label(), assessment.overall);
    let _ = writeln!(out, "  структура:     {:.2}", scores.structure);
    let _ = writeln!(out, "  содержание:    {:.2}", scores.content);
    let _ = writeln!(out, "  согласованность: {:.2}", scores.consistency);
    let _ = writeln!(out, "  полнота:       {:.2}", scores.completeness);

    if !assessment.critical_issues.is_empty() {
        let _ = writeln!(out, "\nКритические проблемы:");
        for issue in &assessment.critical_issues {
            let _ = writeln!(out, "  - {}", issue);
        }
    }
    let _ = writeln!(out, "\nРекомендации:");
    for recommendation in &assessment.recommendations {
        let _ = writeln!(out, "  - {}", recommendation);
    }
    for warning in &analysis.warnings {
        let _ = writeln!(out, "\nПредупреждение: {}", warning);
    }
    out
}
