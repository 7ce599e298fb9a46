//! Per-file results and the batch report they are collected into.

pub mod console;
pub mod markdown;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ReportError;
use crate::patterns::DocumentType;
use crate::pipeline::PipelineWarning;
use crate::quality::{QualityAssessment, QualityBucket};
use crate::worker::job::Job;

pub use console::{brief_summary, render_console};
pub use markdown::{render_markdown, write_json_report, write_markdown_report};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Rejected by the protection policy.
    Protected,
    /// Carries a metadata footer and processing was not forced.
    AlreadyProcessed,
    DryRun,
}

impl SkipReason {
    pub fn describe(&self) -> &'static str {
        match self {
            SkipReason::Protected => "защищенный файл",
            SkipReason::AlreadyProcessed => "уже обработан",
            SkipReason::DryRun => "пробный запуск",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProcessingStatus {
    Processed,
    Skipped { reason: SkipReason },
    Error { message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessingResult {
    pub job_id: String,
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: ProcessingStatus,
    pub document_type: Option<DocumentType>,
    pub confidence: f64,
    pub assessment: Option<QualityAssessment>,
    pub warnings: Vec<PipelineWarning>,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl ProcessingResult {
    fn new(job: &Job, status: ProcessingStatus) -> Self {
        Self {
            job_id: job.id.clone(),
            path: job.source_path.clone(),
            status,
            document_type: None,
            confidence: 0.0,
            assessment: None,
            warnings: Vec::new(),
            started_at: Utc::now(),
            duration_ms: 0,
        }
    }

    pub fn processed(
        job: &Job,
        document_type: DocumentType,
        confidence: f64,
        assessment: QualityAssessment,
        warnings: Vec<PipelineWarning>,
    ) -> Self {
        Self {
            document_type: Some(document_type),
            confidence,
            assessment: Some(assessment),
            warnings,
            ..Self::new(job, ProcessingStatus::Processed)
        }
    }

    pub fn skipped(job: &Job, reason: SkipReason) -> Self {
        Self::new(job, ProcessingStatus::Skipped { reason })
    }

    pub fn failed(job: &Job, message: impl Into<String>) -> Self {
        Self::new(
            job,
            ProcessingStatus::Error {
                message: message.into(),
            },
        )
    }

    /// Stamps the start time and elapsed milliseconds of the run.
    pub fn timed(mut self, started_at: DateTime<Utc>, elapsed: std::time::Duration) -> Self {
        self.started_at = started_at;
        self.duration_ms = elapsed.as_millis().min(u64::MAX as u128) as u64;
        self
    }

    pub fn is_processed(&self) -> bool {
        self.status == ProcessingStatus::Processed
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, ProcessingStatus::Skipped { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self.status, ProcessingStatus::Error { .. })
    }

    pub fn bucket(&self) -> Option<QualityBucket> {
        self.assessment.as_ref().map(|a| a.bucket)
    }

    pub fn overall_score(&self) -> Option<f64> {
        self.assessment.as_ref().map(|a| a.overall)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Success,
    WithWarnings,
    Failed,
}

impl OverallStatus {
    pub fn describe(&self) -> &'static str {
        match self {
            OverallStatus::Success => "Задача выполнена успешно",
            OverallStatus::WithWarnings => "Выполнено с предупреждениями",
            OverallStatus::Failed => "Выполнение не удалось",
        }
    }
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
    pub success_rate: f64,
    pub average_score: Option<f64>,
    pub quality: BTreeMap<QualityBucket, usize>,
    pub status: OverallStatus,
}

/// Results of one batch, keyed by file path.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    results: BTreeMap<PathBuf, ProcessingResult>,
}

impl Default for ProcessingReport {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingReport {
    pub fn new() -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            finished_at: None,
            results: BTreeMap::new(),
        }
    }

    /// Adds a result. A second result for the same path replaces the first.
    pub fn record(&mut self, result: ProcessingResult) {
        self.results.insert(result.path.clone(), result);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn get(&self, path: &Path) -> Option<&ProcessingResult> {
        self.results.get(path)
    }

    pub fn results(&self) -> impl Iterator<Item = &ProcessingResult> {
        self.results.values()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn processed(&self) -> usize {
        self.results().filter(|r| r.is_processed()).count()
    }

    pub fn skipped(&self) -> usize {
        self.results().filter(|r| r.is_skipped()).count()
    }

    pub fn errors(&self) -> usize {
        self.results().filter(|r| r.is_error()).count()
    }

    /// Processed files per quality bucket; every bucket is present.
    pub fn quality_histogram(&self) -> BTreeMap<QualityBucket, usize> {
        let mut histogram: BTreeMap<QualityBucket, usize> =
            QualityBucket::ALL.iter().map(|b| (*b, 0)).collect();
        for bucket in self.results().filter_map(ProcessingResult::bucket) {
            *histogram.entry(bucket).or_insert(0) += 1;
        }
        histogram
    }

    /// Share of processed files, in percent. `0.0` for an empty batch.
    pub fn success_rate(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.processed() as f64 * 100.0 / total as f64,
        }
    }

    pub fn average_score(&self) -> Option<f64> {
        let scores: Vec<f64> = self
            .results()
            .filter_map(ProcessingResult::overall_score)
            .collect();
        if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        }
    }

    pub fn overall_status(&self) -> OverallStatus {
        if self.errors() == 0 {
            OverallStatus::Success
        } else if self.processed() > 0 {
            OverallStatus::WithWarnings
        } else {
            OverallStatus::Failed
        }
    }

    pub fn errored(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.results().filter_map(|r| match &r.status {
            ProcessingStatus::Error { message } => Some((r.path.as_path(), message.as_str())),
            _ => None,
        })
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            total: self.total(),
            processed: self.processed(),
            skipped: self.skipped(),
            errors: self.errors(),
            success_rate: self.success_rate(),
            average_score: self.average_score(),
            quality: self.quality_histogram(),
            status: self.overall_status(),
        }
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        #[derive(Serialize)]
        struct JsonReport<'a> {
            run_id: &'a str,
            started_at: DateTime<Utc>,
            finished_at: Option<DateTime<Utc>>,
            summary: ReportSummary,
            results: Vec<&'a ProcessingResult>,
        }

        let json = JsonReport {
            run_id: &self.run_id,
            started_at: self.started_at,
            finished_at: self.finished_at,
            summary: self.summary(),
            results: self.results().collect(),
        };
        Ok(serde_json::to_string_pretty(&json)?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::quality::SubScores;

    pub(crate) fn assessment(bucket: QualityBucket, overall: f64) -> QualityAssessment {
        QualityAssessment {
            scores: SubScores {
                structure: overall,
                content: overall,
                consistency: overall,
                completeness: overall,
            },
            overall,
            bucket,
            word_count: 100,
            filled_sections: 3,
            recommendations: vec!["Документ соответствует основным требованиям качества".to_string()],
            critical_issues: Vec::new(),
        }
    }

    pub(crate) fn processed(path: &str, bucket: QualityBucket, overall: f64) -> ProcessingResult {
        ProcessingResult::processed(
            &Job::new(PathBuf::from(path)),
            DocumentType::JobDescription,
            0.4,
            assessment(bucket, overall),
            Vec::new(),
        )
    }

    #[test]
    fn test_counts_and_histogram() {
        let mut report = ProcessingReport::new();
        report.record(processed("a.md", QualityBucket::High, 0.9));
        report.record(processed("b.md", QualityBucket::Low, 0.3));
        report.record(ProcessingResult::skipped(
            &Job::new(PathBuf::from("c.md")),
            SkipReason::AlreadyProcessed,
        ));
        report.record(ProcessingResult::failed(&Job::new(PathBuf::from("d.md")), "boom"));

        assert_eq!(report.total(), 4);
        assert_eq!(report.processed(), 2);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.errors(), 1);
        assert_eq!(report.success_rate(), 50.0);
        assert_eq!(report.overall_status(), OverallStatus::WithWarnings);

        let histogram = report.quality_histogram();
        assert_eq!(histogram[&QualityBucket::High], 1);
        assert_eq!(histogram[&QualityBucket::Medium], 0);
        assert_eq!(histogram[&QualityBucket::Low], 1);
        assert!((report.average_score().unwrap() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_later_record_replaces_earlier() {
        let mut report = ProcessingReport::new();
        report.record(ProcessingResult::failed(&Job::new(PathBuf::from("a.md")), "first"));
        report.record(processed("a.md", QualityBucket::Medium, 0.6));

        assert_eq!(report.total(), 1);
        assert!(report.get(Path::new("a.md")).unwrap().is_processed());
        assert_eq!(report.overall_status(), OverallStatus::Success);
    }

    #[test]
    fn test_empty_report() {
        let report = ProcessingReport::new();
        assert_eq!(report.total(), 0);
        assert_eq!(report.success_rate(), 0.0);
        assert_eq!(report.average_score(), None);
        assert_eq!(report.overall_status(), OverallStatus::Success);
    }

    #[test]
    fn test_all_failed() {
        let mut report = ProcessingReport::new();
        report.record(ProcessingResult::failed(&Job::new(PathBuf::from("a.md")), "x"));
        assert_eq!(report.overall_status(), OverallStatus::Failed);
    }

    #[test]
    fn test_json_contains_status_tags() {
        let mut report = ProcessingReport::new();
        report.record(processed("a.md", QualityBucket::High, 0.9));
        report.record(ProcessingResult::skipped(
            &Job::new(PathBuf::from("b.md")),
            SkipReason::DryRun,
        ));
        report.finish();

        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["summary"]["total"], 2);
        assert_eq!(value["summary"]["quality"]["high"], 1);
        assert_eq!(value["results"][0]["status"], "processed");
        assert_eq!(value["results"][0]["document_type"], "job_description");
        assert_eq!(value["results"][1]["status"], "skipped");
        assert_eq!(value["results"][1]["reason"], "dry_run");
    }
}
