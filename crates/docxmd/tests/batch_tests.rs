//! Batch runs over real directories: scanning, protection, idempotent
//! re-runs, parallel workers and history recording.

mod common;

use std::sync::Arc;

use assert_fs::prelude::*;

use common::{complete_job_description, partial_job_description, ConfigBuilder, TestHarness};
use docxmd::document::{parse_footer, FOOTER_MARKER};
use docxmd::safety::AllowAll;
use docxmd::{
    BatchRunner, DocumentType, HistoryStore, ProcessingOptions, ProcessingStatus, SkipReason,
    WorkerError,
};

const REPORT_TEXT: &str = "# Отчет о работе отдела\n\n## Введение\n\
    Отчет подготовлен по итогам работы за отчетный период и содержит основные показатели.\n\n\
    ## Результаты\n\
    Результаты показывают положительную динамику выручки и рост числа клиентов компании.\n\n\
    ## Выводы\n\
    Анализ показателей подтверждает выполнение плана, итоги года признаны удовлетворительными.\n";

fn status_of(report: &docxmd::ProcessingReport, path: &std::path::Path) -> ProcessingStatus {
    report.get(path).expect("result for path").status.clone()
}

#[test]
fn test_first_run_processes_and_protects() {
    let harness = TestHarness::new();
    let doc = harness.write_input("buh.md", &partial_job_description());
    let readme = harness.write_input("README.md", "# Описание каталога\n");
    let nested = harness.write_input("node_modules/pkg/notes.md", "Заметки пакета\n");

    let report = harness.run_batch(ProcessingOptions::default(), 1);

    assert_eq!(report.total(), 3);
    assert_eq!(report.processed(), 1);
    assert_eq!(report.skipped(), 2);
    assert_eq!(report.errors(), 0);
    assert!(report.finished_at.is_some());

    let result = report.get(&doc).unwrap();
    assert_eq!(result.document_type, Some(DocumentType::JobDescription));
    assert!(result.assessment.is_some());

    for protected in [&readme, &nested] {
        assert_eq!(
            status_of(&report, protected),
            ProcessingStatus::Skipped {
                reason: SkipReason::Protected
            }
        );
    }
    assert_eq!(harness.read_input("README.md"), "# Описание каталога\n");

    let written = harness.read_input("buh.md");
    assert!(written.contains(FOOTER_MARKER));
    let footer = parse_footer(&written).expect("footer");
    assert_eq!(footer.document_type, "job_description");
}

#[test]
fn test_rerun_skips_processed_files() {
    let harness = TestHarness::new();
    let doc = harness.write_input("buh.md", &partial_job_description());

    harness.run_batch(ProcessingOptions::default(), 1);
    let after_first = harness.read_input("buh.md");

    let report = harness.run_batch(ProcessingOptions::default(), 1);
    assert_eq!(
        status_of(&report, &doc),
        ProcessingStatus::Skipped {
            reason: SkipReason::AlreadyProcessed
        }
    );
    assert_eq!(harness.read_input("buh.md"), after_first);
}

#[test]
fn test_forced_rerun_keeps_single_footer_and_creation_time() {
    let harness = TestHarness::new();
    let doc = harness.write_input("buh.md", &complete_job_description());

    harness.run_batch(ProcessingOptions::default(), 1);
    let first = parse_footer(&harness.read_input("buh.md")).unwrap();

    let options = ProcessingOptions {
        force: true,
        ..ProcessingOptions::default()
    };
    let report = harness.run_batch(options, 1);
    assert_eq!(status_of(&report, &doc), ProcessingStatus::Processed);

    let written = harness.read_input("buh.md");
    assert_eq!(written.matches(FOOTER_MARKER).count(), 1);
    let second = parse_footer(&written).unwrap();
    assert_eq!(second.created_at, first.created_at);
    assert!(second.updated_at >= first.updated_at);
}

#[test]
fn test_dry_run_changes_nothing() {
    let harness = TestHarness::new();
    let doc = harness.write_input("buh.md", &partial_job_description());

    let options = ProcessingOptions {
        dry_run: true,
        ..ProcessingOptions::default()
    };
    let report = harness.run_batch(options, 1);

    assert_eq!(
        status_of(&report, &doc),
        ProcessingStatus::Skipped {
            reason: SkipReason::DryRun
        }
    );
    assert_eq!(harness.read_input("buh.md"), partial_job_description());
}

#[test]
fn test_analysis_only_run_leaves_files() {
    let harness = TestHarness::new();
    let doc = harness.write_input("buh.md", &partial_job_description());

    let options = ProcessingOptions {
        write_back: false,
        ..ProcessingOptions::default()
    };
    let report = harness.run_batch(options, 1);

    assert_eq!(status_of(&report, &doc), ProcessingStatus::Processed);
    assert_eq!(harness.read_input("buh.md"), partial_job_description());
}

#[test]
fn test_parallel_run_matches_sequential() {
    let sequential = TestHarness::new();
    let parallel = TestHarness::new();
    for harness in [&sequential, &parallel] {
        for i in 0..4 {
            harness.write_input(&format!("jd/{i}.md"), &complete_job_description());
            harness.write_input(&format!("reports/{i}.md"), REPORT_TEXT);
        }
    }

    let options = ProcessingOptions {
        write_back: false,
        ..ProcessingOptions::default()
    };
    let one = sequential.run_batch(options, 1);
    let many = parallel.run_batch(options, 4);

    assert_eq!(one.total(), 8);
    assert_eq!(many.total(), 8);
    assert_eq!(many.processed(), 8);

    let types = |report: &docxmd::ProcessingReport, root: &std::path::Path| {
        report
            .results()
            .map(|r| {
                (
                    r.path.strip_prefix(root).unwrap().to_path_buf(),
                    r.document_type,
                    r.bucket(),
                )
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(
        types(&one, &sequential.input_dir),
        types(&many, &parallel.input_dir)
    );
    assert!(many
        .results()
        .filter(|r| r.path.starts_with(parallel.input_dir.join("reports")))
        .all(|r| r.document_type == Some(DocumentType::Report)));
}

#[test]
fn test_custom_protected_pattern() {
    let config = ConfigBuilder::new().protected_file("*.draft.md").build();
    let harness = TestHarness::with_config(config);
    let draft = harness.write_input("buh.draft.md", &partial_job_description());
    let doc = harness.write_input("buh.md", &partial_job_description());

    let report = harness.run_batch(ProcessingOptions::default(), 1);

    assert_eq!(
        status_of(&report, &draft),
        ProcessingStatus::Skipped {
            reason: SkipReason::Protected
        }
    );
    assert_eq!(status_of(&report, &doc), ProcessingStatus::Processed);
}

#[test]
fn test_history_records_every_result() {
    let harness = TestHarness::new();
    harness.write_input("buh.md", &complete_job_description());
    harness.write_input("report.md", REPORT_TEXT);
    harness.write_input("README.md", "# Описание\n");

    let store = HistoryStore::open_in_memory().unwrap();
    let options = ProcessingOptions {
        write_back: false,
        ..ProcessingOptions::default()
    };
    harness.run_batch_with_history(options, store.clone());
    harness.run_batch_with_history(options, store.clone());

    let stats = store.statistics().unwrap();
    assert_eq!(stats.runs, 2);
    assert_eq!(stats.total, 6);
    assert_eq!(stats.processed, 4);
    assert_eq!(stats.skipped, 2);
    assert_eq!(stats.errors, 0);
    assert!(stats
        .by_type
        .iter()
        .any(|t| t.document_type == "job_description" && t.count == 2));
}

#[test]
fn test_scanner_ignores_reports_and_other_files() {
    let temp = assert_fs::TempDir::new().unwrap();
    let root = temp.child("converted");
    root.create_dir_all().unwrap();
    root.child("buh.md").write_str(&partial_job_description()).unwrap();
    root.child("processing_report.md").write_str("# Отчет\n").unwrap();
    root.child("processing_report_20240101_120000.md")
        .write_str("# Отчет\n")
        .unwrap();
    root.child("buh.docx").write_binary(b"PK\x03\x04").unwrap();

    let config = Arc::new(
        docxmd::PipelineConfig::from_config(&ConfigBuilder::new().build())
            .unwrap()
            .with_options(ProcessingOptions {
                write_back: false,
                ..ProcessingOptions::default()
            }),
    );
    let report = BatchRunner::new(config, Arc::new(AllowAll))
        .run_directory(root.path())
        .unwrap();

    assert_eq!(report.total(), 1);
    assert!(report.get(root.child("buh.md").path()).is_some());
    temp.close().unwrap();
}

#[test]
fn test_unreadable_file_is_reported_not_fatal() {
    let temp = assert_fs::TempDir::new().unwrap();
    let good = temp.child("good.md");
    good.write_str(&partial_job_description()).unwrap();
    let missing = temp.child("missing.md");

    let config = Arc::new(
        docxmd::PipelineConfig::from_config(&ConfigBuilder::new().build())
            .unwrap()
            .with_options(ProcessingOptions {
                write_back: false,
                ..ProcessingOptions::default()
            }),
    );
    let report = BatchRunner::new(config, Arc::new(AllowAll))
        .with_workers(2)
        .run_files(vec![good.path().to_path_buf(), missing.path().to_path_buf()]);

    assert_eq!(report.total(), 2);
    assert_eq!(report.processed(), 1);
    assert_eq!(report.errors(), 1);
    assert!(report.get(missing.path()).unwrap().is_error());
}

#[test]
fn test_missing_directory_is_an_error() {
    let harness = TestHarness::new();
    let config = harness.pipeline_config(ProcessingOptions::default());
    let result = BatchRunner::new(config, harness.policy())
        .run_directory(&harness.temp_path().join("absent"));
    assert!(matches!(result, Err(WorkerError::MissingDirectory(_))));
}
