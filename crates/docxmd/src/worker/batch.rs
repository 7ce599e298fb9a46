use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use log::{debug, error, info, warn};

use crate::error::WorkerError;
use crate::history::HistoryStore;
use crate::pipeline::{LogProgress, Pipeline, PipelineConfig, PipelineContext};
use crate::report::{ProcessingReport, ProcessingResult, SkipReason};
use crate::safety::ProtectionPolicy;
use crate::worker::job::Job;
use crate::worker::pool::WorkerPool;
use crate::worker::scanner::DirectoryScanner;

const COLLECTOR_LOST: &str = "result collector stopped before recording this file";

/// Runs the pipeline over a set of files and collects one report.
pub struct BatchRunner {
    config: Arc<PipelineConfig>,
    policy: Arc<dyn ProtectionPolicy>,
    history: Option<HistoryStore>,
    worker_count: usize,
}

impl BatchRunner {
    pub fn new(config: Arc<PipelineConfig>, policy: Arc<dyn ProtectionPolicy>) -> Self {
        Self {
            config,
            policy,
            history: None,
            worker_count: 1,
        }
    }

    pub fn with_history(mut self, history: HistoryStore) -> Self {
        self.history = Some(history);
        self
    }

    pub fn with_workers(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count.max(1);
        self
    }

    pub fn run_directory(&self, dir: &Path) -> Result<ProcessingReport, WorkerError> {
        let jobs = DirectoryScanner::new(dir).scan()?;
        Ok(self.run_jobs(jobs))
    }

    pub fn run_files(&self, paths: Vec<PathBuf>) -> ProcessingReport {
        self.run_jobs(paths.into_iter().map(Job::new).collect())
    }

    fn run_jobs(&self, jobs: Vec<Job>) -> ProcessingReport {
        let mut collector = Collector::new(self.history.clone());
        let _span = tracing::info_span!("batch", run_id = %collector.report.run_id).entered();
        let started = Instant::now();

        let (protected, queued): (Vec<Job>, Vec<Job>) = jobs
            .into_iter()
            .partition(|job| self.policy.is_protected(&job.source_path));
        for job in &protected {
            debug!("Skipping protected file: {}", job.source_path.display());
            collector.record(ProcessingResult::skipped(job, SkipReason::Protected));
        }

        info!(
            "Processing {} files ({} protected) with {} worker(s)",
            queued.len(),
            protected.len(),
            self.worker_count
        );

        let mut report = if self.worker_count <= 1 || queued.len() <= 1 {
            self.run_sequential(collector, queued)
        } else {
            self.run_parallel(collector, queued)
        };
        report.finish();

        info!(
            "Batch {} finished in {:.2}s: {} processed, {} skipped, {} errors",
            report.run_id,
            started.elapsed().as_secs_f64(),
            report.processed(),
            report.skipped(),
            report.errors()
        );
        report
    }

    fn run_sequential(&self, mut collector: Collector, jobs: Vec<Job>) -> ProcessingReport {
        let pipeline = Pipeline::from_config(Arc::clone(&self.config));
        for job in jobs {
            let progress = LogProgress::new(job.file_name());
            let (result, _ctx) = pipeline.run(PipelineContext::new(job), &progress);
            collector.record(result);
        }
        collector.report
    }

    fn run_parallel(&self, collector: Collector, jobs: Vec<Job>) -> ProcessingReport {
        let pool = WorkerPool::new(Arc::clone(&self.config), self.worker_count);
        let run_id = collector.report.run_id.clone();
        let results = pool.results();

        let handle = thread::spawn(move || {
            let mut collector = collector;
            for result in results.iter() {
                collector.record(result);
            }
            collector
        });

        let submitted = jobs.clone();
        let mut rejected = Vec::new();
        for job in jobs {
            let fallback = job.clone();
            if let Err(e) = pool.submit(job) {
                warn!("Could not queue {}: {}", fallback.source_path.display(), e);
                rejected.push(ProcessingResult::failed(&fallback, e.to_string()));
            }
        }
        pool.wait();

        match handle.join() {
            Ok(mut collector) => {
                for result in rejected {
                    collector.record(result);
                }
                collector.report
            }
            Err(e) => {
                error!("Result collector for batch {} panicked: {:?}", run_id, e);
                collector_lost_report(run_id, &submitted)
            }
        }
    }
}

/// Every job of a batch whose result collector died counts as failed.
fn collector_lost_report(run_id: String, jobs: &[Job]) -> ProcessingReport {
    let mut report = ProcessingReport::new();
    report.run_id = run_id;
    for job in jobs {
        report.record(ProcessingResult::failed(job, COLLECTOR_LOST));
    }
    report
}

/// Single owner of the report and the history handle during a batch.
struct Collector {
    report: ProcessingReport,
    history: Option<HistoryStore>,
}

impl Collector {
    fn new(history: Option<HistoryStore>) -> Self {
        Self {
            report: ProcessingReport::new(),
            history,
        }
    }

    fn record(&mut self, result: ProcessingResult) {
        if let Some(history) = &self.history {
            if let Err(e) = history.append(&self.report.run_id, &result) {
                warn!("Failed to record history for {}: {}", result.path.display(), e);
            }
        }
        self.report.record(result);
    }
}
