use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use log::{debug, error, info};

use crate::error::WorkerError;
use crate::pipeline::progress::LogProgress;
use crate::pipeline::{Pipeline, PipelineConfig, PipelineContext};
use crate::report::ProcessingResult;
use crate::worker::job::Job;

pub struct WorkerPool {
    job_sender: Sender<Job>,
    result_receiver: Receiver<ProcessingResult>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Starts `worker_count` threads (at least one), each with its own
    /// `Pipeline` over the shared configuration.
    pub fn new(config: Arc<PipelineConfig>, worker_count: usize) -> Self {
        let worker_count = worker_count.max(1);
        let (job_sender, job_receiver) = bounded::<Job>(worker_count * 2);
        let (result_sender, result_receiver) = unbounded::<ProcessingResult>();

        let workers = (0..worker_count)
            .map(|worker_id| {
                let job_rx = job_receiver.clone();
                let result_tx = result_sender.clone();
                let worker_config = Arc::clone(&config);
                thread::spawn(move || {
                    run_worker(worker_id, job_rx, result_tx, worker_config);
                })
            })
            .collect();

        info!("Started {} workers", worker_count);

        Self {
            job_sender,
            result_receiver,
            workers,
        }
    }

    pub fn submit(&self, job: Job) -> Result<(), WorkerError> {
        self.job_sender
            .send(job)
            .map_err(|_| WorkerError::ChannelClosed)
    }

    /// A handle on the result channel, for a collector thread. It
    /// disconnects once every worker has stopped.
    pub fn results(&self) -> Receiver<ProcessingResult> {
        self.result_receiver.clone()
    }

    /// Closes the job queue and joins every worker once the queued jobs
    /// are processed.
    pub fn wait(self) {
        drop(self.job_sender);

        for (i, worker) in self.workers.into_iter().enumerate() {
            if let Err(e) = worker.join() {
                error!("Worker {} panicked: {:?}", i, e);
            } else {
                debug!("Worker {} finished", i);
            }
        }

        info!("All workers have stopped");
    }
}

fn run_worker(
    worker_id: usize,
    job_receiver: Receiver<Job>,
    result_sender: Sender<ProcessingResult>,
    config: Arc<PipelineConfig>,
) {
    debug!("Worker {} started", worker_id);

    let pipeline = Pipeline::from_config(config);

    for job in job_receiver.iter() {
        debug!("Worker {} processing job: {:?}", worker_id, job.source_path);
        let progress = LogProgress::new(job.file_name());
        let (result, _ctx) = pipeline.run(PipelineContext::new(job), &progress);

        if let Err(e) = result_sender.send(result) {
            error!("Worker {} failed to send result: {}", worker_id, e);
            break;
        }
    }

    debug!("Worker {} stopped", worker_id);
}
