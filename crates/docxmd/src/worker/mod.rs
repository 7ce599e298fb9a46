pub mod batch;
pub mod job;
pub mod pool;
pub mod scanner;

pub use batch::BatchRunner;
pub use job::Job;
pub use pool::WorkerPool;
pub use scanner::DirectoryScanner;

// Re-export crossbeam_channel for callers draining results
pub use crossbeam_channel;
