//! Worker side of the pull-based job protocol.
//!
//! A worker owns no shared mutable state: it receives immutable corpus
//! inputs at spawn time, then only messages cross the boundary - a job
//! batch in, a result batch out. Reporting a result doubles as the pull
//! for more work; the worker exits cleanly when its job channel closes.

use crate::dedup::DedupSets;
use crate::props::PropSet;
use crate::search::{search_batch, ScaleError, SearchContext};
use crate::symbol::RuleId;
use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;

#[cfg(feature = "tracing")]
use crate::trace::trace;

/// One batch of rule entries assigned to a worker for one round of matching.
#[derive(Debug)]
pub struct Job {
    pub batch: Vec<(RuleId, PropSet)>,
}

/// Worker-to-dispatcher message.
#[derive(Debug)]
pub enum WorkerReport {
    /// The job is done; `sets` is the worker's partial dedup collection.
    /// Doubles as the request for the next job.
    Finished { worker: usize, sets: DedupSets },
    /// The job failed; the whole run must abort.
    Failed { worker: usize, error: ScaleError },
}

/// Handle kept by the dispatcher for one spawned worker.
pub struct WorkerHandle {
    pub id: usize,
    /// Job channel; dropping it tells the worker to exit.
    pub jobs: Option<Sender<Job>>,
    pub thread: JoinHandle<()>,
}

/// Spawn a worker thread with its own bounded job channel.
pub fn spawn_worker(
    id: usize,
    ctx: Arc<SearchContext>,
    reports: Sender<WorkerReport>,
) -> WorkerHandle {
    let (job_tx, job_rx) = crossbeam_channel::bounded(1);
    let thread = std::thread::spawn(move || worker_loop(id, ctx, job_rx, reports));
    WorkerHandle {
        id,
        jobs: Some(job_tx),
        thread,
    }
}

fn worker_loop(
    id: usize,
    ctx: Arc<SearchContext>,
    jobs: Receiver<Job>,
    reports: Sender<WorkerReport>,
) {
    while let Ok(job) = jobs.recv() {
        #[cfg(feature = "tracing")]
        trace!(worker = id, rules = job.batch.len(), "job received");

        let mut sets = DedupSets::new();
        match search_batch(&ctx, &job.batch, &mut sets) {
            Ok(()) => {
                if reports.send(WorkerReport::Finished { worker: id, sets }).is_err() {
                    // dispatcher is gone; nothing left to do
                    return;
                }
            }
            Err(error) => {
                let _ = reports.send(WorkerReport::Failed { worker: id, error });
                return;
            }
        }
    }
}
