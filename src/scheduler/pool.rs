//! The job dispatcher: partitions the rule corpus into batches and feeds a
//! fixed pool of workers over a pull-based message protocol.
//!
//! Workers never receive a new job until they report completion of the
//! previous one, which bounds in-flight work. The dispatcher is the sole
//! writer to every job channel and the sole reader of the report channel;
//! the only authoritative dedup collection lives here.

use crate::dedup::DedupSets;
use crate::search::{ScaleError, SearchContext};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::worker::{spawn_worker, Job, WorkerHandle, WorkerReport};

#[cfg(feature = "tracing")]
use crate::trace::{debug, warn};

/// How long to wait on the report channel before checking worker liveness.
const REPORT_POLL: Duration = Duration::from_millis(50);

/// Configuration for the worker pool.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of worker threads.
    pub workers: usize,
    /// Rule entries per job batch.
    pub batch_size: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            batch_size: 100,
        }
    }
}

/// Worker count for this machine: one processing unit is reserved for the
/// dispatcher thread, with a floor of one worker.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .saturating_sub(1)
        .max(1)
}

/// Counters for one pool run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub workers_spawned: usize,
    pub jobs_dispatched: usize,
    pub jobs_completed: usize,
    pub sets_merged: usize,
}

/// Result of a completed pool run.
#[derive(Debug)]
pub struct PoolRun {
    /// The merged, authoritative dedup collection.
    pub sets: DedupSets,
    pub stats: PoolStats,
}

/// A worker error is fatal to the whole run; no partial results are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// A rule exceeded the enumeration scale limit.
    Scale(ScaleError),
    /// A worker terminated without reporting.
    WorkerPanic { worker: usize },
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::Scale(e) => write!(f, "{}", e),
            PoolError::WorkerPanic { worker } => {
                write!(f, "worker {} terminated abnormally", worker)
            }
        }
    }
}

impl std::error::Error for PoolError {}

impl From<ScaleError> for PoolError {
    fn from(e: ScaleError) -> Self {
        PoolError::Scale(e)
    }
}

/// Run the full mine over the context's rule index.
///
/// Batches are formed ahead of time; each worker gets one job at spawn and
/// one more per completion report until the queue drains, then its job
/// channel closes and it exits. The dispatcher returns once every spawned
/// worker has terminated.
pub fn run_pool(ctx: Arc<SearchContext>, config: &PoolConfig) -> Result<PoolRun, PoolError> {
    let batch_size = config.batch_size.max(1);
    let mut pending: VecDeque<Job> = ctx
        .rules
        .entries()
        .chunks(batch_size)
        .map(|chunk| Job {
            batch: chunk.to_vec(),
        })
        .collect();

    let mut stats = PoolStats::default();
    let mut merged = DedupSets::new();
    if pending.is_empty() {
        return Ok(PoolRun {
            sets: merged,
            stats,
        });
    }

    // Never spawn more workers than there are batches to hand out.
    let worker_count = config.workers.max(1).min(pending.len());
    let (report_tx, report_rx) = crossbeam_channel::bounded(worker_count);

    let mut workers: Vec<WorkerHandle> = Vec::with_capacity(worker_count);
    for id in 0..worker_count {
        let Some(job) = pending.pop_front() else {
            break;
        };
        let handle = spawn_worker(id, Arc::clone(&ctx), report_tx.clone());
        let sent = match &handle.jobs {
            // capacity 1 and empty: this cannot block
            Some(tx) => tx.send(job).is_ok(),
            None => false,
        };
        workers.push(handle);
        if !sent {
            shut_down(workers, report_rx);
            return Err(PoolError::WorkerPanic { worker: id });
        }
        stats.workers_spawned += 1;
        stats.jobs_dispatched += 1;
    }
    // Keep only the workers' clones so disconnection tracks their exits.
    drop(report_tx);

    #[cfg(feature = "tracing")]
    debug!(
        workers = stats.workers_spawned,
        batches = stats.jobs_dispatched + pending.len(),
        "pool started"
    );

    let mut live = workers.len();
    while live > 0 {
        match report_rx.recv_timeout(REPORT_POLL) {
            Ok(WorkerReport::Finished { worker, sets }) => {
                stats.jobs_completed += 1;
                stats.sets_merged += sets.len();
                merged.absorb(sets);

                let Some(slot) = workers.get_mut(worker) else {
                    debug_assert!(false, "report from unknown worker {}", worker);
                    continue;
                };
                match pending.pop_front() {
                    Some(job) => {
                        let sent = match &slot.jobs {
                            Some(tx) => tx.send(job).is_ok(),
                            None => false,
                        };
                        if !sent {
                            shut_down(workers, report_rx);
                            return Err(PoolError::WorkerPanic { worker });
                        }
                        stats.jobs_dispatched += 1;
                    }
                    None => {
                        // queue drained: close this worker's channel
                        slot.jobs = None;
                        live -= 1;
                    }
                }
            }
            Ok(WorkerReport::Failed { worker, error }) => {
                #[cfg(feature = "tracing")]
                warn!(worker, "job failed, aborting run");
                let _ = worker;
                shut_down(workers, report_rx);
                return Err(PoolError::Scale(error));
            }
            Err(RecvTimeoutError::Timeout) => {
                // A worker that exited while still owed work died without
                // reporting. Only classify after the report queue is empty,
                // so a final report is never mistaken for a crash.
                if report_rx.is_empty() {
                    if let Some(worker) = workers
                        .iter()
                        .position(|w| w.jobs.is_some() && w.thread.is_finished())
                    {
                        shut_down(workers, report_rx);
                        return Err(PoolError::WorkerPanic { worker });
                    }
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                let worker = workers
                    .iter()
                    .position(|w| w.jobs.is_some())
                    .unwrap_or(0);
                shut_down(workers, report_rx);
                return Err(PoolError::WorkerPanic { worker });
            }
        }
    }

    for handle in workers {
        let WorkerHandle { id, jobs, thread } = handle;
        drop(jobs);
        if thread.join().is_err() {
            return Err(PoolError::WorkerPanic { worker: id });
        }
    }

    #[cfg(feature = "tracing")]
    debug!(
        jobs = stats.jobs_completed,
        members = merged.len(),
        "pool finished"
    );

    Ok(PoolRun {
        sets: merged,
        stats,
    })
}

/// Close every job channel and wait for the threads to wind down.
fn shut_down(mut workers: Vec<WorkerHandle>, reports: Receiver<WorkerReport>) {
    drop(reports);
    for worker in &mut workers {
        worker.jobs = None;
    }
    for worker in workers {
        let _ = worker.thread.join();
    }
}
