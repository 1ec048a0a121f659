//! Single-worker scheduler: one running job, a FIFO wait queue.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use podforge_models::JobId;
use tracing::{debug, warn};

use crate::registry::JobHandle;

/// Outcome of submitting a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The worker was idle; the caller must start the pipeline now.
    Started,
    /// A job is already running; the job waits at this 1-indexed position.
    Enqueued { position: usize },
}

#[derive(Debug, Default)]
struct SchedulerState {
    running: Option<JobId>,
    queue: VecDeque<JobHandle>,
}

/// Decides whether a submitted job runs immediately or waits, and hands
/// out the next queued job when the running one finishes.
///
/// Admission has no priority, cancellation, or reordering; capacity is
/// bounded only by process memory.
#[derive(Debug, Default)]
pub struct Scheduler {
    state: Mutex<SchedulerState>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a job: run now if the worker is idle, otherwise append to the
    /// wait queue and record the queue position in the job's log.
    pub fn submit(&self, job: JobHandle) -> Admission {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if state.running.is_none() {
            state.running = Some(job.id().clone());
            debug!(job_id = %job.id(), "job admitted to run immediately");
            Admission::Started
        } else {
            state.queue.push_back(job.clone());
            let position = state.queue.len();
            job.with(|j| {
                j.add_update(format!("Job added to queue. Position: {position}"), None);
            });
            Admission::Enqueued { position }
        }
    }

    /// Release the running slot after a job reached a terminal state.
    ///
    /// Returns the next queued job, if any, already marked running; the
    /// caller must start its pipeline immediately. Called exactly once per
    /// finished job.
    pub fn finish_current(&self) -> Option<JobHandle> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if state.running.is_none() {
            warn!("finish_current called with no running job");
        }
        state.running = None;

        let next = state.queue.pop_front()?;
        state.running = Some(next.id().clone());
        debug!(job_id = %next.id(), "dequeued next job");
        Some(next)
    }

    /// Current running job id, if any.
    pub fn current_job_id(&self) -> Option<JobId> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.running.clone()
    }

    /// Number of jobs waiting in the queue.
    pub fn queue_len(&self) -> usize {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podforge_models::Job;

    fn job() -> JobHandle {
        JobHandle::new(Job::new(None, None))
    }

    #[test]
    fn test_idle_submission_starts_immediately() {
        let scheduler = Scheduler::new();
        let a = job();

        assert_eq!(scheduler.submit(a.clone()), Admission::Started);
        assert_eq!(scheduler.current_job_id(), Some(a.id().clone()));
        assert_eq!(scheduler.queue_len(), 0);
    }

    #[test]
    fn test_busy_submissions_queue_in_order() {
        let scheduler = Scheduler::new();
        let a = job();
        let b = job();
        let c = job();

        scheduler.submit(a.clone());
        assert_eq!(scheduler.submit(b.clone()), Admission::Enqueued { position: 1 });
        assert_eq!(scheduler.submit(c.clone()), Admission::Enqueued { position: 2 });
        assert_eq!(scheduler.queue_len(), 2);
        // the running job never changed
        assert_eq!(scheduler.current_job_id(), Some(a.id().clone()));

        // queued jobs carry a position update
        let update = b.with(|j| j.updates.last().unwrap().message.clone());
        assert_eq!(update, "Job added to queue. Position: 1");
        let update = c.with(|j| j.updates.last().unwrap().message.clone());
        assert_eq!(update, "Job added to queue. Position: 2");
    }

    #[test]
    fn test_finish_hands_out_jobs_fifo() {
        let scheduler = Scheduler::new();
        let a = job();
        let b = job();
        let c = job();

        scheduler.submit(a.clone());
        scheduler.submit(b.clone());
        scheduler.submit(c.clone());

        let next = scheduler.finish_current().expect("b should be next");
        assert_eq!(next.id(), b.id());
        assert_eq!(scheduler.current_job_id(), Some(b.id().clone()));
        assert_eq!(scheduler.queue_len(), 1);

        let next = scheduler.finish_current().expect("c should be next");
        assert_eq!(next.id(), c.id());

        assert!(scheduler.finish_current().is_none());
        assert_eq!(scheduler.current_job_id(), None);
        assert_eq!(scheduler.queue_len(), 0);
    }

    #[test]
    fn test_submission_after_drain_starts_immediately() {
        let scheduler = Scheduler::new();
        scheduler.submit(job());
        assert!(scheduler.finish_current().is_none());

        let b = job();
        assert_eq!(scheduler.submit(b.clone()), Admission::Started);
        assert_eq!(scheduler.current_job_id(), Some(b.id().clone()));
    }
}
