//! Job executor: submission glue and the background run loop.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use podforge_models::Job;
use podforge_queue::{Admission, JobHandle, JobRegistry, QueueResult, Scheduler};
use tracing::{error, info};

use crate::pipeline::{self, PipelineContext};

/// Accepts job submissions and keeps at most one pipeline running.
///
/// A single background task runs the admitted job and then keeps draining
/// the wait queue in FIFO order. A job that never reaches a terminal state
/// would block the queue forever, so the pipeline body is additionally
/// caught on panic and the scheduler slot released on every exit path.
pub struct JobExecutor {
    registry: Arc<JobRegistry>,
    scheduler: Arc<Scheduler>,
    ctx: Arc<PipelineContext>,
}

impl JobExecutor {
    pub fn new(
        registry: Arc<JobRegistry>,
        scheduler: Arc<Scheduler>,
        ctx: Arc<PipelineContext>,
    ) -> Self {
        Self {
            registry,
            scheduler,
            ctx,
        }
    }

    /// Create, register, and admit a job.
    ///
    /// When the worker is idle the pipeline starts on a background task
    /// before this returns; otherwise the job waits in the queue.
    pub fn submit(
        &self,
        topic: Option<String>,
        hosts: Option<Vec<String>>,
    ) -> QueueResult<(JobHandle, Admission)> {
        let job = JobHandle::new(Job::new(topic, hosts));
        self.registry.register(job.clone())?;

        let admission = self.scheduler.submit(job.clone());
        if admission == Admission::Started {
            self.spawn_runner(job.clone());
        }
        Ok((job, admission))
    }

    fn spawn_runner(&self, job: JobHandle) {
        let ctx = Arc::clone(&self.ctx);
        let scheduler = Arc::clone(&self.scheduler);

        tokio::spawn(async move {
            let mut current = job;
            loop {
                info!(job_id = %current.id(), "starting pipeline");
                let outcome = AssertUnwindSafe(pipeline::run(&ctx, &current))
                    .catch_unwind()
                    .await;

                if outcome.is_err() {
                    error!(job_id = %current.id(), "pipeline task panicked");
                    current.with(|j| {
                        if !j.status.is_terminal() {
                            j.add_update("Error: pipeline task panicked", None);
                            if let Err(err) = j.complete(false) {
                                error!(job_id = %j.id, "could not fail job after panic: {err}");
                            }
                        }
                    });
                }

                match scheduler.finish_current() {
                    Some(next) => current = next,
                    None => break,
                }
            }
        });
    }
}
