//! Shared job handles and the process-wide registry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use podforge_models::{Job, JobId, JobView};

use crate::error::{QueueError, QueueResult};

/// Shared, lock-protected job.
///
/// Updates are appended from the pipeline task while status polls read
/// concurrently, so every access goes through the lock. The lock is only
/// ever held for in-memory work, never across an await point.
#[derive(Debug, Clone)]
pub struct JobHandle {
    id: JobId,
    inner: Arc<Mutex<Job>>,
}

impl JobHandle {
    pub fn new(job: Job) -> Self {
        Self {
            id: job.id.clone(),
            inner: Arc::new(Mutex::new(job)),
        }
    }

    /// The job's id, readable without taking the lock.
    pub fn id(&self) -> &JobId {
        &self.id
    }

    /// Run `f` with exclusive access to the job.
    ///
    /// A poisoned lock is recovered rather than propagated: a panicked
    /// pipeline task must not make the job unreadable or wedge the
    /// scheduler.
    pub fn with<R>(&self, f: impl FnOnce(&mut Job) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Snapshot the job for the presentation boundary.
    pub fn view(&self) -> JobView {
        self.with(|job| job.to_view())
    }
}

/// Mapping from job id to job, append-only for the process lifetime.
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: RwLock<HashMap<JobId, JobHandle>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a job by id. Errors if the id is already present.
    pub fn register(&self, job: JobHandle) -> QueueResult<()> {
        let mut jobs = self.jobs.write().unwrap_or_else(PoisonError::into_inner);
        if jobs.contains_key(job.id()) {
            return Err(QueueError::DuplicateJob(job.id().clone()));
        }
        jobs.insert(job.id().clone(), job);
        Ok(())
    }

    /// Look up a job by id.
    pub fn get(&self, id: &JobId) -> Option<JobHandle> {
        let jobs = self.jobs.read().unwrap_or_else(PoisonError::into_inner);
        jobs.get(id).cloned()
    }

    /// Snapshot of all registered jobs. Order is unspecified; callers
    /// sort client-side.
    pub fn list_all(&self) -> Vec<JobHandle> {
        let jobs = self.jobs.read().unwrap_or_else(PoisonError::into_inner);
        jobs.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        let jobs = self.jobs.read().unwrap_or_else(PoisonError::into_inner);
        jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get() {
        let registry = JobRegistry::new();
        let job = JobHandle::new(Job::new(Some("Space".into()), None));
        let id = job.id().clone();

        registry.register(job).unwrap();
        let found = registry.get(&id).expect("job should be registered");
        assert_eq!(found.with(|j| j.topic.clone()), "Space");
        assert!(registry.get(&JobId::new()).is_none());
    }

    #[test]
    fn test_duplicate_registration_is_an_error() {
        let registry = JobRegistry::new();
        let job = JobHandle::new(Job::new(None, None));

        registry.register(job.clone()).unwrap();
        assert!(matches!(
            registry.register(job),
            Err(QueueError::DuplicateJob(_))
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_list_all_snapshots_every_job() {
        let registry = JobRegistry::new();
        for _ in 0..3 {
            registry.register(JobHandle::new(Job::new(None, None))).unwrap();
        }
        assert_eq!(registry.list_all().len(), 3);
    }

    #[test]
    fn test_handle_mutation_is_visible_through_registry() {
        let registry = JobRegistry::new();
        let job = JobHandle::new(Job::new(None, None));
        let id = job.id().clone();
        registry.register(job.clone()).unwrap();

        job.with(|j| j.start()).unwrap();
        let view = registry.get(&id).unwrap().view();
        assert_eq!(view.status, podforge_models::JobStatus::Running);
        assert_eq!(view.updates.len(), 1);
    }
}
