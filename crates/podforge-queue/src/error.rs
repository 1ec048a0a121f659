//! Queue error types.

use podforge_models::JobId;
use thiserror::Error;

pub type QueueResult<T> = Result<T, QueueError>;

#[derive(Debug, Error)]
pub enum QueueError {
    /// Duplicate registration means id generation broke; treated as an
    /// invariant violation, not a user-facing condition.
    #[error("job {0} already registered")]
    DuplicateJob(JobId),

    #[error("job {0} not found")]
    JobNotFound(JobId),
}
