//! Content-generation collaborator boundary.

use async_trait::async_trait;
use podforge_models::{GenerationOutput, JobId};

use crate::error::WorkerResult;

/// Callback used by a generator to forward `(message, stage)` progress
/// into the job's update log.
pub type UpdateSink<'a> = &'a (dyn Fn(&str, Option<&str>) + Send + Sync);

/// Produces the summarize/script/voice content for one job.
///
/// Implementations report intermediate progress through `on_update`; the
/// final payload is classified once into a [`GenerationOutput`] variant at
/// this boundary.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(
        &self,
        topic: &str,
        hosts: &[String],
        job_id: &JobId,
        on_update: UpdateSink<'_>,
    ) -> WorkerResult<GenerationOutput>;
}
