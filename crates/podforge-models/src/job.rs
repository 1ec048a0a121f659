//! Podcast job entity and lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::content::JobResults;
use crate::stage;

/// Topic used when submission supplies none.
pub const DEFAULT_TOPIC: &str = "Current Events";

/// Host pair used when submission supplies none.
pub const DEFAULT_HOSTS: [&str; 2] = ["Alex", "Simon"];

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Job lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Job is waiting to run
    #[default]
    Queued,
    /// Job is being processed
    Running,
    /// Job completed successfully
    Completed,
    /// Job failed
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more transitions permitted).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Illegal lifecycle transition. These indicate a scheduler/runner bug,
/// not a user-facing condition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JobError {
    #[error("job {0} already started")]
    AlreadyStarted(JobId),

    #[error("job {0} already finished")]
    AlreadyFinished(JobId),

    #[error("job {0} was never started")]
    NotStarted(JobId),
}

/// One immutable entry in a job's progress log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobUpdate {
    /// Append time
    pub time: DateTime<Utc>,
    /// Human-readable progress message
    pub message: String,
    /// Stage the job was in when the entry was appended
    pub stage: String,
}

/// One pipeline run, from submission to terminal state.
#[derive(Debug, Clone)]
pub struct Job {
    /// Unique job ID
    pub id: JobId,

    /// Podcast topic
    pub topic: String,

    /// Two host display names
    pub hosts: Vec<String>,

    /// Lifecycle state
    pub status: JobStatus,

    /// Progress percent (0-100), non-decreasing
    pub progress: u8,

    /// Most recently entered stage, empty before start
    pub current_stage: String,

    /// Set once on transition to running
    pub start_time: Option<DateTime<Utc>>,

    /// Set once on transition to a terminal state
    pub end_time: Option<DateTime<Utc>>,

    /// Append-only progress log
    pub updates: Vec<JobUpdate>,

    /// Stage outputs, partial on failure
    pub results: JobResults,
}

impl Job {
    /// Create a new queued job. Missing inputs use the documented defaults.
    pub fn new(topic: Option<String>, hosts: Option<Vec<String>>) -> Self {
        Self {
            id: JobId::new(),
            topic: topic.unwrap_or_else(|| DEFAULT_TOPIC.to_string()),
            hosts: hosts
                .unwrap_or_else(|| DEFAULT_HOSTS.iter().map(|h| h.to_string()).collect()),
            status: JobStatus::Queued,
            progress: 0,
            current_stage: String::new(),
            start_time: None,
            end_time: None,
            updates: Vec::new(),
            results: JobResults::default(),
        }
    }

    /// Append a progress log entry.
    ///
    /// A `stage` differing from the current one moves the job into that
    /// stage; stages within the fixed sequence also advance `progress`.
    /// Names outside the sequence are recorded without touching progress.
    pub fn add_update(&mut self, message: impl Into<String>, stage: Option<&str>) {
        if let Some(stage) = stage {
            if stage != self.current_stage {
                self.current_stage = stage.to_string();
                if let Some(pct) = stage::progress_for(stage) {
                    // progress never moves backwards
                    self.progress = self.progress.max(pct);
                }
            }
        }

        let message = message.into();
        info!(job_id = %self.id, stage = %self.current_stage, "{}", message);

        self.updates.push(JobUpdate {
            time: Utc::now(),
            message,
            stage: self.current_stage.clone(),
        });
    }

    /// Transition queued → running and log the first update.
    pub fn start(&mut self) -> Result<(), JobError> {
        match self.status {
            JobStatus::Queued => {}
            JobStatus::Running => return Err(JobError::AlreadyStarted(self.id.clone())),
            JobStatus::Completed | JobStatus::Failed => {
                return Err(JobError::AlreadyFinished(self.id.clone()))
            }
        }

        self.status = JobStatus::Running;
        self.start_time = Some(Utc::now());
        self.add_update("Starting podcast creation process", Some(stage::RESEARCH));
        Ok(())
    }

    /// Transition running → completed/failed and log the terminal update.
    ///
    /// Progress is forced to 100 only on success; a failed job keeps the
    /// progress it reached.
    pub fn complete(&mut self, success: bool) -> Result<(), JobError> {
        if self.status.is_terminal() {
            return Err(JobError::AlreadyFinished(self.id.clone()));
        }
        if self.status == JobStatus::Queued {
            return Err(JobError::NotStarted(self.id.clone()));
        }

        self.status = if success {
            JobStatus::Completed
        } else {
            JobStatus::Failed
        };
        self.end_time = Some(Utc::now());
        if success {
            self.progress = 100;
            self.add_update("Podcast creation completed successfully", Some(stage::COMPLETE));
        } else {
            self.add_update("Podcast creation failed", None);
        }
        Ok(())
    }

    /// Serialize into the boundary representation.
    pub fn to_view(&self) -> JobView {
        JobView {
            id: self.id.to_string(),
            topic: self.topic.clone(),
            hosts: self.hosts.clone(),
            status: self.status,
            progress: self.progress,
            current_stage: self.current_stage.clone(),
            start_time: self.start_time.map(|t| t.to_rfc3339()),
            end_time: self.end_time.map(|t| t.to_rfc3339()),
            updates: self.updates.clone(),
            results: self.results.clone(),
        }
    }
}

/// Boundary-safe snapshot of a job, timestamps as RFC 3339 strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobView {
    pub id: String,
    pub topic: String,
    pub hosts: Vec<String>,
    pub status: JobStatus,
    pub progress: u8,
    pub current_stage: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub updates: Vec<JobUpdate>,
    pub results: JobResults,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_defaults() {
        let job = Job::new(None, None);
        assert_eq!(job.topic, "Current Events");
        assert_eq!(job.hosts, vec!["Alex", "Simon"]);
        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(job.progress, 0);
        assert!(job.current_stage.is_empty());
        assert!(job.updates.is_empty());
    }

    #[test]
    fn test_job_lifecycle() {
        let mut job = Job::new(Some("Space".into()), Some(vec!["Alex".into(), "Sam".into()]));

        job.start().unwrap();
        assert_eq!(job.status, JobStatus::Running);
        assert!(job.start_time.is_some());
        assert_eq!(job.current_stage, "research");
        assert_eq!(job.updates.len(), 1);
        assert_eq!(job.updates[0].stage, "research");

        job.complete(true).unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.progress, 100);
        assert!(job.end_time.is_some());
    }

    #[test]
    fn test_double_start_is_an_error() {
        let mut job = Job::new(None, None);
        job.start().unwrap();
        assert_eq!(job.start(), Err(JobError::AlreadyStarted(job.id.clone())));
    }

    #[test]
    fn test_double_complete_is_an_error() {
        let mut job = Job::new(None, None);
        job.start().unwrap();
        job.complete(false).unwrap();
        assert_eq!(job.complete(true), Err(JobError::AlreadyFinished(job.id.clone())));
        assert_eq!(job.status, JobStatus::Failed);
    }

    #[test]
    fn test_complete_before_start_is_an_error() {
        let mut job = Job::new(None, None);
        assert_eq!(job.complete(true), Err(JobError::NotStarted(job.id.clone())));
    }

    #[test]
    fn test_progress_follows_stage_sequence() {
        let mut job = Job::new(None, None);
        job.start().unwrap();
        assert_eq!(job.progress, 0);

        job.add_update("summarizing", Some("summarize"));
        assert_eq!(job.progress, 20);
        job.add_update("writing script", Some("script"));
        assert_eq!(job.progress, 40);
        job.add_update("synthesizing", Some("voice"));
        assert_eq!(job.progress, 60);
    }

    #[test]
    fn test_unknown_stage_keeps_progress() {
        let mut job = Job::new(None, None);
        job.start().unwrap();
        job.add_update("writing script", Some("script"));
        assert_eq!(job.progress, 40);

        job.add_update("something went sideways", Some("error"));
        assert_eq!(job.progress, 40);
        assert_eq!(job.current_stage, "error");
        assert_eq!(job.updates.last().unwrap().stage, "error");
    }

    #[test]
    fn test_progress_is_monotonic() {
        let mut job = Job::new(None, None);
        job.start().unwrap();
        job.add_update("writing script", Some("script"));
        assert_eq!(job.progress, 40);

        // Re-entering an earlier stage never lowers progress
        job.add_update("back to research", Some("research"));
        assert_eq!(job.progress, 40);
    }

    #[test]
    fn test_success_after_fallback_still_reaches_100() {
        let mut job = Job::new(None, None);
        job.start().unwrap();
        job.add_update("fallback installed", Some("script"));
        job.complete(true).unwrap();
        assert_eq!(job.progress, 100);
        assert_eq!(job.current_stage, "complete");
    }

    #[test]
    fn test_failed_job_keeps_progress() {
        let mut job = Job::new(None, None);
        job.start().unwrap();
        job.add_update("summarizing", Some("summarize"));
        job.complete(false).unwrap();
        assert_eq!(job.progress, 20);
        assert_eq!(job.status, JobStatus::Failed);
        // terminal update keeps the current stage
        assert_eq!(job.updates.last().unwrap().stage, "summarize");
    }

    #[test]
    fn test_view_serializes_timestamps_as_strings() {
        let mut job = Job::new(None, None);
        let view = job.to_view();
        assert!(view.start_time.is_none());

        job.start().unwrap();
        let view = job.to_view();
        assert!(view.start_time.is_some());
        assert!(view.end_time.is_none());
        assert_eq!(view.status, JobStatus::Running);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status"], "running");
        assert!(json["start_time"].is_string());
        assert!(json["updates"].as_array().is_some());
    }
}
