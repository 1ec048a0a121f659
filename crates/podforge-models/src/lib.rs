//! Shared data models for the Podforge backend.
//!
//! This crate provides Serde-serializable types for:
//! - Podcast jobs and their lifecycle state
//! - The fixed pipeline stage sequence
//! - Research/generation result payloads
//! - The content-generator output variant

pub mod content;
pub mod job;
pub mod stage;

// Re-export common types
pub use content::{AudioDetails, GenerationOutput, JobResults, ResearchFindings, ResearchSource};
pub use job::{Job, JobError, JobId, JobStatus, JobUpdate, JobView, DEFAULT_HOSTS, DEFAULT_TOPIC};
pub use stage::STAGES;
