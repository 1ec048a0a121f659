//! In-memory job coordination.
//!
//! This crate provides:
//! - Shared job handles with interior locking
//! - The process-wide job registry (lookup and enumeration)
//! - The single-worker scheduler: one running job, a FIFO wait queue
//!
//! Nothing here persists across a restart; job history is lost when the
//! process exits.

pub mod error;
pub mod registry;
pub mod scheduler;

pub use error::{QueueError, QueueResult};
pub use registry::{JobHandle, JobRegistry};
pub use scheduler::{Admission, Scheduler};
