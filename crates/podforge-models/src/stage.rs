//! The fixed pipeline stage sequence.
//!
//! Every job moves through the same ordered stages; progress is derived from
//! the index of the current stage. Update entries may carry tags outside the
//! sequence (e.g. `"error"`); those are recorded but never move progress.

/// Ordered stage names, constant across all jobs.
pub const STAGES: [&str; 5] = ["research", "summarize", "script", "voice", "complete"];

pub const RESEARCH: &str = "research";
pub const SUMMARIZE: &str = "summarize";
pub const SCRIPT: &str = "script";
pub const VOICE: &str = "voice";
pub const COMPLETE: &str = "complete";

/// Index of a stage within the sequence, if it is part of it.
pub fn position(stage: &str) -> Option<usize> {
    STAGES.iter().position(|s| *s == stage)
}

/// Progress percent for entering a stage: `floor(index / len * 100)`.
///
/// Returns `None` for names outside the sequence.
pub fn progress_for(stage: &str) -> Option<u8> {
    position(stage).map(|index| (index * 100 / STAGES.len()) as u8)
}
