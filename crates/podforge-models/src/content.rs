//! Result payloads and the content-generator output variant.

use serde::{Deserialize, Serialize};

/// One web search result from the research collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchSource {
    /// Headline of the result
    pub title: String,
    /// Source URL
    pub url: String,
    /// Short excerpt
    pub snippet: String,
    /// Publication date (YYYY-MM-DD)
    pub date: String,
}

/// Accumulated research output for a job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchFindings {
    /// Sources returned by the search
    pub sources: Vec<ResearchSource>,
    /// Trending topics derived from the sources
    pub topics: Vec<String>,
}

/// Voice-synthesis handoff produced by the generation stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioDetails {
    /// Delivery instructions for the speech synthesizer
    pub voice_instructions: String,
}

impl AudioDetails {
    /// Default delivery instructions naming the hosts.
    pub fn conversational(hosts: &[String]) -> Self {
        Self {
            voice_instructions: format!("Use a conversational tone for {}.", hosts.join(", ")),
        }
    }
}

/// Per-stage outputs accumulated while a job runs; partial on failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub research: Option<ResearchFindings>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub script: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_details: Option<AudioDetails>,
}

/// What the content-generation collaborator handed back.
///
/// The shape is decided once at the collaborator boundary; downstream code
/// matches on the variant instead of sniffing types. The `Structured`
/// payload stays a raw JSON value so malformed content is representable:
/// a non-object payload degrades to fallback content instead of failing
/// the job.
#[derive(Debug, Clone)]
pub enum GenerationOutput {
    /// Structured result with recognized fields (`research`, `summary`,
    /// `script`, `audio_details`); unrecognized fields are ignored.
    Structured(serde_json::Value),
    /// Unstructured text, treated as the whole script.
    PlainText(String),
    /// Explicit failure signal.
    Error(String),
}

impl GenerationOutput {
    /// Extract an explicit failure signal, if any.
    ///
    /// Besides the `Error` variant, an `"Error:"`-prefixed plain-text body
    /// or structured summary counts as a failure signal.
    pub fn error_message(&self) -> Option<String> {
        match self {
            GenerationOutput::Error(message) => Some(message.clone()),
            GenerationOutput::PlainText(text) if text.starts_with("Error:") => Some(text.clone()),
            GenerationOutput::Structured(value) => value
                .get("summary")
                .and_then(|v| v.as_str())
                .filter(|s| s.starts_with("Error:"))
                .map(str::to_string),
            GenerationOutput::PlainText(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_variant_is_a_failure_signal() {
        let output = GenerationOutput::Error("Error: model offline".into());
        assert_eq!(output.error_message().as_deref(), Some("Error: model offline"));
    }

    #[test]
    fn test_error_prefixed_text_is_a_failure_signal() {
        let output = GenerationOutput::PlainText("Error: ran out of tokens".into());
        assert!(output.error_message().is_some());

        let output = GenerationOutput::PlainText("A perfectly fine script".into());
        assert!(output.error_message().is_none());
    }

    #[test]
    fn test_error_prefixed_structured_summary_is_a_failure_signal() {
        let output = GenerationOutput::Structured(json!({"summary": "Error: crew failed"}));
        assert!(output.error_message().is_some());

        let output = GenerationOutput::Structured(json!({"summary": "All good"}));
        assert!(output.error_message().is_none());

        // A non-string summary is not a failure signal
        let output = GenerationOutput::Structured(json!({"summary": 42}));
        assert!(output.error_message().is_none());
    }
}
