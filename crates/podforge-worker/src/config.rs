//! Pipeline configuration.

/// Knobs for the pipeline collaborators.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Ollama API base URL
    pub ollama_base_url: String,
    /// Model used for the generation stages
    pub model: String,
    /// Search results requested per research pass
    pub research_results: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            ollama_base_url: "http://localhost:11434".to_string(),
            model: "deepseek-coder:7b-instruct".to_string(),
            research_results: 5,
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ollama_base_url: std::env::var("OLLAMA_BASE_URL")
                .unwrap_or(defaults.ollama_base_url),
            model: std::env::var("MODEL").unwrap_or(defaults.model),
            research_results: std::env::var("RESEARCH_RESULTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.research_results),
        }
    }
}
