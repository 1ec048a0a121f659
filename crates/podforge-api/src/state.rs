//! Application state.

use std::sync::Arc;

use podforge_queue::{JobRegistry, Scheduler};
use podforge_worker::{
    ContentGenerator, JobExecutor, OllamaClient, OllamaGenerator, PipelineConfig,
    PipelineContext, ResearchProvider, WebSearch,
};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub registry: Arc<JobRegistry>,
    pub scheduler: Arc<Scheduler>,
    pub executor: Arc<JobExecutor>,
    pub ollama: Arc<OllamaClient>,
    /// Model configured for the generation stages
    pub model: String,
}

impl AppState {
    /// Create application state with the default collaborators.
    pub fn new(config: ApiConfig, pipeline: PipelineConfig) -> Self {
        let ollama = OllamaClient::new(pipeline.ollama_base_url.clone());
        let generator = OllamaGenerator::new(ollama.clone(), pipeline.model.clone());
        Self::with_collaborators(config, pipeline, Arc::new(WebSearch), Arc::new(generator))
    }

    /// Create application state with explicit collaborators.
    pub fn with_collaborators(
        config: ApiConfig,
        pipeline: PipelineConfig,
        research: Arc<dyn ResearchProvider>,
        generator: Arc<dyn ContentGenerator>,
    ) -> Self {
        let registry = Arc::new(JobRegistry::new());
        let scheduler = Arc::new(Scheduler::new());
        let ollama = Arc::new(OllamaClient::new(pipeline.ollama_base_url.clone()));
        let model = pipeline.model.clone();

        let ctx = Arc::new(PipelineContext {
            research,
            generator,
            config: pipeline,
        });
        let executor = Arc::new(JobExecutor::new(
            Arc::clone(&registry),
            Arc::clone(&scheduler),
            ctx,
        ));

        Self {
            config,
            registry,
            scheduler,
            executor,
            ollama,
            model,
        }
    }
}
