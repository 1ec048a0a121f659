//! Ollama model client and the content generator built on it.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use podforge_models::{stage, AudioDetails, GenerationOutput, JobId};

use crate::error::WorkerResult;
use crate::generator::{ContentGenerator, UpdateSink};

/// Thin client for the Ollama HTTP API.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

impl OllamaClient {
    /// Create a client for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List the model names the server has pulled.
    pub async fn list_models(&self) -> WorkerResult<Vec<String>> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self.client.get(&url).send().await?.error_for_status()?;
        let tags: TagsResponse = response.json().await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Run a single non-streaming completion.
    pub async fn generate(&self, model: &str, prompt: &str) -> WorkerResult<String> {
        let url = format!("{}/api/generate", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                model,
                prompt,
                stream: false,
            })
            .send()
            .await?
            .error_for_status()?;
        let body: GenerateResponse = response.json().await?;
        Ok(body.response)
    }
}

/// Strip the tag suffix from a model name: `llama3:8b` → `llama3`.
pub fn model_base(name: &str) -> &str {
    name.split(':').next().unwrap_or(name)
}

/// Content generator that drives the summarize/script stages through an
/// Ollama model, one prompt per stage.
///
/// The voice stage is represented by the `audio_details` handoff; speech
/// synthesis happens downstream of it.
pub struct OllamaGenerator {
    client: OllamaClient,
    model: String,
}

impl OllamaGenerator {
    pub fn new(client: OllamaClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl ContentGenerator for OllamaGenerator {
    async fn generate(
        &self,
        topic: &str,
        hosts: &[String],
        job_id: &JobId,
        on_update: UpdateSink<'_>,
    ) -> WorkerResult<GenerationOutput> {
        info!(job_id = %job_id, model = %self.model, "generating podcast content");

        on_update("Summarizing research into talking points", Some(stage::SUMMARIZE));
        let summary_prompt = format!(
            "Write a concise summary of the key points a podcast episode about \
             \"{topic}\" should cover. Plain text, at most 150 words."
        );
        let summary = self.client.generate(&self.model, &summary_prompt).await?;
        on_update("Summary drafted", None);

        on_update("Writing the episode script", Some(stage::SCRIPT));
        let host_list = hosts.join(" and ");
        let script_prompt = format!(
            "Write a two-host podcast script about \"{topic}\". The hosts are \
             {host_list}. Alternate speakers and prefix each line with the \
             speaker's name and a colon. Open with a greeting and close with a \
             sign-off. Base the conversation on this summary:\n\n{summary}"
        );
        let script = self.client.generate(&self.model, &script_prompt).await?;
        on_update("Episode script finished", None);

        on_update("Preparing voice instructions", Some(stage::VOICE));
        let audio = AudioDetails::conversational(hosts);

        Ok(GenerationOutput::Structured(json!({
            "summary": summary,
            "script": script,
            "audio_details": audio,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_model_base_strips_tag() {
        assert_eq!(model_base("llama3:8b"), "llama3");
        assert_eq!(model_base("mistral"), "mistral");
    }

    #[tokio::test]
    async fn test_list_models() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "models": [{"name": "llama3:8b"}, {"name": "mistral:7b"}]
            })))
            .mount(&server)
            .await;

        let client = OllamaClient::new(server.uri());
        let models = client.list_models().await.unwrap();
        assert_eq!(models, vec!["llama3:8b", "mistral:7b"]);
    }

    #[tokio::test]
    async fn test_generate_returns_completion_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": "A fine summary."
            })))
            .mount(&server)
            .await;

        let client = OllamaClient::new(server.uri());
        let text = client.generate("llama3", "summarize this").await.unwrap();
        assert_eq!(text, "A fine summary.");
    }

    #[tokio::test]
    async fn test_server_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = OllamaClient::new(server.uri());
        assert!(client.list_models().await.is_err());
    }

    #[tokio::test]
    async fn test_generator_produces_structured_output() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": "model text"
            })))
            .mount(&server)
            .await;

        let generator = OllamaGenerator::new(OllamaClient::new(server.uri()), "llama3");
        let hosts = vec!["Alex".to_string(), "Simon".to_string()];
        let updates = std::sync::Mutex::new(Vec::new());
        let sink = |message: &str, stage: Option<&str>| {
            updates.lock().unwrap().push((message.to_string(), stage.map(str::to_string)));
        };

        let output = generator
            .generate("Space", &hosts, &JobId::new(), &sink)
            .await
            .unwrap();

        match output {
            GenerationOutput::Structured(value) => {
                assert_eq!(value["summary"], "model text");
                assert_eq!(value["script"], "model text");
                assert!(value["audio_details"]["voice_instructions"]
                    .as_str()
                    .unwrap()
                    .contains("Alex, Simon"));
            }
            other => panic!("expected structured output, got {other:?}"),
        }

        let updates = updates.into_inner().unwrap();
        let stages: Vec<_> = updates.iter().filter_map(|(_, s)| s.clone()).collect();
        assert_eq!(stages, vec!["summarize", "script", "voice"]);
    }
}
