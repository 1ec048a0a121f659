//! Pipeline runner: drives one job through the stage sequence.

use std::sync::Arc;

use podforge_models::{stage, AudioDetails, GenerationOutput, ResearchFindings, DEFAULT_HOSTS};
use podforge_queue::JobHandle;
use tracing::error;

use crate::config::PipelineConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::generator::ContentGenerator;
use crate::research::ResearchProvider;

/// Collaborators and knobs shared by every pipeline run.
pub struct PipelineContext {
    pub research: Arc<dyn ResearchProvider>,
    pub generator: Arc<dyn ContentGenerator>,
    pub config: PipelineConfig,
}

/// Run one job to a terminal state.
///
/// Collaborator failures are converted into a failed job with the error in
/// the update log; they never escape this function. The caller releases the
/// scheduler slot afterwards.
pub async fn run(ctx: &PipelineContext, job: &JobHandle) {
    if let Err(err) = job.with(|j| j.start()) {
        error!(job_id = %job.id(), "refusing to run job: {err}");
        return;
    }

    if let Err(err) = drive(ctx, job).await {
        job.with(|j| {
            j.add_update(format!("Error: {err}"), None);
            if let Err(err) = j.complete(false) {
                error!(job_id = %j.id, "terminal transition failed: {err}");
            }
        });
    }
}

async fn drive(ctx: &PipelineContext, job: &JobHandle) -> WorkerResult<()> {
    let (topic, hosts) = job.with(|j| (j.topic.clone(), j.hosts.clone()));

    job.with(|j| j.add_update("Starting research on trending topics", Some(stage::RESEARCH)));
    let sources = ctx
        .research
        .search(&topic, ctx.config.research_results)
        .await?;
    let findings = ResearchFindings {
        topics: sources.iter().take(3).map(|s| s.title.clone()).collect(),
        sources,
    };
    job.with(|j| {
        j.add_update(
            format!("Research completed, found {} trending topics", findings.topics.len()),
            Some(stage::RESEARCH),
        );
        j.results.research = Some(findings);
    });

    // The summarize/script/voice stages run inside the generation
    // collaborator; its progress is forwarded straight into the job log.
    let forward_job = job.clone();
    let forward = move |message: &str, stage: Option<&str>| {
        forward_job.with(|j| j.add_update(message, stage));
    };
    let output = ctx
        .generator
        .generate(&topic, &hosts, job.id(), &forward)
        .await?;

    if let Some(message) = output.error_message() {
        return Err(WorkerError::generation_failed(message));
    }

    let degraded = match output {
        GenerationOutput::Structured(value) => apply_structured(job, &topic, &hosts, value),
        GenerationOutput::PlainText(text) => {
            apply_plain_text(job, &hosts, text);
            false
        }
        // explicit error signals were rejected above
        GenerationOutput::Error(message) => return Err(WorkerError::generation_failed(message)),
    };

    job.with(|j| {
        if !degraded {
            j.add_update("Podcast generated successfully", Some(stage::COMPLETE));
        }
        if let Err(err) = j.complete(true) {
            error!(job_id = %j.id, "terminal transition failed: {err}");
        }
    });
    Ok(())
}

/// Copy recognized fields of a structured payload into the job's results.
///
/// Wrong-typed and unrecognized fields are skipped. A payload that is not
/// an object at all is malformed content: placeholder results derived from
/// the topic and hosts are substituted and the job still counts as a
/// success. Returns whether that substitution happened.
fn apply_structured(
    job: &JobHandle,
    topic: &str,
    hosts: &[String],
    value: serde_json::Value,
) -> bool {
    let Some(fields) = value.as_object() else {
        job.with(|j| {
            j.add_update(
                format!("Type error processing results: expected an object, got {}", json_kind(&value)),
                Some("error"),
            );
            j.results.summary = format!("AI generated podcast on {topic}");
            j.results.script = fallback_script(topic, hosts);
            j.results.audio_details = Some(AudioDetails::conversational(hosts));
            j.add_update("Generated fallback content due to error", Some(stage::SCRIPT));
        });
        return true;
    };

    job.with(|j| {
        if let Some(research) = fields
            .get("research")
            .and_then(|v| serde_json::from_value::<ResearchFindings>(v.clone()).ok())
        {
            j.results.research = Some(research);
        }
        if let Some(summary) = fields.get("summary").and_then(|v| v.as_str()) {
            j.results.summary = summary.to_string();
        }
        if let Some(script) = fields.get("script").and_then(|v| v.as_str()) {
            j.results.script = script.to_string();
        }
        if let Some(audio) = fields
            .get("audio_details")
            .and_then(|v| serde_json::from_value::<AudioDetails>(v.clone()).ok())
        {
            j.results.audio_details = Some(audio);
        }
    });
    false
}

/// An unstructured result is the whole script; summary and audio
/// instructions get defaults referencing the hosts.
fn apply_plain_text(job: &JobHandle, hosts: &[String], text: String) {
    job.with(|j| {
        j.results.script = text;
        j.results.summary = "Generated by the script model".to_string();
        j.results.audio_details = Some(AudioDetails::conversational(hosts));
    });
}

fn fallback_script(topic: &str, hosts: &[String]) -> String {
    let first = hosts.first().map(String::as_str).unwrap_or(DEFAULT_HOSTS[0]);
    let second = hosts.get(1).map(String::as_str).unwrap_or(DEFAULT_HOSTS[1]);
    format!(
        "# {topic} Podcast\n\n\
         {first}: Welcome to our podcast on {topic}!\n\
         {second}: Today we'll be exploring this fascinating topic...\n\n\
         Due to technical limitations, we've created this simple placeholder script."
    )
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
