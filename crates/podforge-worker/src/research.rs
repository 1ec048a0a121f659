//! Research collaborator boundary.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use podforge_models::ResearchSource;

use crate::error::WorkerResult;

/// Looks up current information on a topic.
#[async_trait]
pub trait ResearchProvider: Send + Sync {
    async fn search(&self, query: &str, num_results: usize) -> WorkerResult<Vec<ResearchSource>>;
}

/// Canned web search over a small topic-keyed headline corpus.
///
/// Results are deterministic and dated to today/yesterday so they read as
/// current. Swap in a real search API client behind the same trait for a
/// production deployment.
#[derive(Debug, Clone, Default)]
pub struct WebSearch;

#[async_trait]
impl ResearchProvider for WebSearch {
    async fn search(&self, query: &str, num_results: usize) -> WorkerResult<Vec<ResearchSource>> {
        let today = Utc::now().format("%Y-%m-%d").to_string();
        let yesterday = (Utc::now() - Duration::days(1)).format("%Y-%m-%d").to_string();

        let lowered = query.to_lowercase();
        let mut results = if lowered.contains("ai") || lowered.contains("artificial intelligence") {
            ai_headlines(&today, &yesterday)
        } else if lowered.contains("climate") || lowered.contains("environment") {
            climate_headlines(&today, &yesterday)
        } else {
            generic_headlines(query, &today, &yesterday)
        };

        results.truncate(num_results);
        Ok(results)
    }
}

fn source(title: &str, url: String, snippet: &str, date: &str) -> ResearchSource {
    ResearchSource {
        title: title.to_string(),
        url,
        snippet: snippet.to_string(),
        date: date.to_string(),
    }
}

fn ai_headlines(today: &str, yesterday: &str) -> Vec<ResearchSource> {
    vec![
        source(
            "New AI Model Breaks Records in Multi-Modal Reasoning",
            "https://example.com/tech/ai-model-record".into(),
            "The latest model demonstrates unprecedented capabilities in reasoning about text and images simultaneously.",
            today,
        ),
        source(
            "AI Regulation Framework Proposed by International Coalition",
            "https://example.com/policy/ai-regulation".into(),
            "A group of 25 countries have proposed a unified framework for regulating AI development and deployment.",
            yesterday,
        ),
        source(
            "AI-Generated Content Now Indistinguishable from Human Work, Study Finds",
            "https://example.com/tech/ai-content-study".into(),
            "Most people cannot reliably distinguish between content created by AI systems and human writers in blind tests.",
            today,
        ),
        source(
            "AI Ethics Board Resigns Over Transparency Concerns",
            "https://example.com/ethics/ai-board-resignation".into(),
            "The entire ethics board of a major AI company has resigned, citing a lack of transparency in development.",
            yesterday,
        ),
        source(
            "AI Assistants Being Deployed in Healthcare at Record Rates",
            "https://example.com/health/ai-assistants".into(),
            "Hospitals are adopting AI assistants at unprecedented rates for diagnosis and patient communication.",
            today,
        ),
    ]
}

fn climate_headlines(today: &str, yesterday: &str) -> Vec<ResearchSource> {
    vec![
        source(
            "Global Temperature Rise Exceeds Previous Projections",
            "https://example.com/environment/temperature-rise".into(),
            "New data indicates global temperatures are rising faster than scientists had previously projected.",
            today,
        ),
        source(
            "Carbon Capture Technology Breakthrough Announced",
            "https://example.com/tech/carbon-capture".into(),
            "Scientists have developed a carbon capture method 40% more efficient than existing technologies.",
            yesterday,
        ),
        source(
            "Major Countries Pledge to Triple Renewable Energy by 2030",
            "https://example.com/policy/renewable-energy-pledge".into(),
            "A coalition of major economies has committed to tripling renewable energy capacity within seven years.",
            today,
        ),
        source(
            "Climate Refugees Exceed 20 Million Globally",
            "https://example.com/society/climate-refugees".into(),
            "A new UN report estimates over 20 million people were displaced by climate-related events in the past year.",
            yesterday,
        ),
        source(
            "Ocean Acidity Reaches Historic Levels, Threatening Marine Ecosystems",
            "https://example.com/environment/ocean-acidity".into(),
            "Record ocean acidity poses severe threats to coral reefs and marine life worldwide.",
            today,
        ),
    ]
}

fn generic_headlines(query: &str, today: &str, yesterday: &str) -> Vec<ResearchSource> {
    let slug = query.to_lowercase().replace(' ', "-");
    vec![
        source(
            &format!("Latest Developments in {query}"),
            format!("https://example.com/trending/{slug}"),
            &format!("Recent advancements and news related to {query} that are making headlines globally."),
            today,
        ),
        source(
            &format!("Expert Opinions on {query} Trends"),
            format!("https://example.com/experts/{slug}"),
            &format!("Leading experts share their insights on where {query} is headed in the coming months."),
            yesterday,
        ),
        source(
            &format!("Controversy Surrounding {query}"),
            format!("https://example.com/analysis/{slug}-debate"),
            &format!("Examining the ongoing debates and controversies related to {query} and their implications."),
            today,
        ),
        source(
            &format!("Statistical Analysis of {query} Impact"),
            format!("https://example.com/data/{slug}-statistics"),
            &format!("New data reveals surprising statistics about how {query} is affecting various sectors."),
            yesterday,
        ),
        source(
            &format!("Future of {query}: Predictions and Forecasts"),
            format!("https://example.com/future/{slug}-outlook"),
            &format!("Analysts present their forecasts for how {query} will evolve over the next several years."),
            today,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_topic_keyed_corpora() {
        let search = WebSearch;

        let results = search.search("artificial intelligence news", 5).await.unwrap();
        assert_eq!(results.len(), 5);
        assert!(results[0].title.contains("AI"));

        let results = search.search("climate policy", 5).await.unwrap();
        assert!(results[0].title.contains("Temperature"));
    }

    #[tokio::test]
    async fn test_generic_results_reference_the_query() {
        let search = WebSearch;
        let results = search.search("Space Exploration", 3).await.unwrap();

        assert_eq!(results.len(), 3);
        for result in &results {
            assert!(result.title.contains("Space Exploration") || result.snippet.contains("Space Exploration"));
        }
        assert!(results[0].url.contains("space-exploration"));
    }

    #[tokio::test]
    async fn test_num_results_truncates() {
        let search = WebSearch;
        let results = search.search("ai", 2).await.unwrap();
        assert_eq!(results.len(), 2);
    }
}
