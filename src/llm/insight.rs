use crate::date_util::strip_code_fences;
use crate::engine::InsightPayload;
use crate::error::{Error, Result};

/// Shown in place of an insight when the service call fails. Insight
/// failures are never fatal — callers substitute this and move on.
pub const FALLBACK_MESSAGE: &str = "Sorry, couldn't generate insights right now.";

/// Generate a productivity insight from the aggregated metrics payload.
/// The payload is the only context the model sees; the response is free
/// text for direct display.
pub async fn generate_insight(
    agent: &mixtape_core::Agent,
    payload: &InsightPayload,
) -> Result<String> {
    let metrics_json = serde_json::to_string_pretty(payload).unwrap_or_default();

    let prompt = format!(
        r#"You are a productivity coach. Analyze this user's tracked-time metrics and give personalized suggestions to improve their productivity and consistency.

Metrics (minutes unless noted; "productivity" is actual/planned as a percentage):
{metrics_json}

Respond with 3-5 short, concrete observations and suggestions as plain text.
No markdown headings, no code fences."#
    );

    let response = agent
        .run(&prompt)
        .await
        .map_err(|e| Error::Llm(e.to_string()))?;

    let text = strip_code_fences(response.text().trim()).to_string();
    if text.is_empty() {
        return Err(Error::Llm("empty insight response".into()));
    }
    Ok(text)
}
