// Generation service module
// Optional outbound text-generation client with a hard timeout

#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::GenerationConfig;

/// Client for an externally hosted text-generation endpoint.
///
/// The bearer credential is read from the environment at construction; a
/// missing credential means the client is unconfigured, which is a normal
/// condition routed to rule-based composition, not an error. Every call
/// carries the configured timeout so a hung service never stalls a query.
#[derive(Debug, Clone)]
pub struct GenerationClient {
    api_url: String,
    api_key: Option<String>,
    max_new_tokens: u32,
    temperature: f64,
    agent: ureq::Agent,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    inputs: String,
    parameters: GenerateParameters,
}

#[derive(Debug, Serialize)]
struct GenerateParameters {
    max_new_tokens: u32,
    temperature: f64,
    top_p: f64,
    do_sample: bool,
    return_full_text: bool,
}

#[derive(Debug, Deserialize)]
struct GeneratedItem {
    generated_text: Option<String>,
}

impl GenerationClient {
    #[inline]
    pub fn new(config: &GenerationConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_seconds)))
            .build()
            .into();

        Self {
            api_url: config.api_url.clone(),
            api_key: config.api_key(),
            max_new_tokens: config.max_new_tokens,
            temperature: config.temperature,
            agent,
        }
    }

    /// True when a credential is present and generation can be attempted.
    #[inline]
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Send the prompt to the generation service and return the cleaned
    /// output text. Any failure (network, non-200, timeout, malformed
    /// payload, empty output) is an error for the caller to degrade on.
    #[inline]
    pub fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .context("Generation service is not configured")?;

        debug!(
            "Requesting generation for prompt of {} chars",
            prompt.len()
        );

        let request = GenerateRequest {
            inputs: prompt.to_string(),
            parameters: GenerateParameters {
                max_new_tokens: self.max_new_tokens,
                temperature: self.temperature,
                top_p: 0.9,
                do_sample: true,
                return_full_text: false,
            },
        };

        let request_json =
            serde_json::to_string(&request).context("Failed to serialize generation request")?;

        let response_text = self
            .agent
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .send(&request_json)
            .and_then(|mut resp| resp.body_mut().read_to_string())
            .map_err(|e| {
                warn!("Generation request failed: {}", e);
                anyhow::anyhow!("Generation request failed: {}", e)
            })?;

        let items: Vec<GeneratedItem> =
            serde_json::from_str(&response_text).context("Failed to parse generation response")?;

        let raw = items
            .first()
            .and_then(|item| item.generated_text.as_deref())
            .context("Generation response contained no text")?;

        let answer = clean_generated_text(raw);
        if answer.is_empty() {
            return Err(anyhow::anyhow!("Generation produced empty output"));
        }

        debug!("Generation produced {} chars", answer.len());
        Ok(answer)
    }
}

/// Strip a leading "ANSWER:" marker some instruct models echo back.
fn clean_generated_text(raw: &str) -> String {
    let trimmed = raw.trim();

    let without_marker = trimmed
        .get(..7)
        .filter(|prefix| prefix.eq_ignore_ascii_case("answer:"))
        .map_or(trimmed, |_| {
            trimmed.get(7..).unwrap_or_default().trim_start()
        });

    without_marker.to_string()
}
