use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::CompassConfig;
use crate::error::PerspectiveError;

/// Client for an OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct LlmClient {
    api_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

/// Wire-format message: role + content only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Fixed per-call sampling parameters.
#[derive(Debug, Clone, Copy)]
pub struct SamplingParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub presence_penalty: Option<f32>,
    pub frequency_penalty: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    presence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

impl LlmClient {
    pub fn new(config: &CompassConfig) -> Self {
        Self {
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().unwrap_or_default(),
            model: config.model.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// Issue one chat completion and return the generated text.
    ///
    /// HTTP statuses are mapped onto the error taxonomy; there is no retry
    /// here, the caller decides whether to resubmit.
    pub async fn generate(
        &self,
        messages: Vec<Message>,
        params: SamplingParams,
    ) -> Result<String, PerspectiveError> {
        let url = format!("{}/chat/completions", self.api_url);

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: Some(params.temperature),
            max_tokens: Some(params.max_tokens),
            presence_penalty: params.presence_penalty,
            frequency_penalty: params.frequency_penalty,
        };

        let mut req = self.client.post(&url).json(&request);

        // API key header only when configured (local models run without one)
        if !self.api_key.trim().is_empty() {
            req = req.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let response = req.send().await.map_err(|e| {
            tracing::error!("completion request failed to send: {}", e);
            PerspectiveError::Unknown(e.to_string())
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read body".to_string());
            tracing::error!("completion API returned HTTP {}: {}", status, body);
            return Err(PerspectiveError::from_status(status, body));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| PerspectiveError::MalformedResponse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| {
                PerspectiveError::MalformedResponse("no choices in response".to_string())
            })
    }
}

/// Defensively parse a model's textual output as JSON.
///
/// Tries strict JSON first, then strips a trailing reasoning block, then a
/// fenced json code block, then the outermost brace span.
pub fn extract_json<T>(raw: &str) -> Result<T, PerspectiveError>
where
    T: DeserializeOwned,
{
    if let Ok(parsed) = serde_json::from_str::<T>(raw.trim()) {
        return Ok(parsed);
    }

    let cleaned = match raw.rfind("</think>") {
        Some(end) => &raw[end + 8..],
        None => raw,
    };

    if let Ok(parsed) = serde_json::from_str::<T>(cleaned.trim()) {
        return Ok(parsed);
    }

    let candidate = if let Some(start) = cleaned.find("```json") {
        let after_fence = &cleaned[start + 7..];
        match after_fence.find("```") {
            Some(end) => after_fence[..end].trim(),
            None => cleaned,
        }
    } else if let Some(start) = cleaned.find('{') {
        match cleaned.rfind('}') {
            Some(end) if end >= start => &cleaned[start..=end],
            _ => cleaned,
        }
    } else {
        cleaned
    };

    serde_json::from_str::<T>(candidate.trim()).map_err(|e| {
        PerspectiveError::MalformedResponse(format!(
            "{} (raw: {})",
            e,
            raw.chars().take(200).collect::<String>()
        ))
    })
}
