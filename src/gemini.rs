//! Gemini API client — non-streamed `generateContent` calls and response
//! extraction helpers.

use std::time::Duration;

use anyhow::{Context as _, Result, anyhow};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::constants::GEMINI_BASE_URL;

// ── Wire types ───────────────────────────────────────────────────────

/// One role-tagged entry in the `contents` array.
#[derive(Clone, Debug, Serialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

impl Content {
    /// A single-part text content under the given wire role
    /// (`"user"` or `"model"`).
    pub fn text(role: &str, text: impl Into<String>) -> Self {
        Content {
            role: role.to_string(),
            parts: vec![Part { text: text.into() }],
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Part {
    pub text: String,
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction")]
    system_instruction: SystemInstruction,
}

/// The system prompt travels outside the `contents` array and carries no
/// role of its own.
#[derive(Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Deserialize)]
pub struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Thin wrapper around the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    http_client: HttpClient,
}

impl GeminiClient {
    /// Build a client with a bounded per-request timeout.
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build Gemini HTTP client")?;
        Ok(GeminiClient {
            api_key: api_key.into(),
            base_url: GEMINI_BASE_URL.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// One chat turn: system prompt + prior history + the new user payload,
    /// returning the model's reply text.
    pub async fn generate(
        &self,
        model: &str,
        system_prompt: &str,
        history: &[Content],
        payload: &str,
    ) -> Result<String> {
        let mut contents = history.to_vec();
        contents.push(Content::text("user", payload));

        let request = GenerateContentRequest {
            contents,
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: system_prompt.to_string(),
                }],
            },
        };

        let url = format!(
            "{base}/{model}:generateContent?key={key}",
            base = self.base_url,
            key = self.api_key,
        );

        let response = self
            .http_client
            .post(url)
            .json(&request)
            .send()
            .await
            .context("send Gemini request")?;

        let status = response.status();
        let text = response.text().await.context("read Gemini response")?;
        if !status.is_success() {
            return Err(anyhow!("Gemini error {status}: {}", error_summary(&text)));
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&text).context("decode Gemini response")?;
        extract_reply(parsed)
    }
}

// ── Response helpers ─────────────────────────────────────────────────

/// Concatenate the text parts of the first candidate.
pub fn extract_reply(response: GenerateContentResponse) -> Result<String> {
    let parts = response
        .candidates
        .and_then(|mut candidates| {
            if candidates.is_empty() {
                None
            } else {
                candidates.swap_remove(0).content
            }
        })
        .map(|content| content.parts)
        .unwrap_or_default();

    let reply: Vec<String> = parts.into_iter().filter_map(|part| part.text).collect();
    if reply.is_empty() {
        return Err(anyhow!("Gemini returned no text candidates"));
    }
    Ok(reply.join(""))
}

/// Pull `status: message` out of a Gemini error body, falling back to the
/// raw text when it is not the documented JSON shape.
fn error_summary(body: &str) -> String {
    serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let status = wrapper.error.status.unwrap_or_default();
            let message = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status.is_empty() {
                message
            } else {
                format!("{status}: {message}")
            }
        })
        .unwrap_or_else(|_| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extract_reply_joins_candidate_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "Hello "}, {"text": "there."}]
                }
            }]
        }))
        .unwrap();
        assert_eq!(extract_reply(response).unwrap(), "Hello there.");
    }

    #[test]
    fn extract_reply_rejects_empty_candidates() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({"candidates": []})).unwrap();
        assert!(extract_reply(response).is_err());

        let response: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(extract_reply(response).is_err());
    }

    #[test]
    fn error_summary_reads_documented_shape() {
        let body = json!({
            "error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}
        })
        .to_string();
        assert_eq!(error_summary(&body), "RESOURCE_EXHAUSTED: Quota exceeded");
    }

    #[test]
    fn error_summary_falls_back_to_raw_body() {
        assert_eq!(error_summary("upstream hiccup"), "upstream hiccup");
    }

    #[test]
    fn request_serializes_system_instruction_in_camel_case() {
        let request = GenerateContentRequest {
            contents: vec![Content::text("user", "hi")],
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: "be brief".to_string(),
                }],
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "be brief");
        assert_eq!(value["contents"][0]["role"], "user");
    }
}
