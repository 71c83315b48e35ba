//! Minimal client for the upstream text-generation service (Segmind chat endpoint).
//!
//! One POST per generation with a system instruction and a user prompt. Calls are
//! instrumented and log latency and response size (not contents, never the key).
//!
//! The upstream payload shape has changed over time, so text is pulled out by an
//! ordered table of extractors; the first one that finds a string wins.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::error::{QuizError, QuizResult};
use crate::util::trunc_for_log;

pub const DEFAULT_API_URL: &str = "https://api.segmind.com/v1/claude-3.7-sonnet";
pub const MISSING_KEY_MESSAGE: &str = "Segmind API key not configured";

/// One generation request: prompts plus sampling knobs.
#[derive(Clone, Debug)]
pub struct GenerationRequest<'a> {
  pub system: &'a str,
  pub prompt: &'a str,
  pub temperature: f32,
  pub max_tokens: u32,
}

/// Anything that turns a prompt into raw model text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
  /// Whether a credential is available (surfaced by the health endpoint).
  fn is_configured(&self) -> bool;

  async fn generate(&self, req: &GenerationRequest<'_>) -> QuizResult<String>;
}

#[derive(Clone)]
pub struct Segmind {
  pub client: reqwest::Client,
  pub api_key: Option<String>,
  pub api_url: String,
}

impl Segmind {
  /// Build from SEGMIND_API_KEY / SEGMIND_API_URL / SEGMIND_TIMEOUT_SECS.
  /// A missing key is not fatal here; each generation reports it instead.
  pub fn from_env() -> Result<Self, reqwest::Error> {
    let api_key = std::env::var("SEGMIND_API_KEY").ok().filter(|k| !k.trim().is_empty());
    let api_url = std::env::var("SEGMIND_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
    let timeout = std::env::var("SEGMIND_TIMEOUT_SECS")
      .ok()
      .and_then(|s| s.parse::<u64>().ok())
      .map(Duration::from_secs);

    let mut builder = reqwest::Client::builder();
    if let Some(t) = timeout {
      builder = builder.timeout(t);
    }
    Ok(Self { client: builder.build()?, api_key, api_url })
  }
}

#[async_trait]
impl TextGenerator for Segmind {
  fn is_configured(&self) -> bool {
    self.api_key.is_some()
  }

  #[instrument(level = "info", skip(self, req), fields(url = %self.api_url, prompt_len = req.prompt.len()))]
  async fn generate(&self, req: &GenerationRequest<'_>) -> QuizResult<String> {
    let api_key = self
      .api_key
      .as_deref()
      .ok_or_else(|| QuizError::Configuration(MISSING_KEY_MESSAGE.into()))?;

    let body = ChatRequest {
      messages: vec![
        ChatMessage { role: "system", content: req.system },
        ChatMessage { role: "user", content: req.prompt },
      ],
      temperature: req.temperature,
      max_tokens: req.max_tokens,
    };

    let start = Instant::now();
    let res = self
      .client
      .post(&self.api_url)
      .header(USER_AGENT, "celo-quiz-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", api_key))
      .json(&body)
      .send()
      .await
      .map_err(|e| {
        error!(error = %e, "Segmind request failed");
        QuizError::upstream(e.status().map(|s| s.as_u16()), format!("Failed to reach AI service: {e}"))
      })?;

    let status = res.status();
    let text = res.text().await.map_err(|e| {
      error!(status = status.as_u16(), error = %e, "Failed to read Segmind response body");
      QuizError::upstream(Some(status.as_u16()), format!("Failed to read AI service response: {e}"))
    })?;
    let elapsed = start.elapsed();

    if !status.is_success() {
      let msg = extract_upstream_error(&text).unwrap_or_else(|| text.clone());
      error!(?elapsed, status = status.as_u16(), body = %trunc_for_log(&text, 200), "Segmind returned an error");
      return Err(QuizError::upstream(Some(status.as_u16()), format!("AI service error ({}): {}", status.as_u16(), msg)));
    }
    info!(?elapsed, response_bytes = text.len(), "Segmind response received");

    let payload: Value = serde_json::from_str(&text).map_err(|e| {
      warn!(error = %e, body = %trunc_for_log(&text, 200), "Segmind response is not JSON");
      QuizError::upstream(None, "Unexpected response format from AI service")
    })?;

    extract_text(&payload).ok_or_else(|| {
      warn!(body = %trunc_for_log(&text, 200), "No text field found in Segmind response");
      QuizError::upstream(None, "Unexpected response format from AI service")
    })
  }
}

// --- Request DTOs ---

#[derive(Serialize)]
struct ChatRequest<'a> {
  messages: Vec<ChatMessage<'a>>,
  temperature: f32,
  max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
  role: &'static str,
  content: &'a str,
}

// --- Response text extraction ---

type Extractor = fn(&Value) -> Option<String>;

/// Tried in order; first hit wins.
const EXTRACTORS: &[(&str, Extractor)] = &[
  ("content_blocks", content_blocks),
  ("content_string", content_string),
  ("text", text_field),
  ("choices", choices_message),
  ("message_or_response", message_or_response),
];

/// Pull the model's text out of any of the known response shapes.
pub fn extract_text(payload: &Value) -> Option<String> {
  EXTRACTORS.iter().find_map(|(name, f)| {
    let text = f(payload)?;
    tracing::debug!(extractor = *name, text_len = text.len(), "Extracted upstream text");
    Some(text)
  })
}

fn string_at(v: &Value, key: &str) -> Option<String> {
  v.get(key)?.as_str().map(str::to_string)
}

/// `{"content": [{"type": "text", "text": "..."}]}`
fn content_blocks(v: &Value) -> Option<String> {
  v.get("content")?.as_array()?.iter().find_map(|block| {
    if block.get("type")?.as_str()? == "text" {
      block.get("text")?.as_str().map(str::to_string)
    } else {
      None
    }
  })
}

fn content_string(v: &Value) -> Option<String> {
  string_at(v, "content")
}

fn text_field(v: &Value) -> Option<String> {
  string_at(v, "text")
}

fn message_or_response(v: &Value) -> Option<String> {
  string_at(v, "message").or_else(|| string_at(v, "response"))
}

/// `{"choices": [{"message": {"content": "..."}}]}`
fn choices_message(v: &Value) -> Option<String> {
  v.get("choices")?.get(0)?.get("message")?.get("content")?.as_str().map(str::to_string)
}

/// Try to pull a clean error message from an upstream error body.
fn extract_upstream_error(body: &str) -> Option<String> {
  let v: Value = serde_json::from_str(body).ok()?;
  v.get("error")
    .and_then(|e| e.get("message").and_then(Value::as_str).or_else(|| e.as_str()))
    .or_else(|| v.get("message").and_then(Value::as_str))
    .map(str::to_string)
}
