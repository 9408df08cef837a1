//! Minimal OpenAI client for our use-case.
//!
//! We only call chat.completions and request plain text (an HTML lesson
//! fragment). Calls are instrumented and log model names, latencies, and
//! response sizes (not contents).
//!
//! NOTE: We never log the API key and we keep payload truncations short.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{instrument, info, error};

use crate::config::Prompts;
use crate::domain::ContentRequest;
use crate::util::fill_template;

#[derive(Clone)]
pub struct OpenAI {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub model: String,
}

impl OpenAI {
  /// Construct the client if we find OPENAI_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("OPENAI_API_KEY").ok()?;
    if api_key.trim().is_empty() {
      return None;
    }
    let base_url =
      std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
    let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".into());

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(20))
      .build()
      .ok()?;

    Some(Self { client, api_key, base_url, model })
  }

  /// Plain-text chat completion. Single attempt, no retry.
  #[instrument(level = "info", skip(self, system, user), fields(model = %self.model))]
  async fn chat_plain(&self, system: &str, user: &str) -> Result<String, String> {
    let url = format!("{}/chat/completions", self.base_url);
    let req = ChatCompletionRequest {
      model: self.model.clone(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: system.into() },
        ChatMessageReq { role: "user".into(), content: user.into() },
      ],
      temperature: 0.7,
      max_tokens: Some(2000),
    };

    let res = self.client.post(&url)
      .header(USER_AGENT, "scormai-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await.map_err(|e| e.to_string())?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let msg = extract_openai_error(&body).unwrap_or_else(|| body);
      return Err(format!("OpenAI HTTP {}: {}", status, msg));
    }

    let body: ChatCompletionResponse = res.json().await.map_err(|e| e.to_string())?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "OpenAI usage");
    }
    let text = body.choices.get(0)
      .and_then(|c| c.message.content.clone())
      .unwrap_or_default().trim().to_string();

    Ok(text)
  }

  /// Generate a lesson body fragment for the given request.
  /// Returns Err on transport/API failure or an empty completion; the
  /// caller substitutes deterministic fallback content.
  #[instrument(
    level = "info",
    skip(self, prompts, req),
    fields(title_len = req.title.len(), include_quiz = req.include_quiz, model = %self.model)
  )]
  pub async fn generate_lesson_body(
    &self,
    prompts: &Prompts,
    req: &ContentRequest,
  ) -> Result<String, String> {
    let user = build_user_prompt(prompts, req);

    let start = std::time::Instant::now();
    let result = self.chat_plain(&prompts.content_system, &user).await;
    let elapsed = start.elapsed();

    match &result {
      Ok(body) if body.is_empty() => {
        error!(?elapsed, "Model returned an empty completion");
        return Err("Model returned an empty completion".into());
      }
      Ok(body) => {
        info!(?elapsed, body_len = body.len(), "Model response received successfully");
      }
      Err(e) => {
        error!(?elapsed, error = %e, "Model call failed during content generation");
      }
    }

    result
  }
}

/// Assemble the user prompt from request fields, in the fixed Turkish layout.
pub fn build_user_prompt(prompts: &Prompts, req: &ContentRequest) -> String {
  let objectives = req
    .objective_lines()
    .iter()
    .map(|l| format!("- {}", l))
    .collect::<Vec<_>>()
    .join("\n");

  let audience_line = req
    .target_audience
    .as_deref()
    .filter(|a| !a.trim().is_empty())
    .map(|a| format!("Hedef Kitle: {}", a))
    .unwrap_or_default();

  let quiz_rider = if req.include_quiz {
    fill_template(
      &prompts.quiz_rider_template,
      &[("count", &req.quiz_question_count().to_string())],
    )
  } else {
    String::new()
  };

  fill_template(
    &prompts.content_user_template,
    &[
      ("title", req.title.as_str()),
      ("description", req.description.as_str()),
      ("difficulty", req.difficulty_level.label_tr()),
      ("content_type", req.content_type.prompt_phrase()),
      ("audience_line", &audience_line),
      ("objectives", &objectives),
      ("prompt", req.prompt.as_str()),
      ("quiz_rider", &quiz_rider),
    ],
  )
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  max_tokens: Option<u32>,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from OpenAI error body.
fn extract_openai_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  match serde_json::from_str::<EWrap>(body) {
    Ok(w) => Some(w.error.message),
    Err(_) => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{ContentRequest, DifficultyLevel};

  #[test]
  fn user_prompt_carries_request_fields() {
    let prompts = Prompts::default();
    let req = ContentRequest {
      title: "Fotosentez".into(),
      description: "Bitkilerde enerji üretimi".into(),
      prompt: "Fotosentezin temellerini anlat".into(),
      learning_objectives: Some("hedef bir\nhedef iki".into()),
      target_audience: Some("Lise öğrencileri".into()),
      include_quiz: true,
      number_of_questions: Some(9),
      difficulty_level: DifficultyLevel::Advanced,
      ..Default::default()
    };
    let user = build_user_prompt(&prompts, &req);
    assert!(user.contains("Başlık: Fotosentez"));
    assert!(user.contains("ileri seviye"));
    assert!(user.contains("Hedef Kitle: Lise öğrencileri"));
    assert!(user.contains("- hedef bir"));
    assert!(user.contains("5 adet soru"));
  }

  #[test]
  fn quiz_rider_is_absent_without_quiz() {
    let prompts = Prompts::default();
    let req = ContentRequest {
      title: "Cebir".into(),
      prompt: "Temel cebir".into(),
      ..Default::default()
    };
    let user = build_user_prompt(&prompts, &req);
    assert!(!user.contains("quiz bölümü ekle"));
  }

  #[test]
  fn error_body_extraction() {
    let body = r#"{"error": {"message": "Rate limit reached", "type": "rate_limit"}}"#;
    assert_eq!(extract_openai_error(body).as_deref(), Some("Rate limit reached"));
    assert_eq!(extract_openai_error("not json"), None);
  }
}
