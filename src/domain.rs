//! Domain models: the content request, its enums, and validation.
//!
//! Wire names are camelCase to stay compatible with the authoring form payloads.

use serde::{Deserialize, Serialize};

/// What kind of learning object is being produced?
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
  Course,
  Quiz,
  Presentation,
}
impl Default for ContentType {
  fn default() -> Self { ContentType::Course }
}

impl ContentType {
  /// Turkish phrase used when asking the model for this kind of content.
  pub fn prompt_phrase(self) -> &'static str {
    match self {
      ContentType::Course => "Bir eğitim kursu içeriği",
      ContentType::Quiz => "Bir quiz/sınav içeriği",
      ContentType::Presentation => "Bir sunum içeriği",
    }
  }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
  Beginner,
  Intermediate,
  Advanced,
}
impl Default for DifficultyLevel {
  fn default() -> Self { DifficultyLevel::Beginner }
}

impl DifficultyLevel {
  /// Turkish label shown in documents and sent in prompts.
  pub fn label_tr(self) -> &'static str {
    match self {
      DifficultyLevel::Beginner => "başlangıç seviyesi",
      DifficultyLevel::Intermediate => "orta seviye",
      DifficultyLevel::Advanced => "ileri seviye",
    }
  }
}

/// Visual theme of the generated page. Cosmetic only, no structural difference.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Template {
  Modern,
  Classic,
  Minimal,
}
impl Default for Template {
  fn default() -> Self { Template::Modern }
}

impl Template {
  /// (body class, header class, content class) for the page shell.
  pub fn css_classes(self) -> (&'static str, &'static str, &'static str) {
    match self {
      Template::Modern => ("modern-template", "modern-header", "modern-content"),
      Template::Classic => ("classic-template", "classic-header", "classic-content"),
      Template::Minimal => ("minimal-template", "minimal-header", "minimal-content"),
    }
  }
}

/// Maximum number of quiz questions rendered, regardless of the requested count.
pub const MAX_QUIZ_QUESTIONS: u32 = 5;

/// Question count used when a quiz is requested without an explicit count.
pub const DEFAULT_QUIZ_QUESTIONS: u32 = 3;

/// A single authoring request; consumed synchronously to build one package.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentRequest {
  pub title: String,
  pub description: String,
  pub learning_objectives: Option<String>,
  pub prompt: String,
  pub content_type: ContentType,
  pub target_audience: Option<String>,
  pub include_quiz: bool,
  pub number_of_questions: Option<u32>,
  pub difficulty_level: DifficultyLevel,
  pub template: Template,

  // Accepted for authoring-form compatibility; not used by packaging.
  pub min_score: Option<u32>,
  pub max_score: Option<u32>,
  pub passing_score: Option<u32>,
  pub time_limit: Option<u32>,
  pub allow_retake: Option<bool>,
  pub max_attempts: Option<u32>,
  pub slide_count: Option<u32>,
  pub include_animations: Option<bool>,
  pub include_audio: Option<bool>,
  pub include_video: Option<bool>,
  pub include_interactive_elements: Option<bool>,
}

impl ContentRequest {
  /// Required-field check. Runs before any network or archive work.
  pub fn validate(&self) -> Result<(), String> {
    if self.title.trim().is_empty() || self.prompt.trim().is_empty() {
      return Err("Başlık ve içerik açıklaması zorunludur.".into());
    }
    Ok(())
  }

  /// Effective quiz question count: requested (or default), capped.
  pub fn quiz_question_count(&self) -> u32 {
    self
      .number_of_questions
      .unwrap_or(DEFAULT_QUIZ_QUESTIONS)
      .min(MAX_QUIZ_QUESTIONS)
  }

  /// Learning objectives split into trimmed, non-empty lines.
  pub fn objective_lines(&self) -> Vec<&str> {
    self
      .learning_objectives
      .as_deref()
      .unwrap_or("")
      .lines()
      .map(str::trim)
      .filter(|l| !l.is_empty())
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn valid_request() -> ContentRequest {
    ContentRequest {
      title: "Fotosentez".into(),
      prompt: "Fotosentezin temellerini anlat".into(),
      ..Default::default()
    }
  }

  #[test]
  fn missing_title_or_prompt_fails_validation() {
    let mut r = valid_request();
    r.title = "  ".into();
    assert!(r.validate().is_err());

    let mut r = valid_request();
    r.prompt = String::new();
    assert!(r.validate().is_err());

    assert!(valid_request().validate().is_ok());
  }

  #[test]
  fn quiz_count_is_capped_at_five() {
    let mut r = valid_request();
    r.number_of_questions = Some(12);
    assert_eq!(r.quiz_question_count(), 5);
    r.number_of_questions = Some(2);
    assert_eq!(r.quiz_question_count(), 2);
    r.number_of_questions = None;
    assert_eq!(r.quiz_question_count(), 3);
  }

  #[test]
  fn camel_case_wire_names_round_trip() {
    let json = r#"{
      "title": "Cebir",
      "prompt": "Temel cebir",
      "learningObjectives": "a\nb",
      "includeQuiz": true,
      "numberOfQuestions": 4,
      "difficultyLevel": "intermediate",
      "contentType": "quiz",
      "template": "classic",
      "passingScore": 70
    }"#;
    let r: ContentRequest = serde_json::from_str(json).unwrap();
    assert!(r.include_quiz);
    assert_eq!(r.number_of_questions, Some(4));
    assert_eq!(r.difficulty_level, DifficultyLevel::Intermediate);
    assert_eq!(r.content_type, ContentType::Quiz);
    assert_eq!(r.template, Template::Classic);
    assert_eq!(r.passing_score, Some(70));
    assert_eq!(r.objective_lines(), vec!["a", "b"]);
  }
}
