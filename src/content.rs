//! Content Assembler: turns a validated `ContentRequest` into a complete
//! HTML document.
//!
//! The lesson body comes from the OpenAI provider when available; on any
//! provider failure (or when unconfigured) we substitute a deterministic
//! fallback fragment built only from the request fields. Assembly itself
//! never fails: every request resolves to a document.
//!
//! The page shell is fixed: inline CSS with three cosmetic themes selected
//! by `template`, an objectives block, the body in `.ai-content`, a
//! completion button, and the Runtime Bridge script in `<head>`.

use tracing::{info, instrument, warn};

use crate::bridge::runtime_bridge_script;
use crate::config::Prompts;
use crate::domain::ContentRequest;
use crate::openai::OpenAI;
use crate::util::html_escape;

/// Shared stylesheet: theme classes plus common/quiz/ai-content styles.
const PAGE_STYLES: &str = r#"body {
  font-family: Arial, sans-serif;
  margin: 0;
  padding: 0;
  line-height: 1.6;
}

/* Modern Template Styles */
.modern-template {
  background-color: #f9fafb;
  color: #333;
}
.modern-header {
  background: linear-gradient(135deg, #667eea, #764ba2);
  color: white;
  padding: 30px 20px;
  text-align: center;
}
.modern-content {
  max-width: 900px;
  margin: 0 auto;
  padding: 30px 20px;
}

/* Classic Template Styles */
.classic-template {
  background-color: #fff;
  color: #333;
}
.classic-header {
  background-color: #003366;
  color: white;
  padding: 25px 20px;
  text-align: center;
  border-bottom: 5px solid #ffcc00;
}
.classic-content {
  max-width: 800px;
  margin: 0 auto;
  padding: 25px 20px;
}

/* Minimal Template Styles */
.minimal-template {
  background-color: #fff;
  color: #333;
}
.minimal-header {
  background-color: #f5f5f5;
  color: #333;
  padding: 20px;
  text-align: center;
  border-bottom: 1px solid #ddd;
}
.minimal-content {
  max-width: 800px;
  margin: 0 auto;
  padding: 30px 20px;
}

/* Common Styles */
.section {
  margin-bottom: 30px;
}
h1 {
  margin: 0 0 10px 0;
}
h2 {
  margin: 30px 0 15px 0;
  padding-bottom: 10px;
  border-bottom: 1px solid #ddd;
}
.description {
  margin-bottom: 20px;
  font-style: italic;
}
.objectives {
  background-color: rgba(0, 0, 0, 0.05);
  padding: 15px 20px;
  border-radius: 5px;
  margin-bottom: 20px;
}
.objectives ul {
  margin: 0;
  padding-left: 20px;
}
.content-section {
  margin-bottom: 25px;
}
.highlight-box {
  background-color: #f0f4f8;
  padding: 15px;
  border-radius: 5px;
  margin: 15px 0;
}
.quiz-section {
  background-color: #f0f4f8;
  padding: 20px;
  border-radius: 5px;
  margin-top: 30px;
}
.quiz-question {
  margin-bottom: 15px;
}
.options {
  list-style-type: none;
  padding-left: 0;
}
.options li {
  padding: 8px 10px;
  margin-bottom: 5px;
  border: 1px solid #ddd;
  border-radius: 4px;
  cursor: pointer;
}
.options li:hover {
  background-color: #e9ecef;
}
.btn {
  display: inline-block;
  padding: 10px 20px;
  background-color: #4a6fdc;
  color: white;
  border: none;
  border-radius: 4px;
  cursor: pointer;
  text-decoration: none;
  font-size: 16px;
}
.btn:hover {
  background-color: #3a5bbf;
}
.ai-content img {
  max-width: 100%;
  height: auto;
  margin: 15px 0;
}
.ai-content pre {
  background-color: #f5f5f5;
  padding: 15px;
  border-radius: 5px;
  overflow-x: auto;
}
.ai-content code {
  background-color: #f5f5f5;
  padding: 2px 5px;
  border-radius: 3px;
}
.ai-content table {
  border-collapse: collapse;
  width: 100%;
  margin: 15px 0;
}
.ai-content th, .ai-content td {
  border: 1px solid #ddd;
  padding: 8px;
}
.ai-content th {
  background-color: #f2f2f2;
}"#;

const DEFAULT_OBJECTIVE: &str =
  "Bu içeriği tamamladığınızda konuyu tam olarak anlamış olacaksınız.";

/// Deterministic lesson body used when the provider is down or unconfigured.
/// Depends only on request fields, so identical requests produce identical bytes.
pub fn fallback_body(req: &ContentRequest) -> String {
  let title = html_escape(&req.title);
  let difficulty = req.difficulty_level.label_tr();

  let audience = req
    .target_audience
    .as_deref()
    .filter(|a| !a.trim().is_empty())
    .map(|a| format!("\n  <p><strong>Hedef Kitle:</strong> {}</p>", html_escape(a)))
    .unwrap_or_default();

  let mut body = format!(
    r#"<div class="content-section">
  <h2>Giriş</h2>
  <p>Bu eğitim içeriği <strong>{title}</strong> konusunu kapsamaktadır. İçerik {difficulty} seviyesinde hazırlanmıştır.</p>{audience}
</div>

<div class="content-section">
  <h2>İçerik</h2>
  <p>{prompt}</p>

  <h3>Ana Konular</h3>
  <ul>
    <li>Konu 1: Temel kavramlar ve tanımlar</li>
    <li>Konu 2: Uygulama örnekleri</li>
    <li>Konu 3: Pratik alıştırmalar</li>
    <li>Konu 4: Değerlendirme ve özet</li>
  </ul>

  <h3>Detaylı Açıklama</h3>
  <p>Bu bölümde {title} konusunu detaylı olarak inceleyeceğiz. Konu, {difficulty} seviyesinde öğrenciler için uygun şekilde hazırlanmıştır.</p>

  <div class="highlight-box">
    <h4>Önemli Not</h4>
    <p>Bu içerik SCORM standartlarına uygun olarak hazırlanmıştır ve LMS sistemlerinizde sorunsuz çalışacaktır.</p>
  </div>
</div>
"#,
    title = title,
    difficulty = difficulty,
    audience = audience,
    prompt = html_escape(&req.prompt),
  );

  if req.include_quiz {
    body.push_str(
      "\n<div class=\"quiz-section\">\n  <h2>Değerlendirme</h2>\n  <p>Aşağıdaki soruları yanıtlayarak öğrendiklerinizi test edebilirsiniz.</p>\n",
    );
    for i in 1..=req.quiz_question_count() {
      body.push_str(&format!(
        r#"  <div class="quiz-question">
    <h4>Soru {i}:</h4>
    <p>{title} konusu ile ilgili örnek soru {i}?</p>
    <ul class="options">
      <li>A) Seçenek A</li>
      <li>B) Seçenek B</li>
      <li>C) Seçenek C</li>
      <li>D) Seçenek D</li>
    </ul>
  </div>
"#,
        i = i,
        title = title,
      ));
    }
    body.push_str("</div>\n");
  }

  body
}

/// Obtain the lesson body: provider first, deterministic fallback on any
/// failure. Never errors; returns the body and its origin tag.
#[instrument(level = "info", skip(openai, prompts, req), fields(title_len = req.title.len()))]
pub async fn lesson_body(
  openai: Option<&OpenAI>,
  prompts: &Prompts,
  req: &ContentRequest,
) -> (String, &'static str) {
  if let Some(oa) = openai {
    match oa.generate_lesson_body(prompts, req).await {
      Ok(body) => {
        info!(target: "content", body_len = body.len(), origin = "openai", "Lesson body generated");
        return (body, "openai");
      }
      Err(e) => {
        warn!(target: "content", error = %e, "OpenAI generation failed; using fallback content");
      }
    }
  } else {
    info!(target: "content", "OpenAI disabled; using fallback content");
  }
  (fallback_body(req), "fallback")
}

/// Wrap a lesson body fragment in the fixed page shell.
pub fn render_document(req: &ContentRequest, body: &str) -> String {
  let (template_class, header_class, content_class) = req.template.css_classes();
  let objectives = {
    let lines = req.objective_lines();
    if lines.is_empty() {
      format!("<li>{}</li>", DEFAULT_OBJECTIVE)
    } else {
      lines
        .iter()
        .map(|l| format!("<li>{}</li>", html_escape(l)))
        .collect::<Vec<_>>()
        .join("")
    }
  };

  format!(
    r#"<!DOCTYPE html>
<html lang="tr">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>
{styles}
</style>
<script>
{bridge}
</script>
</head>
<body class="{template_class}">
  <header class="{header_class}">
    <h1>{title}</h1>
    <p class="description">{description}</p>
  </header>

  <div class="{content_class}">
    <div class="objectives">
      <h2>Öğrenme Hedefleri</h2>
      <ul>{objectives}</ul>
    </div>

    <div class="ai-content">
{body}
    </div>

    <div style="margin-top: 30px; text-align: center;">
      <button class="btn" onclick="markComplete()">İçeriği Tamamla</button>
    </div>
  </div>
</body>
</html>
"#,
    title = html_escape(&req.title),
    description = html_escape(&req.description),
    styles = PAGE_STYLES,
    bridge = runtime_bridge_script(),
    template_class = template_class,
    header_class = header_class,
    content_class = content_class,
    objectives = objectives,
    body = body,
  )
}

/// Full assembly: body acquisition plus page shell.
#[instrument(level = "info", skip(openai, prompts, req), fields(template = ?req.template))]
pub async fn assemble_document(
  openai: Option<&OpenAI>,
  prompts: &Prompts,
  req: &ContentRequest,
) -> String {
  let (body, origin) = lesson_body(openai, prompts, req).await;
  let doc = render_document(req, &body);
  info!(target: "content", %origin, doc_len = doc.len(), "Document assembled");
  doc
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{ContentRequest, DifficultyLevel, Template};

  fn photosynthesis_request() -> ContentRequest {
    ContentRequest {
      title: "Photosynthesis".into(),
      prompt: "Explain photosynthesis basics".into(),
      include_quiz: true,
      number_of_questions: Some(3),
      difficulty_level: DifficultyLevel::Beginner,
      template: Template::Modern,
      ..Default::default()
    }
  }

  #[test]
  fn fallback_quiz_block_count_is_min_n_5() {
    let mut req = photosynthesis_request();
    req.number_of_questions = Some(9);
    let body = fallback_body(&req);
    assert_eq!(body.matches("class=\"quiz-question\"").count(), 5);
    assert_eq!(body.matches("<li>A) Seçenek A</li>").count(), 5);

    req.number_of_questions = Some(2);
    let body = fallback_body(&req);
    assert_eq!(body.matches("class=\"quiz-question\"").count(), 2);

    req.include_quiz = false;
    let body = fallback_body(&req);
    assert_eq!(body.matches("class=\"quiz-question\"").count(), 0);
    assert!(!body.contains("quiz-section"));
  }

  #[test]
  fn every_question_has_four_options() {
    let body = fallback_body(&photosynthesis_request());
    let questions = body.matches("class=\"quiz-question\"").count();
    let options = body.matches("class=\"options\"").count();
    assert_eq!(questions, 3);
    assert_eq!(options, 3);
    for letter in ["A)", "B)", "C)", "D)"] {
      assert_eq!(body.matches(&format!("<li>{} Seçenek", letter)).count(), 3);
    }
  }

  #[test]
  fn fallback_is_deterministic() {
    let req = photosynthesis_request();
    assert_eq!(fallback_body(&req), fallback_body(&req));
    assert_eq!(render_document(&req, &fallback_body(&req)),
               render_document(&req, &fallback_body(&req)));
  }

  #[tokio::test]
  async fn assembly_without_provider_uses_fallback_document() {
    let req = photosynthesis_request();
    let prompts = Prompts::default();
    let doc = assemble_document(None, &prompts, &req).await;
    assert_eq!(doc, render_document(&req, &fallback_body(&req)));
    assert_eq!(doc.matches("class=\"quiz-question\"").count(), 3);
    assert!(doc.contains("başlangıç seviyesi"));
    assert!(doc.contains("modern-template"));
    assert!(doc.contains("markComplete()"));
  }

  #[test]
  fn template_selects_theme_classes_only() {
    let mut req = photosynthesis_request();
    req.template = Template::Classic;
    let classic = render_document(&req, "x");
    req.template = Template::Minimal;
    let minimal = render_document(&req, "x");
    assert!(classic.contains("class=\"classic-template\""));
    assert!(minimal.contains("class=\"minimal-template\""));
    // Structure is identical across themes.
    assert_eq!(classic.matches("<h2>").count(), minimal.matches("<h2>").count());
  }

  #[test]
  fn title_and_description_are_escaped() {
    let mut req = photosynthesis_request();
    req.title = "Intro <b> & \"stuff\"".into();
    req.description = "a < b".into();
    let doc = render_document(&req, "body");
    assert!(doc.contains("Intro &lt;b&gt; &amp; &quot;stuff&quot;"));
    assert!(doc.contains("a &lt; b"));
  }

  #[test]
  fn objectives_default_when_absent() {
    let req = photosynthesis_request();
    let doc = render_document(&req, "x");
    assert!(doc.contains(DEFAULT_OBJECTIVE));

    let mut req = photosynthesis_request();
    req.learning_objectives = Some("hedef bir\n\nhedef iki\n".into());
    let doc = render_document(&req, "x");
    assert!(doc.contains("<li>hedef bir</li><li>hedef iki</li>"));
  }
}
