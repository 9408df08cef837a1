//! Loading prompt configuration from TOML.
//!
//! See `ContentConfig` and `Prompts` for the expected schema. Defaults match
//! the Turkish prompts the generator ships with; a TOML file pointed at by
//! SCORMAI_CONFIG_PATH can override any of them.

use serde::Deserialize;
use tracing::{info, error};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct ContentConfig {
  #[serde(default)]
  pub prompts: Prompts,
}

/// Prompts used by the OpenAI client when generating lesson bodies.
/// Templates use `{key}` placeholders filled by `util::fill_template`.
#[derive(Clone, Debug, Deserialize)]
pub struct Prompts {
  pub content_system: String,
  pub content_user_template: String,
  pub quiz_rider_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      content_system: "Sen bir SCORM içeriği oluşturma uzmanısın. Verilen talimatlara göre HTML formatında eğitimsel içerik üreteceksin.".into(),
      content_user_template: "Başlık: {title}\nAçıklama: {description}\nZorluk Seviyesi: {difficulty}\nİçerik Türü: {content_type}\n{audience_line}\nÖğrenme Hedefleri:\n{objectives}\n\nİstenen İçerik:\n{prompt}\n{quiz_rider}\n\nLütfen bu bilgilere göre HTML formatında eğitimsel bir içerik oluştur.\nİçerik, temel HTML ve CSS ile biçimlendirilmiş olmalı ve bölümleri, görselleri (sadece textual açıklamalarla) ve gerekirse interaktif unsurları içermelidir.".into(),
      quiz_rider_template: "Ayrıca, {count} adet soru içeren bir quiz bölümü ekle. Her soru için 4 seçenek olmalı ve doğru cevabı belirtmelisin.".into(),
    }
  }
}

/// Attempt to load `ContentConfig` from SCORMAI_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_content_config_from_env() -> Option<ContentConfig> {
  let path = std::env::var("SCORMAI_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<ContentConfig>(&s) {
      Ok(cfg) => {
        info!(target: "scormai_backend", %path, "Loaded content config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "scormai_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "scormai_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn toml_override_and_empty_config_parse() {
    let cfg: ContentConfig = toml::from_str(
      "[prompts]\ncontent_system = \"custom\"\ncontent_user_template = \"t\"\nquiz_rider_template = \"q\"\n",
    )
    .unwrap();
    assert_eq!(cfg.prompts.content_system, "custom");

    let empty: ContentConfig = toml::from_str("").unwrap();
    assert!(empty.prompts.content_system.contains("SCORM"));
  }
}
