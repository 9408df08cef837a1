//! Application state: prompts, optional OpenAI client, optional SCORM Cloud
//! client.
//!
//! Everything is read from the environment exactly once at startup and held
//! as explicit values here; nothing consults env vars afterwards. A missing
//! OPENAI_API_KEY means every document is built from deterministic fallback
//! content; missing cloud credentials disable the cloud routes.

use tracing::{info, instrument};

use crate::cloud::ScormCloud;
use crate::config::{load_content_config_from_env, Prompts};
use crate::openai::OpenAI;

#[derive(Clone)]
pub struct AppState {
    pub openai: Option<OpenAI>,
    pub cloud: Option<ScormCloud>,
    pub prompts: Prompts,
}

impl AppState {
    /// Build state from env: load config, init OpenAI and SCORM Cloud.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        // Load TOML config if provided (prompt overrides).
        let prompts = load_content_config_from_env()
            .map(|c| c.prompts)
            .unwrap_or_default();

        let openai = OpenAI::from_env();
        if let Some(oa) = &openai {
            info!(target: "scormai_backend", base_url = %oa.base_url, model = %oa.model, "OpenAI enabled.");
        } else {
            info!(target: "scormai_backend", "OpenAI disabled (no OPENAI_API_KEY). Using fallback content.");
        }

        let cloud = ScormCloud::from_env();
        if let Some(sc) = &cloud {
            info!(target: "scormai_backend", base_url = %sc.base_url, app_id = %sc.app_id, "SCORM Cloud enabled.");
        } else {
            info!(target: "scormai_backend", "SCORM Cloud disabled (missing credentials). Cloud routes will answer 503.");
        }

        Self { openai, cloud, prompts }
    }
}
