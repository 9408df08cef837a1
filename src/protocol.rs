//! Public HTTP DTOs (serde ready).
//! Keep this small and stable so the authoring page and backend can evolve
//! independently. The request entity itself lives in `domain`.

use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

/// `POST /api/generate` success body: the lesson body fragment.
#[derive(Serialize)]
pub struct GenerateOut {
    pub content: String,
}

/// Error envelope shared by every non-2xx JSON response.
#[derive(Serialize)]
pub struct ErrorOut {
    pub error: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOut {
    pub success: bool,
    pub course_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchOut {
    pub launch_link: String,
}

#[derive(Debug, Deserialize)]
pub struct LaunchQuery {
    /// Where the LMS sends the learner after exit.
    pub redirect: Option<String>,
}

#[derive(Serialize)]
pub struct DeleteOut {
    pub success: bool,
}
