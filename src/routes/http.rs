//! HTTP endpoint handlers. These are thin wrappers that forward to the
//! assembler, packager, and cloud client.
//! Each handler is instrumented; validation always runs before any network
//! or archive work, and provider failures never surface from /api/generate.

use std::sync::Arc;

use axum::{
  extract::{rejection::JsonRejection, Path, Query, State},
  http::{header, StatusCode},
  response::{Html, IntoResponse},
  Json,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::cloud::ScormCloud;
use crate::content::{assemble_document, lesson_body};
use crate::package::create_package;
use crate::domain::ContentRequest;
use crate::protocol::*;
use crate::state::AppState;

const MALFORMED_JSON: &str = "Geçersiz JSON formatı.";
const CLOUD_DISABLED: &str = "SCORM Cloud yapılandırılmamış.";

type ApiError = (StatusCode, Json<ErrorOut>);

fn bad_request(msg: impl Into<String>) -> ApiError {
  (StatusCode::BAD_REQUEST, Json(ErrorOut { error: msg.into() }))
}

fn server_error(msg: impl Into<String>) -> ApiError {
  (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorOut { error: msg.into() }))
}

/// Unwrap the request body: malformed JSON maps to 400, a missing
/// title/prompt maps to 400, both before anything else happens.
fn validated(payload: Result<Json<ContentRequest>, JsonRejection>) -> Result<ContentRequest, ApiError> {
  let Json(req) = payload.map_err(|e| {
    warn!(target: "scormai_backend", error = %e, "Rejected malformed request body");
    bad_request(MALFORMED_JSON)
  })?;
  req.validate().map_err(bad_request)?;
  Ok(req)
}

/// Borrow the cloud client or answer 503 when credentials are absent.
fn cloud_client(state: &AppState) -> Result<&ScormCloud, ApiError> {
  state.cloud.as_ref().ok_or((
    StatusCode::SERVICE_UNAVAILABLE,
    Json(ErrorOut { error: CLOUD_DISABLED.into() }),
  ))
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
  Json(HealthOut { ok: true })
}

/// Lesson body generation. Always answers 200 with content for a valid
/// request: provider failures are absorbed into fallback content.
#[instrument(level = "info", skip(state, payload))]
pub async fn http_post_generate(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<ContentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let req = validated(payload)?;
  let (content, origin) = lesson_body(state.openai.as_ref(), &state.prompts, &req).await;
  info!(target: "content", %origin, content_len = content.len(), "HTTP generate served");
  Ok(Json(GenerateOut { content }))
}

/// Full document preview, as it will appear inside the package.
#[instrument(level = "info", skip(state, payload))]
pub async fn http_post_preview(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<ContentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let req = validated(payload)?;
  let doc = assemble_document(state.openai.as_ref(), &state.prompts, &req).await;
  info!(target: "content", doc_len = doc.len(), "HTTP preview served");
  Ok(Html(doc))
}

/// Build and stream the SCORM archive as a download.
#[instrument(level = "info", skip(state, payload))]
pub async fn http_post_package(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<ContentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let req = validated(payload)?;
  let pkg = create_package(state.openai.as_ref(), &state.prompts, &req)
    .await
    .map_err(server_error)?;
  info!(target: "package", file_name = %pkg.file_name, archive_len = pkg.archive.len(), "HTTP package served");
  Ok((
    [
      (header::CONTENT_TYPE, "application/zip".to_string()),
      (
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{}\"", pkg.file_name),
      ),
    ],
    pkg.archive,
  ))
}

#[instrument(level = "info", skip(state))]
pub async fn http_list_courses(
  State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
  let cloud = cloud_client(&state)?;
  let courses = cloud.list_courses().await.map_err(server_error)?;
  Ok(Json(courses))
}

/// Build a package for the request and upload it as a new cloud course.
#[instrument(level = "info", skip(state, payload))]
pub async fn http_upload_course(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<ContentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let req = validated(payload)?;
  let cloud = cloud_client(&state)?;

  let pkg = create_package(state.openai.as_ref(), &state.prompts, &req)
    .await
    .map_err(server_error)?;

  let course_id = format!("course_{}", Uuid::new_v4());
  cloud
    .create_course(&course_id, &req.title, pkg.archive)
    .await
    .map_err(server_error)?;
  info!(target: "cloud", %course_id, "HTTP course upload finished");
  Ok(Json(UploadOut { success: true, course_id }))
}

#[instrument(level = "info", skip(state), fields(%course_id))]
pub async fn http_delete_course(
  State(state): State<Arc<AppState>>,
  Path(course_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
  let cloud = cloud_client(&state)?;
  cloud.delete_course(&course_id).await.map_err(server_error)?;
  Ok(Json(DeleteOut { success: true }))
}

#[instrument(level = "info", skip(state, q), fields(%course_id))]
pub async fn http_launch_course(
  State(state): State<Arc<AppState>>,
  Path(course_id): Path<String>,
  Query(q): Query<LaunchQuery>,
) -> Result<impl IntoResponse, ApiError> {
  let cloud = cloud_client(&state)?;
  let redirect = q.redirect.unwrap_or_default();
  let launch_link = cloud.launch_url(&course_id, &redirect).await.map_err(server_error)?;
  Ok(Json(LaunchOut { launch_link }))
}

#[instrument(level = "info", skip(state), fields(%course_id))]
pub async fn http_course_progress(
  State(state): State<Arc<AppState>>,
  Path(course_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
  let cloud = cloud_client(&state)?;
  let progress = cloud.progress(&course_id).await.map_err(server_error)?;
  Ok(Json(progress))
}
