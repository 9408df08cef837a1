//! SCORM Cloud REST client (course hosting).
//!
//! Fixed-credential basic auth, configured at process start; absence of
//! either credential disables all cloud operations. Course creation is two
//! sequential calls (metadata, then package import) with no compensation if
//! the import fails after the metadata call succeeds — the orphaned course
//! record is a known gap of the upstream API flow.
//!
//! User-facing errors are single generic messages; details go to the log.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, instrument};

const DEFAULT_API_URL: &str = "https://cloud.scorm.com/api/v2/";

#[derive(Clone)]
pub struct ScormCloud {
  pub client: reqwest::Client,
  pub base_url: String,
  pub app_id: String,
  secret_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateCourseReq<'a> {
  course_id: &'a str,
  title: &'a str,
  tags: Vec<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LaunchRes {
  launch_link: String,
}

impl ScormCloud {
  /// Construct the client if both credentials are present and non-empty.
  pub fn from_env() -> Option<Self> {
    let app_id = std::env::var("SCORM_CLOUD_APP_ID").ok()?;
    let secret_key = std::env::var("SCORM_CLOUD_SECRET_KEY").ok()?;
    if app_id.trim().is_empty() || secret_key.trim().is_empty() {
      return None;
    }
    let base_url =
      std::env::var("SCORM_CLOUD_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(60))
      .build()
      .ok()?;

    Some(Self { client, base_url, app_id, secret_key })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url, path)
  }

  /// List courses hosted under this application.
  #[instrument(level = "info", skip(self))]
  pub async fn list_courses(&self) -> Result<Value, String> {
    let res = self.client.get(self.url("courses"))
      .basic_auth(&self.app_id, Some(&self.secret_key))
      .send().await
      .and_then(|r| r.error_for_status())
      .map_err(|e| {
        error!(target: "cloud", error = %e, "Course listing failed");
        "Kurslar listelenirken bir hata oluştu.".to_string()
      })?;
    res.json::<Value>().await.map_err(|e| {
      error!(target: "cloud", error = %e, "Course listing returned malformed JSON");
      "Kurslar listelenirken bir hata oluştu.".to_string()
    })
  }

  /// Create a course record, then import the package archive.
  /// No compensation: a failed import leaves the metadata record behind.
  #[instrument(level = "info", skip(self, archive), fields(%course_id, archive_len = archive.len()))]
  pub async fn create_course(
    &self,
    course_id: &str,
    title: &str,
    archive: Vec<u8>,
  ) -> Result<(), String> {
    let generic = || "Kurs oluşturulurken bir hata oluştu.".to_string();

    let body = CreateCourseReq { course_id, title, tags: vec!["SCORM-AI-Generated"] };
    self.client.post(self.url("courses"))
      .basic_auth(&self.app_id, Some(&self.secret_key))
      .json(&body)
      .send().await
      .and_then(|r| r.error_for_status())
      .map_err(|e| {
        error!(target: "cloud", %course_id, error = %e, "Course metadata creation failed");
        generic()
      })?;

    let part = reqwest::multipart::Part::bytes(archive)
      .file_name(format!("{}.zip", course_id))
      .mime_str("application/zip")
      .map_err(|e| {
        error!(target: "cloud", %course_id, error = %e, "Multipart part construction failed");
        generic()
      })?;
    let form = reqwest::multipart::Form::new().part("file", part);

    self.client.post(self.url(&format!("courses/{}/importJobs", course_id)))
      .basic_auth(&self.app_id, Some(&self.secret_key))
      .multipart(form)
      .send().await
      .and_then(|r| r.error_for_status())
      .map_err(|e| {
        error!(target: "cloud", %course_id, error = %e, "Package import failed (metadata record remains)");
        generic()
      })?;

    info!(target: "cloud", %course_id, "Course created and package import started");
    Ok(())
  }

  #[instrument(level = "info", skip(self), fields(%course_id))]
  pub async fn delete_course(&self, course_id: &str) -> Result<(), String> {
    self.client.delete(self.url(&format!("courses/{}", course_id)))
      .basic_auth(&self.app_id, Some(&self.secret_key))
      .send().await
      .and_then(|r| r.error_for_status())
      .map_err(|e| {
        error!(target: "cloud", %course_id, error = %e, "Course deletion failed");
        "Kurs silinirken bir hata oluştu.".to_string()
      })?;
    info!(target: "cloud", %course_id, "Course deleted");
    Ok(())
  }

  /// Request a launch URL for a hosted course.
  #[instrument(level = "info", skip(self, redirect_on_exit), fields(%course_id))]
  pub async fn launch_url(
    &self,
    course_id: &str,
    redirect_on_exit: &str,
  ) -> Result<String, String> {
    let generic = || "Lansman URL'i oluşturulurken bir hata oluştu.".to_string();

    let res = self.client.post(self.url(&format!("courses/{}/launch", course_id)))
      .basic_auth(&self.app_id, Some(&self.secret_key))
      .json(&serde_json::json!({ "redirectOnExitUrl": redirect_on_exit }))
      .send().await
      .and_then(|r| r.error_for_status())
      .map_err(|e| {
        error!(target: "cloud", %course_id, error = %e, "Launch URL request failed");
        generic()
      })?;

    let launch: LaunchRes = res.json().await.map_err(|e| {
      error!(target: "cloud", %course_id, error = %e, "Launch response was malformed");
      generic()
    })?;
    Ok(launch.launch_link)
  }

  /// Fetch the progress report for a hosted course.
  #[instrument(level = "info", skip(self), fields(%course_id))]
  pub async fn progress(&self, course_id: &str) -> Result<Value, String> {
    let res = self.client.get(self.url(&format!("courses/{}/progress", course_id)))
      .basic_auth(&self.app_id, Some(&self.secret_key))
      .send().await
      .and_then(|r| r.error_for_status())
      .map_err(|e| {
        error!(target: "cloud", %course_id, error = %e, "Progress report request failed");
        "İlerleme raporu alınırken bir hata oluştu.".to_string()
      })?;
    res.json::<Value>().await.map_err(|e| {
      error!(target: "cloud", %course_id, error = %e, "Progress report was malformed JSON");
      "İlerleme raporu alınırken bir hata oluştu.".to_string()
    })
  }
}
