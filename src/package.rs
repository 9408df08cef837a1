//! SCORM Packager: manifest XML, placeholder schemas, ZIP assembly.
//!
//! The archive carries exactly five members: `index.html`, `imsmanifest.xml`
//! and the three placeholder XSDs the manifest's schemaLocation names. The
//! placeholders are comment-only, as shipped by the packager this replaces;
//! they would not pass strict validation against the real ADL schemas.
//!
//! Packaging is synchronous and in-memory; any failure surfaces as a single
//! generic user-facing message.

use std::io::{Cursor, Write};

use tracing::{error, info, instrument};
use zip::{write::FileOptions, ZipWriter};

use crate::config::Prompts;
use crate::content::assemble_document;
use crate::domain::ContentRequest;
use crate::openai::OpenAI;
use crate::util::xml_escape;

pub const PACKAGE_ERROR: &str = "SCORM paketi oluşturulurken bir hata oluştu.";

/// Placeholder schema members referenced by the manifest's schemaLocation.
pub const PLACEHOLDER_SCHEMAS: &[(&str, &str)] = &[
  ("imscp_rootv1p1p2.xsd", "<!-- XSD şeması burada olacak -->"),
  ("imsmd_rootv1p2p1.xsd", "<!-- XSD şeması burada olacak -->"),
  ("adlcp_rootv1p2.xsd", "<!-- XSD şeması burada olacak -->"),
];

/// An assembled package: archive bytes plus the suggested download name.
#[derive(Debug)]
pub struct GeneratedPackage {
  pub archive: Vec<u8>,
  pub file_name: String,
}

/// Manifest identifier: `com.scormai.` + title with whitespace as underscores.
pub fn manifest_identifier(title: &str) -> String {
  let slug: String = title
    .chars()
    .map(|c| if c.is_whitespace() { '_' } else { c })
    .collect();
  format!("com.scormai.{}", slug)
}

/// Download name: every non-ASCII-alphanumeric character becomes `_`,
/// then the fixed `_SCORM.zip` suffix.
pub fn package_file_name(title: &str) -> String {
  let slug: String = title
    .chars()
    .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
    .collect();
  format!("{}_SCORM.zip", slug)
}

/// SCORM 1.2 IMS Content Packaging manifest: one organization, one item,
/// one sco resource pointing at index.html. No masteryscore element.
pub fn manifest_xml(req: &ContentRequest) -> String {
  let identifier = xml_escape(&manifest_identifier(&req.title));
  let title = xml_escape(&req.title);
  let description = xml_escape(&req.description);

  format!(
    r#"<?xml version="1.0" encoding="UTF-8"?>
<manifest identifier="{identifier}" version="1.0"
          xmlns="http://www.imsproject.org/xsd/imscp_rootv1p1p2"
          xmlns:adlcp="http://www.adlnet.org/xsd/adlcp_rootv1p2"
          xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
          xsi:schemaLocation="http://www.imsproject.org/xsd/imscp_rootv1p1p2 imscp_rootv1p1p2.xsd
                              http://www.imsglobal.org/xsd/imsmd_rootv1p2p1 imsmd_rootv1p2p1.xsd
                              http://www.adlnet.org/xsd/adlcp_rootv1p2 adlcp_rootv1p2.xsd">
  <metadata>
    <schema>ADL SCORM</schema>
    <schemaversion>1.2</schemaversion>
    <lom:lom xmlns="http://www.imsglobal.org/xsd/imsmd_rootv1p2p1"
             xmlns:lom="http://www.imsglobal.org/xsd/imsmd_rootv1p2p1">
      <lom:general>
        <lom:title>
          <lom:langstring>{title}</lom:langstring>
        </lom:title>
        <lom:description>
          <lom:langstring>{description}</lom:langstring>
        </lom:description>
      </lom:general>
    </lom:lom>
  </metadata>
  <organizations default="scormai_org">
    <organization identifier="scormai_org">
      <title>{title}</title>
      <item identifier="item_1" identifierref="resource_1" isvisible="true">
        <title>{title}</title>
      </item>
    </organization>
  </organizations>
  <resources>
    <resource identifier="resource_1" type="webcontent" adlcp:scormtype="sco" href="index.html">
      <file href="index.html" />
    </resource>
  </resources>
</manifest>"#,
    identifier = identifier,
    title = title,
    description = description,
  )
}

/// Write the five members into an in-memory ZIP.
pub fn build_archive(document: &str, manifest: &str) -> Result<Vec<u8>, String> {
  let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
  let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

  let mut add = |name: &str, data: &str| -> Result<(), String> {
    zip.start_file(name, options).map_err(|e| e.to_string())?;
    zip.write_all(data.as_bytes()).map_err(|e| e.to_string())
  };

  add("index.html", document)?;
  add("imsmanifest.xml", manifest)?;
  for (name, body) in PLACEHOLDER_SCHEMAS {
    add(name, body)?;
  }

  let cursor = zip.finish().map_err(|e| e.to_string())?;
  Ok(cursor.into_inner())
}

/// Build a complete package for a request: validate, assemble, archive.
#[instrument(level = "info", skip(openai, prompts, req), fields(title_len = req.title.len(), include_quiz = req.include_quiz))]
pub async fn create_package(
  openai: Option<&OpenAI>,
  prompts: &Prompts,
  req: &ContentRequest,
) -> Result<GeneratedPackage, String> {
  req.validate()?;

  let document = assemble_document(openai, prompts, req).await;
  let manifest = manifest_xml(req);

  let archive = build_archive(&document, &manifest).map_err(|e| {
    error!(target: "package", error = %e, "ZIP assembly failed");
    PACKAGE_ERROR.to_string()
  })?;

  let file_name = package_file_name(&req.title);
  info!(target: "package", %file_name, archive_len = archive.len(), "Package assembled");
  Ok(GeneratedPackage { archive, file_name })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{ContentRequest, DifficultyLevel, Template};
  use std::io::Read;

  fn request(title: &str) -> ContentRequest {
    ContentRequest {
      title: title.into(),
      prompt: "Explain the basics".into(),
      difficulty_level: DifficultyLevel::Beginner,
      template: Template::Modern,
      ..Default::default()
    }
  }

  #[test]
  fn file_name_substitutes_every_non_alphanumeric() {
    assert_eq!(package_file_name("Intro: Algebra!"), "Intro__Algebra__SCORM.zip");
    assert_eq!(package_file_name("Fotosentez"), "Fotosentez_SCORM.zip");
    // Non-ASCII letters are substituted too, one underscore per char.
    assert_eq!(package_file_name("Eğitim"), "E_itim_SCORM.zip");
  }

  #[test]
  fn manifest_identifier_replaces_whitespace_only() {
    assert_eq!(manifest_identifier("Photosynthesis"), "com.scormai.Photosynthesis");
    assert_eq!(manifest_identifier("Temel Cebir"), "com.scormai.Temel_Cebir");
    assert_eq!(manifest_identifier("Intro: Algebra!"), "com.scormai.Intro:_Algebra!");
  }

  #[test]
  fn manifest_declares_one_sco_resource_for_index_html() {
    let xml = manifest_xml(&request("Photosynthesis"));
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("identifier=\"com.scormai.Photosynthesis\""));
    assert_eq!(xml.matches("<resource ").count(), 1);
    assert!(xml.contains("adlcp:scormtype=\"sco\" href=\"index.html\""));
    assert!(xml.contains("<schemaversion>1.2</schemaversion>"));
    assert!(!xml.contains("masteryscore"));
  }

  #[test]
  fn manifest_escapes_title_and_description() {
    let mut req = request("Q&A <advanced>");
    req.description = "\"quotes\" & more".into();
    let xml = manifest_xml(&req);
    assert!(xml.contains("<title>Q&amp;A &lt;advanced&gt;</title>"));
    assert!(xml.contains("&quot;quotes&quot; &amp; more"));
    assert!(!xml.contains("<advanced>"));
  }

  #[tokio::test]
  async fn archive_contains_exactly_the_expected_members() {
    let pkg = create_package(None, &Prompts::default(), &request("Photosynthesis"))
      .await
      .unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(pkg.archive)).unwrap();

    let mut names: Vec<String> = (0..archive.len())
      .map(|i| archive.by_index(i).unwrap().name().to_string())
      .collect();
    names.sort();
    assert_eq!(
      names,
      vec![
        "adlcp_rootv1p2.xsd",
        "imscp_rootv1p1p2.xsd",
        "imsmanifest.xml",
        "imsmd_rootv1p2p1.xsd",
        "index.html",
      ]
    );

    let mut manifest = String::new();
    archive.by_name("imsmanifest.xml").unwrap().read_to_string(&mut manifest).unwrap();
    assert!(manifest.contains("href=\"index.html\""));

    let mut doc = String::new();
    archive.by_name("index.html").unwrap().read_to_string(&mut doc).unwrap();
    assert!(doc.starts_with("<!DOCTYPE html>"));
  }

  #[tokio::test]
  async fn invalid_request_is_rejected_before_assembly() {
    let mut req = request("");
    req.prompt = "p".into();
    let err = create_package(None, &Prompts::default(), &req).await.unwrap_err();
    assert_eq!(err, "Başlık ve içerik açıklaması zorunludur.");
  }

  #[tokio::test]
  async fn end_to_end_fallback_package_matches_expectations() {
    let req = ContentRequest {
      title: "Photosynthesis".into(),
      prompt: "Explain photosynthesis basics".into(),
      include_quiz: true,
      number_of_questions: Some(3),
      difficulty_level: DifficultyLevel::Beginner,
      template: Template::Modern,
      ..Default::default()
    };
    let pkg = create_package(None, &Prompts::default(), &req).await.unwrap();
    assert_eq!(pkg.file_name, "Photosynthesis_SCORM.zip");

    let mut archive = zip::ZipArchive::new(Cursor::new(pkg.archive)).unwrap();
    let mut doc = String::new();
    archive.by_name("index.html").unwrap().read_to_string(&mut doc).unwrap();
    assert_eq!(doc.matches("class=\"quiz-question\"").count(), 3);
    assert!(doc.contains("başlangıç seviyesi"));

    let mut manifest = String::new();
    archive.by_name("imsmanifest.xml").unwrap().read_to_string(&mut manifest).unwrap();
    assert!(manifest.contains("com.scormai.Photosynthesis"));
  }
}
