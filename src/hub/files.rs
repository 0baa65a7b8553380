//! Course file endpoints: upload, listing, signed URL issuance, deletion.
//!
//! Preview and download URLs are issued by file NAME within a course, not by
//! id; names go percent-encoded into the path.

use color_eyre::{eyre::WrapErr, Result};
use reqwest::multipart::{Form, Part};

use super::api_types::{Acknowledgement, FilesEnvelope, SignedUrl, UploadedFile};
use super::transport::HubClient;
use super::types::CourseFile;

/// One file ready to send: name, MIME type, and raw bytes.
#[derive(Debug, Clone)]
pub struct FileUpload {
  pub file_name: String,
  pub mime_type: String,
  pub bytes: Vec<u8>,
}

impl HubClient {
  pub async fn upload_file(&self, course_id: &str, upload: FileUpload) -> Result<CourseFile> {
    let file_name = upload.file_name.clone();
    let part = Part::bytes(upload.bytes)
      .file_name(upload.file_name)
      .mime_str(&upload.mime_type)
      .wrap_err_with(|| format!("Failed to prepare upload {}", file_name))?;
    let form = Form::new().part("file", part);

    let uploaded: UploadedFile = self
      .post_multipart(&format!("/files/upload_file/{}", course_id), form)
      .await
      .wrap_err_with(|| format!("Failed to upload file {}", file_name))?;
    Ok(uploaded.file_data)
  }

  pub async fn get_files(&self, course_id: &str) -> Result<Vec<CourseFile>> {
    let envelope: FilesEnvelope = self
      .get_json(&format!("/files/get_files/{}", course_id))
      .await
      .wrap_err_with(|| format!("Failed to fetch files for course {}", course_id))?;
    Ok(envelope.files)
  }

  pub async fn get_preview_url(&self, course_id: &str, file_name: &str) -> Result<String> {
    let signed: SignedUrl = self
      .get_json(&format!(
        "/files/generate_preview_url/{}/{}",
        course_id,
        urlencoding::encode(file_name)
      ))
      .await
      .wrap_err_with(|| format!("Failed to generate preview URL for {}", file_name))?;
    Ok(signed.url)
  }

  pub async fn get_download_url(&self, course_id: &str, file_name: &str) -> Result<String> {
    let signed: SignedUrl = self
      .get_json(&format!(
        "/files/generate_download_url/{}/{}",
        course_id,
        urlencoding::encode(file_name)
      ))
      .await
      .wrap_err_with(|| format!("Failed to generate download URL for {}", file_name))?;
    Ok(signed.url)
  }

  /// Fetch the raw file content directly (small previews).
  pub async fn preview_file(&self, course_id: &str, file_name: &str) -> Result<Vec<u8>> {
    self
      .get_bytes(&format!(
        "/files/preview_file/{}/{}",
        course_id,
        urlencoding::encode(file_name)
      ))
      .await
      .wrap_err_with(|| format!("Failed to fetch preview of {}", file_name))
  }

  pub async fn delete_file(&self, course_id: &str, file_id: &str) -> Result<()> {
    let _: Acknowledgement = self
      .delete(&format!("/files/delete_file/{}/{}", course_id, file_id))
      .await
      .wrap_err_with(|| format!("Failed to delete file {}", file_id))?;
    Ok(())
  }
}
