//! Note endpoints, including the embedded-image lifecycle.

use color_eyre::{eyre::WrapErr, Result};
use reqwest::multipart::{Form, Part};

use super::api_types::{
  Acknowledgement, ImageDeleteRequest, NoteCreate, NoteUpdate, NotesEnvelope, UploadedImage,
};
use super::files::FileUpload;
use super::transport::HubClient;
use super::types::{Note, NoteDocument};

impl HubClient {
  pub async fn create_note(&self, data: &NoteCreate) -> Result<Note> {
    self
      .post_json("/notes/create_note", data)
      .await
      .wrap_err("Failed to create note")
  }

  pub async fn get_notes(&self) -> Result<Vec<Note>> {
    self
      .get_json("/notes/get_notes")
      .await
      .wrap_err("Failed to fetch notes")
  }

  pub async fn get_note(&self, note_id: &str) -> Result<Note> {
    self
      .get_json(&format!("/notes/get_note/{}", note_id))
      .await
      .wrap_err_with(|| format!("Failed to fetch note {}", note_id))
  }

  /// Update a note. An absent content field is sent as the well-formed empty
  /// document so the stored content never becomes malformed.
  pub async fn update_note(&self, note_id: &str, updates: &NoteUpdate) -> Result<Note> {
    let body = NoteUpdate {
      title: updates.title.clone(),
      content: Some(updates.content.clone().unwrap_or_else(NoteDocument::empty)),
      course_id: updates.course_id.clone(),
    };

    self
      .put_json(&format!("/notes/edit_note/{}", note_id), &body)
      .await
      .wrap_err_with(|| format!("Failed to update note {}", note_id))
  }

  pub async fn delete_note(&self, note_id: &str) -> Result<()> {
    let _: Acknowledgement = self
      .delete(&format!("/notes/delete_note/{}", note_id))
      .await
      .wrap_err_with(|| format!("Failed to delete note {}", note_id))?;
    Ok(())
  }

  pub async fn get_notes_by_course(&self, course_id: &str) -> Result<Vec<Note>> {
    let envelope: NotesEnvelope = self
      .get_json(&format!("/notes/get_notes_by_course/{}", course_id))
      .await
      .wrap_err_with(|| format!("Failed to fetch notes for course {}", course_id))?;
    Ok(envelope.notes)
  }

  /// Upload an image embedded in a note; returns its storage path.
  pub async fn upload_note_image(&self, note_id: &str, upload: FileUpload) -> Result<String> {
    let file_name = upload.file_name.clone();
    let part = Part::bytes(upload.bytes)
      .file_name(upload.file_name)
      .mime_str(&upload.mime_type)
      .wrap_err_with(|| format!("Failed to prepare image {}", file_name))?;
    let form = Form::new().part("file", part);

    let uploaded: UploadedImage = self
      .post_multipart(&format!("/notes/upload_image/{}", note_id), form)
      .await
      .wrap_err_with(|| format!("Failed to upload note image {}", file_name))?;
    Ok(uploaded.file_data.file_path)
  }

  /// Delete an embedded image by its URL.
  pub async fn delete_note_image(&self, image_url: &str) -> Result<()> {
    let body = ImageDeleteRequest {
      url: image_url.to_string(),
    };

    let _: Acknowledgement = self
      .delete_json("/notes/delete_image", &body)
      .await
      .wrap_err("Failed to delete note image")?;
    Ok(())
  }
}
