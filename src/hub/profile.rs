//! Profile endpoints.

use color_eyre::{eyre::WrapErr, Result};
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use super::api_types::{Acknowledgement, ProfileCompleted, ProfilePayload, ProfileImageUploaded};
use super::files::FileUpload;
use super::transport::HubClient;
use super::types::Profile;

impl HubClient {
  /// Fetch the current user's profile. The backend answers
  /// `{"profile_complete": false}` for accounts without one, which reads as
  /// `None` here.
  pub async fn get_profile(&self) -> Result<Option<Profile>> {
    let value: Value = self
      .get_json("/profiles/me")
      .await
      .wrap_err("Failed to fetch profile")?;

    if value.get("full_name").is_none() {
      return Ok(None);
    }
    let profile =
      serde_json::from_value(value).wrap_err("Failed to parse profile")?;
    Ok(Some(profile))
  }

  pub async fn complete_profile(&self, payload: &ProfilePayload) -> Result<ProfileCompleted> {
    self
      .post_json("/profiles/complete-profile", payload)
      .await
      .wrap_err("Failed to complete profile")
  }

  pub async fn update_profile(&self, payload: &ProfilePayload) -> Result<()> {
    let _: Acknowledgement = self
      .put_json("/profiles/update-profile", payload)
      .await
      .wrap_err("Failed to update profile")?;
    Ok(())
  }

  /// Upload a profile image; returns its public URL.
  pub async fn upload_profile_image(&self, upload: FileUpload) -> Result<String> {
    let file_name = upload.file_name.clone();
    let part = Part::bytes(upload.bytes)
      .file_name(upload.file_name)
      .mime_str(&upload.mime_type)
      .wrap_err_with(|| format!("Failed to prepare image {}", file_name))?;
    let form = Form::new().part("file", part);

    let uploaded: ProfileImageUploaded = self
      .post_multipart("/profiles/upload-profile-image", form)
      .await
      .wrap_err("Failed to upload profile image")?;
    Ok(uploaded.image_url)
  }

  pub async fn delete_profile(&self) -> Result<()> {
    let _: Acknowledgement = self
      .delete("/profiles/delete-profile")
      .await
      .wrap_err("Failed to delete profile")?;
    Ok(())
  }
}
