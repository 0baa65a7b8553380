//! Help announcement board endpoints.

use color_eyre::{eyre::WrapErr, Result};

use super::api_types::{Acknowledgement, AnnouncementCreate, AnnouncementUpdate};
use super::transport::HubClient;
use super::types::HelpAnnouncement;

impl HubClient {
  pub async fn create_announcement(&self, data: &AnnouncementCreate) -> Result<HelpAnnouncement> {
    self
      .post_json("/announcements/create-announcements", data)
      .await
      .wrap_err("Failed to create announcement")
  }

  /// Open announcements from other users.
  pub async fn get_open_announcements(&self) -> Result<Vec<HelpAnnouncement>> {
    self
      .get_json("/announcements/announcements")
      .await
      .wrap_err("Failed to fetch announcements")
  }

  pub async fn get_my_announcements(&self) -> Result<Vec<HelpAnnouncement>> {
    self
      .get_json("/announcements/my_announcements")
      .await
      .wrap_err("Failed to fetch my announcements")
  }

  /// Flip open/closed; returns the record with its new status.
  pub async fn toggle_announcement_status(&self, announcement_id: &str) -> Result<HelpAnnouncement> {
    self
      .patch_empty(&format!("/announcements/toggle_status/{}", announcement_id))
      .await
      .wrap_err_with(|| format!("Failed to toggle announcement {}", announcement_id))
  }

  pub async fn update_announcement(
    &self,
    announcement_id: &str,
    data: &AnnouncementUpdate,
  ) -> Result<HelpAnnouncement> {
    self
      .put_json(&format!("/announcements/update_announcements/{}", announcement_id), data)
      .await
      .wrap_err_with(|| format!("Failed to update announcement {}", announcement_id))
  }

  pub async fn delete_announcement(&self, announcement_id: &str) -> Result<()> {
    // The backend route really is spelled "delet_announcements".
    let _: Acknowledgement = self
      .delete(&format!("/announcements/delet_announcements/{}", announcement_id))
      .await
      .wrap_err_with(|| format!("Failed to delete announcement {}", announcement_id))?;
    Ok(())
  }
}
