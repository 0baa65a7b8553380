//! Exam planning endpoints.
//!
//! The backend keeps the original path prefix "/planing".

use color_eyre::{eyre::WrapErr, Result};

use super::api_types::{Acknowledgement, ExamCreate};
use super::transport::HubClient;
use super::types::Exam;

impl HubClient {
  pub async fn get_exams(&self) -> Result<Vec<Exam>> {
    self
      .get_json("/planing/get_exams")
      .await
      .wrap_err("Failed to fetch exams")
  }

  pub async fn add_exam(&self, exam: &ExamCreate) -> Result<Exam> {
    self
      .post_json("/planing/add_exam", exam)
      .await
      .wrap_err("Failed to add exam")
  }

  pub async fn delete_exam(&self, exam_id: &str) -> Result<()> {
    let _: Acknowledgement = self
      .delete(&format!("/planing/delete_exam/{}", exam_id))
      .await
      .wrap_err_with(|| format!("Failed to delete exam {}", exam_id))?;
    Ok(())
  }

  /// Generate the weekly study plan; returns the PDF bytes.
  pub async fn generate_plan(&self) -> Result<Vec<u8>> {
    self
      .get_bytes("/planing/generate_plan")
      .await
      .wrap_err("Failed to generate study plan")
  }
}
