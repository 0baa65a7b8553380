//! Course endpoints.

use color_eyre::{eyre::WrapErr, Result};

use super::api_types::{Acknowledgement, CourseCreate, CourseUpdate};
use super::transport::HubClient;
use super::types::{CategoryOption, Course};

impl HubClient {
  /// Category options depend on the caller's specialization; the backend
  /// resolves that from the session.
  pub async fn get_categories(&self) -> Result<Vec<CategoryOption>> {
    self
      .get_json("/courses/get_categories")
      .await
      .wrap_err("Failed to fetch course categories")
  }

  pub async fn create_course(&self, data: &CourseCreate) -> Result<Course> {
    self
      .post_json("/courses/create_course", data)
      .await
      .wrap_err("Failed to create course")
  }

  pub async fn get_courses(&self) -> Result<Vec<Course>> {
    self
      .get_json("/courses/get_courses")
      .await
      .wrap_err("Failed to fetch courses")
  }

  pub async fn get_course(&self, course_id: &str) -> Result<Course> {
    self
      .get_json(&format!("/courses/get_course/{}", course_id))
      .await
      .wrap_err_with(|| format!("Failed to fetch course {}", course_id))
  }

  pub async fn update_course(&self, course_id: &str, updates: &CourseUpdate) -> Result<Course> {
    self
      .put_json(&format!("/courses/edit_course/{}", course_id), updates)
      .await
      .wrap_err_with(|| format!("Failed to update course {}", course_id))
  }

  pub async fn delete_course(&self, course_id: &str) -> Result<()> {
    let _: Acknowledgement = self
      .delete(&format!("/courses/{}", course_id))
      .await
      .wrap_err_with(|| format!("Failed to delete course {}", course_id))?;
    Ok(())
  }
}
