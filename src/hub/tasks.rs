//! Task endpoints.

use color_eyre::{eyre::WrapErr, Result};

use super::api_types::{Acknowledgement, TaskCreate};
use super::transport::HubClient;
use super::types::Task;

/// Normalize a due date to `YYYY-MM-DD` as the backend expects.
///
/// Accepts a full RFC 3339 date-time or an already-plain date; anything else
/// passes through untouched (validation happens at the view layer).
pub fn normalize_due_date(raw: &str) -> String {
  if let Ok(datetime) = chrono::DateTime::parse_from_rfc3339(raw) {
    return datetime.date_naive().format("%Y-%m-%d").to_string();
  }
  if let Ok(date) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
    return date.format("%Y-%m-%d").to_string();
  }
  raw.to_string()
}

impl HubClient {
  pub async fn create_task(&self, task: &TaskCreate) -> Result<Task> {
    let body = TaskCreate {
      due_date: task.due_date.as_deref().map(normalize_due_date),
      ..task.clone()
    };

    self
      .post_json("/tasks/create_task", &body)
      .await
      .wrap_err("Failed to create task")
  }

  pub async fn get_tasks(&self) -> Result<Vec<Task>> {
    self
      .get_json("/tasks/get_tasks")
      .await
      .wrap_err("Failed to fetch tasks")
  }

  pub async fn update_task(&self, task_id: &str, task: &TaskCreate) -> Result<Task> {
    let body = TaskCreate {
      due_date: task.due_date.as_deref().map(normalize_due_date),
      ..task.clone()
    };

    self
      .put_json(&format!("/tasks/update_task/{}", task_id), &body)
      .await
      .wrap_err_with(|| format!("Failed to update task {}", task_id))
  }

  pub async fn delete_task(&self, task_id: &str) -> Result<()> {
    let _: Acknowledgement = self
      .delete(&format!("/tasks/delete_task/{}", task_id))
      .await
      .wrap_err_with(|| format!("Failed to delete task {}", task_id))?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_normalize_due_date_truncates_datetime() {
    assert_eq!(normalize_due_date("2025-06-12T09:30:00+02:00"), "2025-06-12");
  }

  #[test]
  fn test_normalize_due_date_keeps_plain_date() {
    assert_eq!(normalize_due_date("2025-06-12"), "2025-06-12");
  }

  #[test]
  fn test_normalize_due_date_passes_garbage_through() {
    assert_eq!(normalize_due_date("next tuesday"), "next tuesday");
  }
}
