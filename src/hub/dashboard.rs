//! Dashboard aggregate: one concurrent sweep over every domain plus derived
//! stats.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use color_eyre::Result;
use futures::future::join_all;

use super::cached_client::CachedHubClient;
use super::types::{Course, CourseFile, Exam, HelpAnnouncement, Note, Task};

#[derive(Debug, Clone)]
pub struct DashboardData {
  pub courses: Vec<Course>,
  pub exams: Vec<Exam>,
  pub tasks: Vec<Task>,
  pub notes: Vec<Note>,
  pub announcements: Vec<HelpAnnouncement>,
  /// Per-course file lists; a course whose fetch failed maps to an empty list.
  pub files: HashMap<String, Vec<CourseFile>>,
}

#[derive(Debug, Clone)]
pub struct DashboardStats {
  pub total_courses: usize,
  pub total_files: usize,
  pub total_notes: usize,
  pub upcoming_exam: Option<Exam>,
  pub tasks_due_today: Vec<Task>,
  pub overdue_tasks: Vec<Task>,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
  pub data: DashboardData,
  pub stats: DashboardStats,
}

impl CachedHubClient {
  /// Load everything the dashboard shows.
  ///
  /// The five domain reads are joined all-or-nothing. The per-course file
  /// lists are fetched concurrently afterwards, and a failing course
  /// substitutes an empty list rather than failing the dashboard.
  pub async fn dashboard(&self) -> Result<Dashboard> {
    let (courses, exams, tasks, notes, announcements) = tokio::try_join!(
      self.courses(),
      self.exams(),
      self.tasks(),
      self.notes(),
      self.open_announcements(),
    )?;
    let courses = courses.data;
    let exams = exams.data;
    let tasks = tasks.data;
    let notes = notes.data;
    let announcements = announcements.data;

    let file_lists = join_all(courses.iter().map(|course| {
      let client = self.clone();
      let course_id = course.id.clone();
      async move {
        let files = match client.course_files(&course_id).await {
          Ok(result) => result.data,
          Err(e) => {
            tracing::debug!(course_id, error = %e, "file list unavailable for dashboard");
            Vec::new()
          }
        };
        (course_id, files)
      }
    }))
    .await;
    let files: HashMap<String, Vec<CourseFile>> = file_lists.into_iter().collect();

    let today = chrono::Utc::now().date_naive();
    let stats = compute_stats(&courses, &exams, &tasks, &notes, &files, today);

    Ok(Dashboard {
      data: DashboardData {
        courses,
        exams,
        tasks,
        notes,
        announcements,
        files,
      },
      stats,
    })
  }
}

fn compute_stats(
  courses: &[Course],
  exams: &[Exam],
  tasks: &[Task],
  notes: &[Note],
  files: &HashMap<String, Vec<CourseFile>>,
  today: NaiveDate,
) -> DashboardStats {
  let tasks_due_today = tasks
    .iter()
    .filter(|task| !task.completed && due_date(task) == Some(today))
    .cloned()
    .collect();
  let overdue_tasks = tasks
    .iter()
    .filter(|task| !task.completed && matches!(due_date(task), Some(date) if date < today))
    .cloned()
    .collect();

  let upcoming_exam = exams
    .iter()
    .filter_map(|exam| parse_date_time(&exam.exam_date).map(|when| (when, exam)))
    .min_by_key(|(when, _)| *when)
    .map(|(_, exam)| exam.clone());

  DashboardStats {
    total_courses: courses.len(),
    total_files: files.values().map(Vec::len).sum(),
    total_notes: notes.len(),
    upcoming_exam,
    tasks_due_today,
    overdue_tasks,
  }
}

fn due_date(task: &Task) -> Option<NaiveDate> {
  task.due_date.as_deref().and_then(parse_date)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    .ok()
    .or_else(|| parse_date_time(raw).map(|dt| dt.date()))
}

fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
  if let Ok(datetime) = chrono::DateTime::parse_from_rfc3339(raw) {
    return Some(datetime.naive_utc());
  }
  if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
    return Some(datetime);
  }
  NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    .ok()
    .and_then(|date| date.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn task(id: &str, due: Option<&str>, completed: bool) -> Task {
    Task {
      id: id.to_string(),
      title: format!("task {}", id),
      description: None,
      category: "study".to_string(),
      due_date: due.map(str::to_string),
      completed,
    }
  }

  fn exam(id: &str, date: &str) -> Exam {
    Exam {
      id: id.to_string(),
      title: format!("exam {}", id),
      exam_date: date.to_string(),
      priority: 2,
      created_at: "2025-05-01T10:00:00Z".to_string(),
    }
  }

  #[test]
  fn test_due_today_and_overdue_split() {
    let today = NaiveDate::from_ymd_opt(2025, 6, 12).unwrap();
    let tasks = vec![
      task("due", Some("2025-06-12"), false),
      task("overdue", Some("2025-06-10"), false),
      task("done", Some("2025-06-10"), true),
      task("future", Some("2025-07-01"), false),
      task("undated", None, false),
    ];

    let stats = compute_stats(&[], &[], &tasks, &[], &HashMap::new(), today);

    assert_eq!(stats.tasks_due_today.len(), 1);
    assert_eq!(stats.tasks_due_today[0].id, "due");
    assert_eq!(stats.overdue_tasks.len(), 1);
    assert_eq!(stats.overdue_tasks[0].id, "overdue");
  }

  #[test]
  fn test_upcoming_exam_is_earliest_by_date() {
    let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let exams = vec![
      exam("later", "2025-06-20T09:00:00Z"),
      exam("sooner", "2025-06-05T14:00:00Z"),
      exam("unparseable", "someday"),
    ];

    let stats = compute_stats(&[], &exams, &[], &[], &HashMap::new(), today);
    assert_eq!(stats.upcoming_exam.unwrap().id, "sooner");
  }

  #[test]
  fn test_total_files_sums_per_course_lists() {
    let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let mut files = HashMap::new();
    files.insert("c1".to_string(), Vec::new());
    files.insert(
      "c2".to_string(),
      vec![CourseFile {
        id: "f1".to_string(),
        course_id: "c2".to_string(),
        file_name: "a.pdf".to_string(),
        file_path: "c2/a.pdf".to_string(),
        file_type: "application/pdf".to_string(),
        file_size: 1,
        created_at: "2025-05-01T10:00:00Z".to_string(),
      }],
    );

    let stats = compute_stats(&[], &[], &[], &[], &files, today);
    assert_eq!(stats.total_files, 1);
  }

  #[test]
  fn test_date_parsing_accepts_dates_and_datetimes() {
    assert!(parse_date("2025-06-12").is_some());
    assert!(parse_date("2025-06-12T10:00:00Z").is_some());
    assert!(parse_date("2025-06-12T10:00:00").is_some());
    assert!(parse_date("not a date").is_none());
  }
}
