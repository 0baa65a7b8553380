//! Caching implementations for StudyHub types.

use crate::cache::{CachePolicy, Cacheable, QueryKey};

use super::types::{
  CategoryOption, ChatMessage, Conversation, Course, CourseFile, Exam, HelpAnnouncement, Note,
  Task,
};

// ============================================================================
// Cacheable implementations
// ============================================================================

impl Cacheable for Course {
  fn cache_key(&self) -> String {
    self.id.clone()
  }

  fn entity_type() -> &'static str {
    "course"
  }
}

impl Cacheable for CourseFile {
  fn cache_key(&self) -> String {
    self.id.clone()
  }

  fn entity_type() -> &'static str {
    "file"
  }
}

impl Cacheable for Note {
  fn cache_key(&self) -> String {
    self.id.clone()
  }

  fn entity_type() -> &'static str {
    "note"
  }
}

impl Cacheable for Exam {
  fn cache_key(&self) -> String {
    self.id.clone()
  }

  fn entity_type() -> &'static str {
    "exam"
  }
}

impl Cacheable for Task {
  fn cache_key(&self) -> String {
    self.id.clone()
  }

  fn entity_type() -> &'static str {
    "task"
  }
}

impl Cacheable for HelpAnnouncement {
  fn cache_key(&self) -> String {
    self.id.clone()
  }

  fn entity_type() -> &'static str {
    "announcement"
  }
}

impl Cacheable for Conversation {
  fn cache_key(&self) -> String {
    self.id.clone()
  }

  fn entity_type() -> &'static str {
    "conversation"
  }
}

impl Cacheable for ChatMessage {
  fn cache_key(&self) -> String {
    self.id.clone()
  }

  fn entity_type() -> &'static str {
    "chat_message"
  }
}

impl Cacheable for CategoryOption {
  fn cache_key(&self) -> String {
    self.value.clone()
  }

  fn entity_type() -> &'static str {
    "category"
  }
}

// ============================================================================
// Query key types
// ============================================================================

/// Cache keys for StudyHub API reads, one per resource collection or detail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HubQuery {
  /// The user's course list
  Courses,
  /// A single course by id
  CourseDetail(String),
  /// Files belonging to one course
  CourseFiles(String),
  /// All of the user's notes
  Notes,
  /// Notes linked to one course
  CourseNotes(String),
  /// Planned exams
  Exams,
  /// The user's tasks
  Tasks,
  /// Open help announcements from other users
  OpenAnnouncements,
  /// The user's own announcements
  MyAnnouncements,
  /// Backend-enumerated course categories
  Categories,
  /// AI chat conversation list
  Conversations,
  /// Messages of one conversation
  ConversationMessages(String),
}

impl QueryKey for HubQuery {
  fn cache_key(&self) -> String {
    match self {
      Self::Courses => "courses:list".to_string(),
      Self::CourseDetail(id) => format!("courses:detail:{}", id),
      Self::CourseFiles(id) => format!("files:course:{}", id),
      Self::Notes => "notes:list".to_string(),
      Self::CourseNotes(id) => format!("notes:course:{}", id),
      Self::Exams => "exams:list".to_string(),
      Self::Tasks => "tasks:list".to_string(),
      Self::OpenAnnouncements => "announcements:open".to_string(),
      Self::MyAnnouncements => "announcements:mine".to_string(),
      Self::Categories => "courses:categories".to_string(),
      Self::Conversations => "chat:conversations".to_string(),
      Self::ConversationMessages(id) => format!("chat:messages:{}", id),
    }
  }

  fn policy(&self) -> CachePolicy {
    match self {
      // Frequently changing collections
      Self::CourseFiles(_)
      | Self::Notes
      | Self::CourseNotes(_)
      | Self::Exams
      | Self::Tasks
      | Self::OpenAnnouncements
      | Self::MyAnnouncements
      | Self::Conversations
      | Self::ConversationMessages(_) => CachePolicy::SHORT,
      // Courses and detail reads
      Self::Courses | Self::CourseDetail(_) => CachePolicy::MEDIUM,
      // Reference data
      Self::Categories => CachePolicy::LONG,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_per_course_keys_are_disjoint() {
    let a = HubQuery::CourseFiles("c1".to_string());
    let b = HubQuery::CourseFiles("c2".to_string());
    assert_ne!(a.cache_key(), b.cache_key());
  }

  #[test]
  fn test_policies_follow_change_frequency() {
    assert_eq!(HubQuery::Tasks.policy(), CachePolicy::SHORT);
    assert_eq!(HubQuery::Courses.policy(), CachePolicy::MEDIUM);
    assert_eq!(HubQuery::Categories.policy(), CachePolicy::LONG);
  }
}
