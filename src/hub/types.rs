//! Domain entity types cached by the client.
//!
//! Every entity is owned by the backend of record; these are the shapes the
//! client caches and renders. Timestamps stay as the backend's ISO 8601
//! strings; nothing here needs date arithmetic except the dashboard, which
//! parses on demand.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A course owned by the current user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
  pub id: String,
  pub title: String,
  #[serde(default)]
  pub description: String,
  pub category: Option<String>,
  pub user_id: String,
  pub created_at: String,
  pub updated_at: String,
}

/// One entry of the backend-enumerated course category list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryOption {
  pub value: String,
  pub label: String,
}

/// A file stored under a course.
///
/// Preview and download URL issuance addresses files by name within their
/// course, so `file_name` is the lookup handle, not `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseFile {
  pub id: String,
  pub course_id: String,
  pub file_name: String,
  pub file_path: String,
  pub file_type: String,
  pub file_size: u64,
  pub created_at: String,
}

/// Rich-text note content: an opaque tree with a typed root and ordered
/// children. Always well-formed, even when empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteDocument {
  #[serde(rename = "type")]
  pub kind: String,
  #[serde(default)]
  pub content: Vec<Value>,
}

impl NoteDocument {
  /// The well-formed empty document.
  pub fn empty() -> Self {
    Self {
      kind: "doc".to_string(),
      content: Vec::new(),
    }
  }

  /// Collect the `src` of every image node in the document tree.
  pub fn image_urls(&self) -> Vec<String> {
    fn walk(node: &Value, urls: &mut Vec<String>) {
      if node.get("type").and_then(Value::as_str) == Some("image") {
        if let Some(src) = node.pointer("/attrs/src").and_then(Value::as_str) {
          urls.push(src.to_owned());
        }
      }
      if let Some(children) = node.get("content").and_then(Value::as_array) {
        for child in children {
          walk(child, urls);
        }
      }
    }

    let mut urls = Vec::new();
    for node in &self.content {
      walk(node, &mut urls);
    }
    urls
  }
}

impl Default for NoteDocument {
  fn default() -> Self {
    Self::empty()
  }
}

/// A note, optionally linked to a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
  pub id: String,
  pub user_id: String,
  pub title: String,
  pub content: NoteDocument,
  pub course_id: Option<String>,
  pub created_at: String,
  pub updated_at: String,
}

/// A planned exam. Priority runs 1 (highest) to 5 (lowest).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
  pub id: String,
  pub title: String,
  pub exam_date: String,
  pub priority: u8,
  pub created_at: String,
}

/// A to-do item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
  pub id: String,
  pub title: String,
  pub description: Option<String>,
  pub category: String,
  pub due_date: Option<String>,
  pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactMethod {
  Email,
  Phone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementStatus {
  Open,
  Closed,
}

/// A peer help request on the announcement board.
///
/// Owner display name and avatar are denormalized onto the record by the
/// backend so the board renders without a second profile fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelpAnnouncement {
  pub id: String,
  pub title: String,
  // The backend spells this field "categorie".
  #[serde(rename = "categorie")]
  pub category: String,
  pub contact_method: ContactMethod,
  pub contact_value: String,
  pub status: AnnouncementStatus,
  pub user_id: String,
  pub full_name: Option<String>,
  pub image_url: Option<String>,
  pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcademicLevel {
  #[serde(rename = "CP1")]
  Cp1,
  #[serde(rename = "CP2")]
  Cp2,
  #[serde(rename = "GI1")]
  Gi1,
  #[serde(rename = "GI2")]
  Gi2,
  #[serde(rename = "GI3")]
  Gi3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Specialization {
  #[serde(rename = "Ingénierie Informatique et Réseaux")]
  Informatique,
  #[serde(rename = "Génie Electrique et Systèmes Intelligents")]
  Electrique,
  #[serde(rename = "Génie Civil, Bâtiments et Travaux Publics (BTP)")]
  Civil,
  #[serde(rename = "Génie Industriel")]
  Industriel,
  #[serde(rename = "Génie Financier")]
  Financier,
}

/// The current user's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
  pub full_name: String,
  pub academic_level: AcademicLevel,
  pub specialization: Option<Specialization>,
  pub is_anonymous: bool,
  pub email: Option<String>,
  pub image_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
  User,
  Assistant,
}

/// An AI chat conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
  pub id: String,
  pub user_id: String,
  pub title: String,
  pub created_at: String,
  pub updated_at: String,
}

/// One message inside a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
  pub id: String,
  pub conversation_id: String,
  pub role: ChatRole,
  pub content: String,
  pub created_at: String,
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_empty_document_is_well_formed() {
    let doc = NoteDocument::empty();
    assert_eq!(doc.kind, "doc");
    assert!(doc.content.is_empty());

    let round: NoteDocument = serde_json::from_value(serde_json::to_value(&doc).unwrap()).unwrap();
    assert_eq!(round, doc);
  }

  #[test]
  fn test_image_urls_walks_nested_content() {
    let doc: NoteDocument = serde_json::from_value(json!({
      "type": "doc",
      "content": [
        { "type": "paragraph", "content": [ { "type": "text", "text": "hello" } ] },
        { "type": "image", "attrs": { "src": "https://files.example/a.png" } },
        {
          "type": "blockquote",
          "content": [
            { "type": "image", "attrs": { "src": "https://files.example/b.png" } }
          ]
        }
      ]
    }))
    .unwrap();

    assert_eq!(
      doc.image_urls(),
      vec!["https://files.example/a.png", "https://files.example/b.png"]
    );
  }

  #[test]
  fn test_image_without_src_is_skipped() {
    let doc: NoteDocument = serde_json::from_value(json!({
      "type": "doc",
      "content": [ { "type": "image", "attrs": {} } ]
    }))
    .unwrap();

    assert!(doc.image_urls().is_empty());
  }

  #[test]
  fn test_academic_level_wire_names() {
    let level: AcademicLevel = serde_json::from_str("\"GI2\"").unwrap();
    assert_eq!(level, AcademicLevel::Gi2);
    assert_eq!(serde_json::to_string(&level).unwrap(), "\"GI2\"");
  }

  #[test]
  fn test_announcement_uses_backend_field_spelling() {
    let ann: HelpAnnouncement = serde_json::from_value(json!({
      "id": "a1",
      "title": "Need help with hydraulics",
      "categorie": "Hydraulique Appliquée",
      "contact_method": "email",
      "contact_value": "x@y.z",
      "status": "open",
      "user_id": "u1",
      "created_at": "2025-05-01T10:00:00Z"
    }))
    .unwrap();

    assert_eq!(ann.category, "Hydraulique Appliquée");
    assert_eq!(ann.status, AnnouncementStatus::Open);
  }
}
