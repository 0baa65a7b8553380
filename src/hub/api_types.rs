//! Serde types matching backend request and response bodies.
//!
//! These are separate from the domain types: envelopes and payloads mirror the
//! wire exactly, while domain types stay focused on what the client caches.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::{
  AcademicLevel, AnnouncementStatus, ChatMessage, ChatRole, ContactMethod, Conversation,
  CourseFile, Note, NoteDocument, Specialization,
};

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Serialize)]
pub struct Credentials {
  pub email: String,
  pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
  /// Empty on signup (the session only exists after email verification).
  #[serde(default)]
  pub access_token: String,
  pub user_id: String,
  pub email: String,
  #[serde(default)]
  pub profile_complete: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
  pub access_token: String,
  #[serde(default)]
  pub refresh_token: String,
  #[serde(default)]
  pub expires_in: u64,
}

#[derive(Debug, Serialize)]
pub struct EmailChangeRequest {
  pub new_email: String,
  pub current_password: String,
}

#[derive(Debug, Serialize)]
pub struct PasswordChangeRequest {
  pub current_password: String,
  pub new_password: String,
}

// ============================================================================
// Courses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CourseCreate {
  pub title: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CourseUpdate {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub category: Option<String>,
}

// ============================================================================
// Files
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct FilesEnvelope {
  #[serde(default)]
  pub files: Vec<CourseFile>,
}

#[derive(Debug, Deserialize)]
pub struct UploadedFile {
  pub message: String,
  pub file_data: CourseFile,
}

#[derive(Debug, Deserialize)]
pub struct SignedUrl {
  pub url: String,
}

// ============================================================================
// Notes
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct NoteCreate {
  pub title: String,
  pub content: NoteDocument,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub course_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NoteUpdate {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title: Option<String>,
  /// Defaults to the well-formed empty document when absent.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub content: Option<NoteDocument>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub course_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NotesEnvelope {
  #[serde(default)]
  pub notes: Vec<Note>,
}

#[derive(Debug, Deserialize)]
pub struct UploadedImage {
  pub file_data: ImagePath,
}

#[derive(Debug, Deserialize)]
pub struct ImagePath {
  pub file_path: String,
}

#[derive(Debug, Serialize)]
pub struct ImageDeleteRequest {
  pub url: String,
}

// ============================================================================
// Planning
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ExamCreate {
  pub title: String,
  /// ISO 8601 date-time.
  pub exam_date: String,
  /// 1 = highest .. 5 = lowest.
  pub priority: u8,
}

// ============================================================================
// Tasks
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct TaskCreate {
  pub title: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub category: String,
  /// Serialized as `YYYY-MM-DD`.
  pub due_date: Option<String>,
  pub completed: bool,
}

// ============================================================================
// Announcements
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct AnnouncementCreate {
  pub title: String,
  #[serde(rename = "categorie")]
  pub category: String,
  pub contact_method: ContactMethod,
  /// Falls back to the account email server-side when absent for email contact.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub contact_value: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status: Option<AnnouncementStatus>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AnnouncementUpdate {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title: Option<String>,
  #[serde(rename = "categorie", skip_serializing_if = "Option::is_none")]
  pub category: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub contact_method: Option<ContactMethod>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub contact_value: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status: Option<AnnouncementStatus>,
}

// ============================================================================
// Profile
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ProfilePayload {
  pub full_name: String,
  pub academic_level: AcademicLevel,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub specialization: Option<Specialization>,
  pub is_anonymous: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub image_url: Option<String>,
}

/// Response of profile completion. The backend reissues the session with the
/// updated claim; a fresh token may ride along in the body.
#[derive(Debug, Deserialize)]
pub struct ProfileCompleted {
  #[serde(default)]
  pub status: Option<String>,
  #[serde(default)]
  pub user_id: Option<String>,
  #[serde(default)]
  pub new_access_token: Option<String>,
  #[serde(default)]
  pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpdated {
  pub message: String,
  #[serde(default)]
  pub profile: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileImageUploaded {
  pub image_url: String,
}

// ============================================================================
// AI chat
// ============================================================================

#[derive(Debug, Serialize)]
pub struct OutgoingMessage {
  pub role: ChatRole,
  pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatReply {
  pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct StartConversationRequest {
  pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ConversationStarted {
  pub conversation_id: String,
}

#[derive(Debug, Serialize)]
pub struct SaveMessageRequest {
  pub conversation_id: String,
  pub role: ChatRole,
  pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageSaved {
  pub success: bool,
}

#[derive(Debug, Deserialize)]
pub struct ConversationsEnvelope {
  #[serde(default)]
  pub conversations: Vec<Conversation>,
}

#[derive(Debug, Deserialize)]
pub struct MessagesEnvelope {
  #[serde(default)]
  pub messages: Vec<ChatMessage>,
}

// ============================================================================
// Shared
// ============================================================================

/// Plain `{"message": ...}` acknowledgements (deletes, logout, email change).
#[derive(Debug, Deserialize)]
pub struct Acknowledgement {
  pub message: String,
}
