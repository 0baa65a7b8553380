//! Cached StudyHub client that wraps [`HubClient`] with transparent caching.
//!
//! This is the one place where a write-through cache patch and its mirror
//! update happen together: every mutation lands in a single `apply_*` function
//! that patches the query cache and then rewrites the mirror from the patched
//! value, with no await point between the two.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use color_eyre::Result;
use futures::future::{join_all, try_join_all};

use crate::cache::{mirror_keys, CacheResult, MirrorStore, QueryCache};
use crate::session::{self, SessionState};

use super::api_types::{
  AnnouncementCreate, AnnouncementUpdate, AuthResponse, CourseCreate, CourseUpdate, ExamCreate,
  NoteCreate, NoteUpdate, OutgoingMessage, ProfileCompleted, ProfilePayload, TaskCreate,
};
use super::cache::HubQuery;
use super::files::FileUpload;
use super::transport::HubClient;
use super::types::{
  CategoryOption, ChatMessage, ChatRole, Conversation, Course, CourseFile, Exam, HelpAnnouncement,
  Note, NoteDocument, Profile, Task,
};

/// StudyHub client with transparent caching and a persistent mirror.
///
/// Wraps the underlying [`HubClient`] with the same operations, serving reads
/// through the query cache and patching it optimistically on writes.
#[derive(Clone)]
pub struct CachedHubClient {
  api: HubClient,
  cache: QueryCache,
  mirror: Arc<MirrorStore>,
  /// Last access token observed from an auth response; decoded for routing,
  /// never verified. The cookie jar transports the real credential.
  session_token: Arc<Mutex<Option<String>>>,
}

impl CachedHubClient {
  /// Compose a cached client from explicitly constructed parts.
  pub fn new(api: HubClient, cache: QueryCache, mirror: MirrorStore) -> Self {
    Self {
      api,
      cache,
      mirror: Arc::new(mirror),
      session_token: Arc::new(Mutex::new(None)),
    }
  }

  pub fn api(&self) -> &HubClient {
    &self.api
  }

  // ==========================================================================
  // Session
  // ==========================================================================

  fn observe_token(&self, token: &str) {
    if !token.is_empty() {
      *self.session_token.lock().expect("session lock poisoned") = Some(token.to_string());
    }
  }

  fn clear_token(&self) {
    *self.session_token.lock().expect("session lock poisoned") = None;
  }

  /// Observed session state, derived from the last token seen.
  pub fn session_state(&self) -> SessionState {
    let token = self.session_token.lock().expect("session lock poisoned");
    session::session_state(token.as_deref())
  }

  pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
    let response = self.api.login(email, password).await?;
    self.observe_token(&response.access_token);
    Ok(response)
  }

  /// Register a new account. The session only begins after the emailed
  /// verification link is followed; the caller routes to the confirmation
  /// screen via [`session::route_after_register`].
  pub async fn register(&self, email: &str, password: &str) -> Result<AuthResponse> {
    self.api.signup(email, password).await
  }

  pub async fn verify_email(&self, token: &str) -> Result<AuthResponse> {
    let response = self.api.verify_email(token).await?;
    self.observe_token(&response.access_token);
    Ok(response)
  }

  pub async fn logout(&self) -> Result<()> {
    let result = self.api.logout().await;
    // Locally the session is over either way.
    self.clear_token();
    result
  }

  // ==========================================================================
  // Courses
  // ==========================================================================

  pub async fn courses(&self) -> Result<CacheResult<Vec<Course>>> {
    let api = self.api.clone();
    let mirror = Arc::clone(&self.mirror);
    let fetched = self
      .cache
      .fetch_list(&HubQuery::Courses, move || async move {
        let courses = api.get_courses().await?;
        mirror.put(mirror_keys::COURSES, &courses);
        mirror.put(mirror_keys::COURSE_TITLES, &title_list(&courses));
        Ok(courses)
      })
      .await;

    match fetched {
      Ok(result) => Ok(result),
      Err(e) => match self.mirror.get::<Vec<Course>>(mirror_keys::COURSES) {
        Some(courses) => {
          tracing::debug!(error = %e, "serving course list from mirror");
          Ok(CacheResult::from_mirror(courses))
        }
        None => Err(e),
      },
    }
  }

  pub async fn course(&self, course_id: &str) -> Result<CacheResult<Course>> {
    let api = self.api.clone();
    let id = course_id.to_string();
    self
      .cache
      .fetch_one(&HubQuery::CourseDetail(course_id.to_string()), move || async move {
        api.get_course(&id).await
      })
      .await
  }

  pub async fn categories(&self) -> Result<CacheResult<Vec<CategoryOption>>> {
    let api = self.api.clone();
    let mirror = Arc::clone(&self.mirror);
    let fetched = self
      .cache
      .fetch_list(&HubQuery::Categories, move || async move {
        let categories = api.get_categories().await?;
        mirror.put(mirror_keys::CATEGORIES, &categories);
        Ok(categories)
      })
      .await;

    match fetched {
      Ok(result) => Ok(result),
      Err(e) => match self.mirror.get::<Vec<CategoryOption>>(mirror_keys::CATEGORIES) {
        Some(categories) => Ok(CacheResult::from_mirror(categories)),
        None => Err(e),
      },
    }
  }

  pub async fn create_course(&self, data: &CourseCreate) -> Result<Course> {
    let course = self.api.create_course(data).await?;
    self.apply_course_created(&course)?;
    Ok(course)
  }

  pub async fn update_course(&self, course_id: &str, updates: &CourseUpdate) -> Result<Course> {
    let course = self.api.update_course(course_id, updates).await?;
    self.apply_course_updated(&course)?;
    Ok(course)
  }

  pub async fn delete_course(&self, course_id: &str) -> Result<()> {
    self.api.delete_course(course_id).await?;
    self.apply_course_deleted(course_id)
  }

  fn apply_course_created(&self, course: &Course) -> Result<()> {
    self.cache.insert_head(&HubQuery::Courses, course)?;
    self.sync_courses_mirror();
    Ok(())
  }

  fn apply_course_updated(&self, course: &Course) -> Result<()> {
    self.cache.replace(&HubQuery::Courses, course)?;
    self.cache.put_one(&HubQuery::CourseDetail(course.id.clone()), course)?;
    self.sync_courses_mirror();
    Ok(())
  }

  fn apply_course_deleted(&self, course_id: &str) -> Result<()> {
    self.cache.remove_item::<Course, _>(&HubQuery::Courses, course_id)?;
    self.cache.remove_key(&HubQuery::CourseDetail(course_id.to_string()));
    // The per-course file list stays independently keyed; reading the orphaned
    // key later is a cache miss, not an error.
    self.sync_courses_mirror();
    Ok(())
  }

  fn sync_courses_mirror(&self) {
    if let Some(courses) = self.cache.get_list::<Course, _>(&HubQuery::Courses) {
      self.mirror.put(mirror_keys::COURSES, &courses);
      self.mirror.put(mirror_keys::COURSE_TITLES, &title_list(&courses));
    }
  }

  /// Course titles from the mirror, for flows (like the exam form) that need a
  /// picker before any course fetch has run on this page.
  pub fn course_titles(&self) -> Vec<String> {
    self.mirror.get(mirror_keys::COURSE_TITLES).unwrap_or_default()
  }

  // ==========================================================================
  // Files
  // ==========================================================================

  pub async fn course_files(&self, course_id: &str) -> Result<CacheResult<Vec<CourseFile>>> {
    let api = self.api.clone();
    let mirror = Arc::clone(&self.mirror);
    let id = course_id.to_string();
    let fetched = self
      .cache
      .fetch_list(&HubQuery::CourseFiles(course_id.to_string()), move || async move {
        let files = api.get_files(&id).await?;
        mirror.put(&mirror_keys::course_files(&id), &files);
        Ok(files)
      })
      .await;

    match fetched {
      Ok(result) => Ok(result),
      Err(e) => match self
        .mirror
        .get::<Vec<CourseFile>>(&mirror_keys::course_files(course_id))
      {
        Some(files) => Ok(CacheResult::from_mirror(files)),
        None => Err(e),
      },
    }
  }

  pub async fn upload_file(&self, course_id: &str, upload: FileUpload) -> Result<CourseFile> {
    let file = self.api.upload_file(course_id, upload).await?;
    self.apply_files_uploaded(course_id, std::slice::from_ref(&file))?;
    Ok(file)
  }

  /// Upload a batch of files concurrently, all-or-nothing.
  ///
  /// Zero files is a no-op: no network call, no cache mutation. On partial
  /// failure the aggregate fails and no cache patch happens; files persisted
  /// before a sibling failed are not rolled back.
  pub async fn upload_files(
    &self,
    course_id: &str,
    uploads: Vec<FileUpload>,
  ) -> Result<Vec<CourseFile>> {
    if uploads.is_empty() {
      return Ok(Vec::new());
    }

    let files = try_join_all(
      uploads
        .into_iter()
        .map(|upload| self.api.upload_file(course_id, upload)),
    )
    .await?;
    self.apply_files_uploaded(course_id, &files)?;
    Ok(files)
  }

  pub async fn delete_file(&self, course_id: &str, file_id: &str) -> Result<()> {
    self.api.delete_file(course_id, file_id).await?;
    self.apply_file_deleted(course_id, file_id)
  }

  pub async fn file_preview_url(&self, course_id: &str, file_name: &str) -> Result<String> {
    self.api.get_preview_url(course_id, file_name).await
  }

  pub async fn file_download_url(&self, course_id: &str, file_name: &str) -> Result<String> {
    self.api.get_download_url(course_id, file_name).await
  }

  fn apply_files_uploaded(&self, course_id: &str, files: &[CourseFile]) -> Result<()> {
    let key = HubQuery::CourseFiles(course_id.to_string());
    for file in files {
      self.cache.append(&key, file)?;
    }
    self.sync_files_mirror(course_id);
    Ok(())
  }

  fn apply_file_deleted(&self, course_id: &str, file_id: &str) -> Result<()> {
    let key = HubQuery::CourseFiles(course_id.to_string());
    self.cache.remove_item::<CourseFile, _>(&key, file_id)?;
    self.sync_files_mirror(course_id);
    Ok(())
  }

  fn sync_files_mirror(&self, course_id: &str) {
    let key = HubQuery::CourseFiles(course_id.to_string());
    if let Some(files) = self.cache.get_list::<CourseFile, _>(&key) {
      self.mirror.put(&mirror_keys::course_files(course_id), &files);
    }
  }

  // ==========================================================================
  // Notes
  // ==========================================================================

  pub async fn notes(&self) -> Result<CacheResult<Vec<Note>>> {
    let api = self.api.clone();
    self
      .cache
      .fetch_list(&HubQuery::Notes, move || async move { api.get_notes().await })
      .await
  }

  pub async fn course_notes(&self, course_id: &str) -> Result<CacheResult<Vec<Note>>> {
    let api = self.api.clone();
    let id = course_id.to_string();
    self
      .cache
      .fetch_list(&HubQuery::CourseNotes(course_id.to_string()), move || async move {
        api.get_notes_by_course(&id).await
      })
      .await
  }

  pub async fn create_note(&self, data: &NoteCreate) -> Result<Note> {
    let note = self.api.create_note(data).await?;
    self.apply_note_created(&note)?;
    Ok(note)
  }

  pub async fn update_note(&self, note_id: &str, updates: &NoteUpdate) -> Result<Note> {
    let note = self.api.update_note(note_id, updates).await?;
    self.apply_note_updated(&note)?;
    Ok(note)
  }

  /// Update a note and delete every embedded image the edit removed, each
  /// exactly once. Individual image deletions fail independently.
  pub async fn update_note_with_image_cleanup(
    &self,
    note_id: &str,
    updates: &NoteUpdate,
    previous_content: &NoteDocument,
  ) -> Result<Note> {
    let note = self.update_note(note_id, updates).await?;

    let removed = removed_image_urls(previous_content, &note.content);
    join_all(removed.iter().map(|url| {
      let api = self.api.clone();
      async move {
        if let Err(e) = api.delete_note_image(url).await {
          tracing::warn!(url, error = %e, "failed to delete removed note image");
        }
      }
    }))
    .await;

    Ok(note)
  }

  pub async fn delete_note(&self, note_id: &str) -> Result<()> {
    self.api.delete_note(note_id).await?;
    self.apply_note_deleted(note_id)
  }

  pub async fn upload_note_image(&self, note_id: &str, upload: FileUpload) -> Result<String> {
    self.api.upload_note_image(note_id, upload).await
  }

  fn apply_note_created(&self, note: &Note) -> Result<()> {
    self.cache.insert_head(&HubQuery::Notes, note)?;
    if let Some(course_id) = &note.course_id {
      self.cache.insert_head(&HubQuery::CourseNotes(course_id.clone()), note)?;
    }
    Ok(())
  }

  fn apply_note_updated(&self, note: &Note) -> Result<()> {
    self.cache.replace(&HubQuery::Notes, note)?;
    if let Some(course_id) = &note.course_id {
      self.cache.replace(&HubQuery::CourseNotes(course_id.clone()), note)?;
    }
    Ok(())
  }

  fn apply_note_deleted(&self, note_id: &str) -> Result<()> {
    // Learn the course link from the cached copy before dropping it.
    let course_id = self
      .cache
      .get_list::<Note, _>(&HubQuery::Notes)
      .and_then(|notes| {
        notes
          .iter()
          .find(|note| note.id == note_id)
          .and_then(|note| note.course_id.clone())
      });

    self.cache.remove_item::<Note, _>(&HubQuery::Notes, note_id)?;
    if let Some(course_id) = course_id {
      self.cache.remove_item::<Note, _>(&HubQuery::CourseNotes(course_id), note_id)?;
    }
    Ok(())
  }

  // ==========================================================================
  // Planning
  // ==========================================================================

  pub async fn exams(&self) -> Result<CacheResult<Vec<Exam>>> {
    let api = self.api.clone();
    self
      .cache
      .fetch_list(&HubQuery::Exams, move || async move { api.get_exams().await })
      .await
  }

  pub async fn add_exam(&self, exam: &ExamCreate) -> Result<Exam> {
    let created = self.api.add_exam(exam).await?;
    self.apply_exam_added(&created)?;
    Ok(created)
  }

  /// Submit a batch of exams in list order. Each success is appended to the
  /// cache as it lands, so the cache preserves submission order.
  pub async fn add_exams(&self, exams: &[ExamCreate]) -> Result<Vec<Exam>> {
    let mut created = Vec::with_capacity(exams.len());
    for exam in exams {
      created.push(self.add_exam(exam).await?);
    }
    Ok(created)
  }

  pub async fn delete_exam(&self, exam_id: &str) -> Result<()> {
    self.api.delete_exam(exam_id).await?;
    self.apply_exam_deleted(exam_id)
  }

  /// Generated study plan PDF bytes.
  pub async fn generate_plan(&self) -> Result<Vec<u8>> {
    self.api.generate_plan().await
  }

  fn apply_exam_added(&self, exam: &Exam) -> Result<()> {
    self.cache.append(&HubQuery::Exams, exam)
  }

  fn apply_exam_deleted(&self, exam_id: &str) -> Result<()> {
    self.cache.remove_item::<Exam, _>(&HubQuery::Exams, exam_id)
  }

  // ==========================================================================
  // Tasks
  // ==========================================================================

  pub async fn tasks(&self) -> Result<CacheResult<Vec<Task>>> {
    let api = self.api.clone();
    self
      .cache
      .fetch_list(&HubQuery::Tasks, move || async move { api.get_tasks().await })
      .await
  }

  pub async fn create_task(&self, data: &TaskCreate) -> Result<Task> {
    let task = self.api.create_task(data).await?;
    self.cache.append(&HubQuery::Tasks, &task)?;
    Ok(task)
  }

  pub async fn update_task(&self, task_id: &str, data: &TaskCreate) -> Result<Task> {
    let task = self.api.update_task(task_id, data).await?;
    self.cache.replace(&HubQuery::Tasks, &task)?;
    Ok(task)
  }

  pub async fn delete_task(&self, task_id: &str) -> Result<()> {
    self.api.delete_task(task_id).await?;
    self.cache.remove_item::<Task, _>(&HubQuery::Tasks, task_id)
  }

  // ==========================================================================
  // Help announcements
  // ==========================================================================

  pub async fn open_announcements(&self) -> Result<CacheResult<Vec<HelpAnnouncement>>> {
    let api = self.api.clone();
    self
      .cache
      .fetch_list(&HubQuery::OpenAnnouncements, move || async move {
        api.get_open_announcements().await
      })
      .await
  }

  pub async fn my_announcements(&self) -> Result<CacheResult<Vec<HelpAnnouncement>>> {
    let api = self.api.clone();
    self
      .cache
      .fetch_list(&HubQuery::MyAnnouncements, move || async move {
        api.get_my_announcements().await
      })
      .await
  }

  pub async fn create_announcement(&self, data: &AnnouncementCreate) -> Result<HelpAnnouncement> {
    let announcement = self.api.create_announcement(data).await?;
    self.cache.insert_head(&HubQuery::MyAnnouncements, &announcement)?;
    Ok(announcement)
  }

  pub async fn update_announcement(
    &self,
    announcement_id: &str,
    data: &AnnouncementUpdate,
  ) -> Result<HelpAnnouncement> {
    let announcement = self.api.update_announcement(announcement_id, data).await?;
    self.apply_announcement_changed(&announcement)?;
    Ok(announcement)
  }

  /// Flip an announcement between open and closed. The server returns the
  /// record with its new status; toggling twice restores the original.
  pub async fn toggle_announcement_status(&self, announcement_id: &str) -> Result<HelpAnnouncement> {
    let announcement = self.api.toggle_announcement_status(announcement_id).await?;
    self.apply_announcement_changed(&announcement)?;
    Ok(announcement)
  }

  pub async fn delete_announcement(&self, announcement_id: &str) -> Result<()> {
    self.api.delete_announcement(announcement_id).await?;
    self
      .cache
      .remove_item::<HelpAnnouncement, _>(&HubQuery::MyAnnouncements, announcement_id)?;
    self
      .cache
      .remove_item::<HelpAnnouncement, _>(&HubQuery::OpenAnnouncements, announcement_id)
  }

  fn apply_announcement_changed(&self, announcement: &HelpAnnouncement) -> Result<()> {
    self.cache.replace(&HubQuery::MyAnnouncements, announcement)?;
    self.cache.replace(&HubQuery::OpenAnnouncements, announcement)
  }

  // ==========================================================================
  // Profile
  // ==========================================================================

  /// Profile reads are not cached: the record is small, rarely read outside
  /// its own page, and staleness there confuses security settings.
  pub async fn profile(&self) -> Result<Option<Profile>> {
    self.api.get_profile().await
  }

  pub async fn complete_profile(&self, payload: &ProfilePayload) -> Result<ProfileCompleted> {
    let completed = self.api.complete_profile(payload).await?;
    if let Some(token) = &completed.new_access_token {
      self.observe_token(token);
    }
    Ok(completed)
  }

  pub async fn update_profile(&self, payload: &ProfilePayload) -> Result<()> {
    self.api.update_profile(payload).await
  }

  pub async fn upload_profile_image(&self, upload: FileUpload) -> Result<String> {
    self.api.upload_profile_image(upload).await
  }

  pub async fn delete_profile(&self) -> Result<()> {
    self.api.delete_profile().await?;
    self.clear_token();
    Ok(())
  }

  // ==========================================================================
  // AI chat
  // ==========================================================================

  pub async fn conversations(&self) -> Result<CacheResult<Vec<Conversation>>> {
    let api = self.api.clone();
    self
      .cache
      .fetch_list(&HubQuery::Conversations, move || async move {
        api.get_conversations().await
      })
      .await
  }

  pub async fn conversation_messages(
    &self,
    conversation_id: &str,
  ) -> Result<CacheResult<Vec<ChatMessage>>> {
    let api = self.api.clone();
    let id = conversation_id.to_string();
    self
      .cache
      .fetch_list(
        &HubQuery::ConversationMessages(conversation_id.to_string()),
        move || async move { api.get_messages(&id).await },
      )
      .await
  }

  /// One full chat turn: persist the user message, get the assistant reply,
  /// persist it too. Starts a conversation when none is given; returns the
  /// conversation id and the reply.
  pub async fn chat_turn(
    &self,
    conversation_id: Option<String>,
    history: &[OutgoingMessage],
    content: &str,
  ) -> Result<(String, String)> {
    let conversation_id = match conversation_id {
      Some(id) => id,
      None => self.api.start_conversation(content).await?,
    };

    self.api.save_message(&conversation_id, ChatRole::User, content).await?;

    let mut messages: Vec<OutgoingMessage> = history
      .iter()
      .map(|m| OutgoingMessage {
        role: m.role,
        content: m.content.clone(),
      })
      .collect();
    messages.push(OutgoingMessage {
      role: ChatRole::User,
      content: content.to_string(),
    });

    let reply = self.api.send_chat(&messages).await?;
    self
      .api
      .save_message(&conversation_id, ChatRole::Assistant, &reply)
      .await?;

    // The stored transcript changed under this key; drop it so the next read
    // refetches instead of serving the pre-turn copy.
    self
      .cache
      .remove_key(&HubQuery::ConversationMessages(conversation_id.clone()));

    Ok((conversation_id, reply))
  }

  // ==========================================================================
  // Pins and recents (mirror-only derived sets)
  // ==========================================================================

  pub fn toggle_course_pin(&self, course_id: &str) -> Vec<String> {
    self.mirror.toggle_pin(mirror_keys::PINNED_COURSES, course_id)
  }

  pub fn pinned_courses(&self) -> Vec<String> {
    self.mirror.get(mirror_keys::PINNED_COURSES).unwrap_or_default()
  }

  pub fn toggle_file_pin(&self, course_id: &str, file_id: &str) -> Vec<String> {
    self.mirror.toggle_pin(&mirror_keys::pinned_files(course_id), file_id)
  }

  pub fn pinned_files(&self, course_id: &str) -> Vec<String> {
    self.mirror.get(&mirror_keys::pinned_files(course_id)).unwrap_or_default()
  }

  pub fn toggle_note_pin(&self, note_id: &str) -> Vec<String> {
    self.mirror.toggle_pin(mirror_keys::PINNED_NOTES, note_id)
  }

  pub fn pinned_notes(&self) -> Vec<String> {
    self.mirror.get(mirror_keys::PINNED_NOTES).unwrap_or_default()
  }

  pub fn record_course_opened(&self, course_id: &str) -> Vec<String> {
    self
      .mirror
      .record_recent(mirror_keys::RECENT_COURSES, course_id, mirror_keys::RECENT_COURSES_CAP)
  }

  pub fn recent_courses(&self) -> Vec<String> {
    self.mirror.get(mirror_keys::RECENT_COURSES).unwrap_or_default()
  }

  pub(crate) fn cache(&self) -> &QueryCache {
    &self.cache
  }

  pub(crate) fn mirror(&self) -> &MirrorStore {
    &self.mirror
  }
}

fn title_list(courses: &[Course]) -> Vec<String> {
  courses.iter().map(|course| course.title.clone()).collect()
}

/// Image URLs present in `previous` but gone from `current`, deduplicated so
/// each is deleted exactly once.
fn removed_image_urls(previous: &NoteDocument, current: &NoteDocument) -> Vec<String> {
  let kept: BTreeSet<String> = current.image_urls().into_iter().collect();
  let mut seen = BTreeSet::new();
  previous
    .image_urls()
    .into_iter()
    .filter(|url| !kept.contains(url) && seen.insert(url.clone()))
    .collect()
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::cache::Cacheable;
  use crate::hub::types::{AnnouncementStatus, ContactMethod};

  fn test_client() -> CachedHubClient {
    let api = HubClient::new("http://localhost:8000").unwrap();
    CachedHubClient::new(api, QueryCache::new(), MirrorStore::open_in_memory().unwrap())
  }

  fn course(id: &str, title: &str) -> Course {
    Course {
      id: id.to_string(),
      title: title.to_string(),
      description: String::new(),
      category: Some("Mathématiques".to_string()),
      user_id: "u-1".to_string(),
      created_at: "2025-05-01T10:00:00Z".to_string(),
      updated_at: "2025-05-01T10:00:00Z".to_string(),
    }
  }

  fn file(id: &str, course_id: &str, name: &str) -> CourseFile {
    CourseFile {
      id: id.to_string(),
      course_id: course_id.to_string(),
      file_name: name.to_string(),
      file_path: format!("{}/{}", course_id, name),
      file_type: "application/pdf".to_string(),
      file_size: 1024,
      created_at: "2025-05-01T10:00:00Z".to_string(),
    }
  }

  fn exam(id: &str, title: &str) -> Exam {
    Exam {
      id: id.to_string(),
      title: title.to_string(),
      exam_date: "2025-06-12T09:00:00Z".to_string(),
      priority: 1,
      created_at: "2025-05-01T10:00:00Z".to_string(),
    }
  }

  fn announcement(id: &str, status: AnnouncementStatus) -> HelpAnnouncement {
    HelpAnnouncement {
      id: id.to_string(),
      title: "Need a study partner".to_string(),
      category: "Mathématiques".to_string(),
      contact_method: ContactMethod::Email,
      contact_value: "a@x.com".to_string(),
      status,
      user_id: "u-1".to_string(),
      full_name: None,
      image_url: None,
      created_at: "2025-05-01T10:00:00Z".to_string(),
    }
  }

  #[test]
  fn test_created_course_lands_in_cache_and_title_mirror() {
    let client = test_client();
    client.cache().put_list(&HubQuery::Courses, &[course("c1", "Physics")]).unwrap();

    client.apply_course_created(&course("c2", "Algebra")).unwrap();

    let cached: Vec<Course> = client.cache().get_list(&HubQuery::Courses).unwrap();
    assert_eq!(cached.len(), 2);
    assert_eq!(cached[0].title, "Algebra");

    let titles: Vec<String> = client.mirror().get(mirror_keys::COURSE_TITLES).unwrap();
    assert!(titles.contains(&"Algebra".to_string()));
  }

  #[test]
  fn test_deleted_course_gone_from_cache_and_mirror() {
    let client = test_client();
    client
      .cache()
      .put_list(&HubQuery::Courses, &[course("c1", "Physics"), course("c2", "Algebra")])
      .unwrap();
    client.sync_courses_mirror();

    client.apply_course_deleted("c1").unwrap();

    let cached: Vec<Course> = client.cache().get_list(&HubQuery::Courses).unwrap();
    assert!(cached.iter().all(|c| c.id != "c1"));

    let mirrored: Vec<Course> = client.mirror().get(mirror_keys::COURSES).unwrap();
    assert!(mirrored.iter().all(|c| c.id != "c1"));
    let titles: Vec<String> = client.mirror().get(mirror_keys::COURSE_TITLES).unwrap();
    assert_eq!(titles, vec!["Algebra"]);
  }

  #[test]
  fn test_deleting_course_leaves_file_list_key_readable() {
    let client = test_client();
    client.cache().put_list(&HubQuery::Courses, &[course("c1", "Physics")]).unwrap();
    client
      .cache()
      .put_list(
        &HubQuery::CourseFiles("c1".to_string()),
        &[file("f1", "c1", "a.pdf"), file("f2", "c1", "b.pdf"), file("f3", "c1", "c.pdf")],
      )
      .unwrap();

    client.apply_course_deleted("c1").unwrap();

    // The orphaned file-list key is independently keyed and still readable.
    let orphaned: Vec<CourseFile> = client
      .cache()
      .get_list(&HubQuery::CourseFiles("c1".to_string()))
      .unwrap();
    assert_eq!(orphaned.len(), 3);
  }

  #[test]
  fn test_uploaded_files_append_to_cache_and_mirror() {
    let client = test_client();
    client
      .cache()
      .put_list(&HubQuery::CourseFiles("c1".to_string()), &[file("f1", "c1", "a.pdf")])
      .unwrap();

    client
      .apply_files_uploaded("c1", &[file("f2", "c1", "b.pdf"), file("f3", "c1", "c.pdf")])
      .unwrap();

    let cached: Vec<CourseFile> = client
      .cache()
      .get_list(&HubQuery::CourseFiles("c1".to_string()))
      .unwrap();
    assert_eq!(
      cached.iter().map(|f| f.id.as_str()).collect::<Vec<_>>(),
      vec!["f1", "f2", "f3"]
    );

    let mirrored: Vec<CourseFile> = client.mirror().get(&mirror_keys::course_files("c1")).unwrap();
    assert_eq!(mirrored.len(), 3);
  }

  #[test]
  fn test_deleted_file_gone_from_cache_and_mirror() {
    let client = test_client();
    client
      .cache()
      .put_list(
        &HubQuery::CourseFiles("c1".to_string()),
        &[file("f1", "c1", "a.pdf"), file("f2", "c1", "b.pdf")],
      )
      .unwrap();
    client.sync_files_mirror("c1");

    client.apply_file_deleted("c1", "f1").unwrap();

    let cached: Vec<CourseFile> = client
      .cache()
      .get_list(&HubQuery::CourseFiles("c1".to_string()))
      .unwrap();
    assert!(cached.iter().all(|f| f.id != "f1"));
    let mirrored: Vec<CourseFile> = client.mirror().get(&mirror_keys::course_files("c1")).unwrap();
    assert!(mirrored.iter().all(|f| f.id != "f1"));
  }

  #[tokio::test]
  async fn test_zero_file_upload_is_a_noop() {
    let client = test_client();

    let uploaded = client.upload_files("c1", Vec::new()).await.unwrap();

    assert!(uploaded.is_empty());
    assert!(client
      .cache()
      .get_list::<CourseFile, _>(&HubQuery::CourseFiles("c1".to_string()))
      .is_none());
  }

  #[test]
  fn test_exam_batch_order_preserved() {
    let client = test_client();

    client.apply_exam_added(&exam("e1", "Analysis")).unwrap();
    client.apply_exam_added(&exam("e2", "Thermodynamics")).unwrap();

    let cached: Vec<Exam> = client.cache().get_list(&HubQuery::Exams).unwrap();
    assert_eq!(cached.len(), 2);
    assert_eq!(cached[0].id, "e1");
    assert_eq!(cached[1].id, "e2");
    assert_ne!(cached[0].cache_key(), cached[1].cache_key());
  }

  #[test]
  fn test_announcement_toggle_twice_restores_status() {
    let client = test_client();
    let original = announcement("a1", AnnouncementStatus::Open);
    client.cache().put_list(&HubQuery::MyAnnouncements, &[original.clone()]).unwrap();

    client
      .apply_announcement_changed(&announcement("a1", AnnouncementStatus::Closed))
      .unwrap();
    client
      .apply_announcement_changed(&announcement("a1", AnnouncementStatus::Open))
      .unwrap();

    let cached: Vec<HelpAnnouncement> =
      client.cache().get_list(&HubQuery::MyAnnouncements).unwrap();
    assert_eq!(cached[0].status, original.status);
  }

  #[test]
  fn test_removed_image_urls_deduplicated() {
    let previous: NoteDocument = serde_json::from_value(json!({
      "type": "doc",
      "content": [
        { "type": "image", "attrs": { "src": "https://files.example/a.png" } },
        { "type": "image", "attrs": { "src": "https://files.example/a.png" } },
        { "type": "image", "attrs": { "src": "https://files.example/b.png" } }
      ]
    }))
    .unwrap();
    let current: NoteDocument = serde_json::from_value(json!({
      "type": "doc",
      "content": [
        { "type": "image", "attrs": { "src": "https://files.example/b.png" } }
      ]
    }))
    .unwrap();

    // a.png appears twice in the old document but is deleted exactly once;
    // b.png survives the edit and is not deleted.
    assert_eq!(removed_image_urls(&previous, &current), vec!["https://files.example/a.png"]);
  }

  #[test]
  fn test_note_patches_follow_course_link() {
    let client = test_client();
    let note = Note {
      id: "n1".to_string(),
      user_id: "u-1".to_string(),
      title: "Chapter 3".to_string(),
      content: NoteDocument::empty(),
      course_id: Some("c1".to_string()),
      created_at: "2025-05-01T10:00:00Z".to_string(),
      updated_at: "2025-05-01T10:00:00Z".to_string(),
    };

    client.apply_note_created(&note).unwrap();
    let by_course: Vec<Note> = client
      .cache()
      .get_list(&HubQuery::CourseNotes("c1".to_string()))
      .unwrap();
    assert_eq!(by_course.len(), 1);

    client.apply_note_deleted("n1").unwrap();
    let all: Vec<Note> = client.cache().get_list(&HubQuery::Notes).unwrap();
    assert!(all.is_empty());
    let by_course: Vec<Note> = client
      .cache()
      .get_list(&HubQuery::CourseNotes("c1".to_string()))
      .unwrap();
    assert!(by_course.is_empty());
  }

  #[test]
  fn test_pins_and_recents() {
    let client = test_client();

    client.toggle_course_pin("c1");
    client.toggle_file_pin("c1", "f1");
    client.toggle_note_pin("n1");
    assert_eq!(client.pinned_courses(), vec!["c1"]);
    assert_eq!(client.pinned_files("c1"), vec!["f1"]);
    assert!(client.pinned_files("c2").is_empty());
    assert_eq!(client.pinned_notes(), vec!["n1"]);

    for id in ["a", "b", "c", "d", "e", "f"] {
      client.record_course_opened(id);
    }
    assert_eq!(client.recent_courses().len(), 5);
    assert_eq!(client.recent_courses()[0], "f");
  }
}
