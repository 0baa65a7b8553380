//! CLI subcommands: the view layer over the cached client.
//!
//! Required-field validation and user-visible rendering live here; the
//! accessors and cache below return wrapped errors and decide nothing about
//! presentation.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;

use studyhub::config::Config;
use studyhub::hub::api_types::{
  AnnouncementCreate, CourseCreate, CourseUpdate, ExamCreate, NoteCreate, NoteUpdate,
  OutgoingMessage, ProfilePayload, TaskCreate,
};
use studyhub::hub::types::{
  AcademicLevel, ContactMethod, Note, NoteDocument, Specialization, Task,
};
use studyhub::hub::{CachedHubClient, FileUpload};
use studyhub::session::{self, Route, SessionState};

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Log in (password from STUDYHUB_PASSWORD)
  Login { email: String },
  /// Register a new account (password from STUDYHUB_PASSWORD)
  Register { email: String },
  /// Complete email verification with the token from the mail
  Verify { token: String },
  /// End the session
  Logout,
  /// Refresh the session cookies
  Refresh,
  /// Show the observed session state
  Whoami,
  /// Everything at a glance
  Dashboard,
  /// Courses
  #[command(subcommand)]
  Courses(CourseCommand),
  /// Files within a course
  #[command(subcommand)]
  Files(FileCommand),
  /// Notes
  #[command(subcommand)]
  Notes(NoteCommand),
  /// Exam planning
  #[command(subcommand)]
  Exams(ExamCommand),
  /// Tasks
  #[command(subcommand)]
  Tasks(TaskCommand),
  /// Peer help board
  #[command(subcommand)]
  Board(BoardCommand),
  /// Profile and account security
  #[command(subcommand)]
  Profile(ProfileCommand),
  /// Chat with the AI assistant
  Chat {
    message: String,
    /// Continue an existing conversation
    #[arg(long)]
    conversation: Option<String>,
  },
}

#[derive(Subcommand, Debug)]
pub enum CourseCommand {
  /// List courses (pinned ones marked)
  List,
  /// Available category options
  Categories,
  Add {
    title: String,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    category: Option<String>,
  },
  Edit {
    id: String,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    category: Option<String>,
  },
  Rm { id: String },
  /// Pin or unpin a course
  Pin { id: String },
  /// Open a course: files, notes, and a recents entry
  Open { id: String },
}

#[derive(Subcommand, Debug)]
pub enum FileCommand {
  Ls { course_id: String },
  /// Upload one or more files
  Upload {
    course_id: String,
    paths: Vec<PathBuf>,
  },
  Rm { course_id: String, file_id: String },
  /// Print a signed preview URL
  Preview { course_id: String, file_name: String },
  /// Print a signed download URL
  Download { course_id: String, file_name: String },
  /// Download a file's content to disk
  Fetch {
    course_id: String,
    file_name: String,
    #[arg(long)]
    out: Option<PathBuf>,
  },
  /// Pin or unpin a file within its course
  Pin { course_id: String, file_id: String },
}

#[derive(Subcommand, Debug)]
pub enum NoteCommand {
  Ls {
    #[arg(long)]
    course: Option<String>,
  },
  Add {
    title: String,
    /// Plain-text body, stored as a single-paragraph document
    #[arg(long, default_value = "")]
    text: String,
    #[arg(long)]
    course: Option<String>,
  },
  /// Print a note's title and text content
  Show { id: String },
  /// Retitle a note
  Rename { id: String, title: String },
  /// Attach an image to a note
  Image { id: String, path: PathBuf },
  Rm { id: String },
  /// Pin or unpin a note
  Pin { id: String },
}

#[derive(Subcommand, Debug)]
pub enum ExamCommand {
  Ls,
  Add {
    title: String,
    /// ISO date-time, e.g. 2025-06-12T09:00:00Z
    date: String,
    /// 1 = highest .. 5 = lowest
    #[arg(long, default_value_t = 3)]
    priority: u8,
  },
  /// Submit a batch of exams from a YAML file, in file order
  Import { path: PathBuf },
  Rm { id: String },
  /// Generate the weekly study plan PDF
  Plan {
    #[arg(long, default_value = "study_plan.pdf")]
    out: PathBuf,
  },
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
  Ls,
  Add {
    title: String,
    #[arg(long, default_value = "study")]
    category: String,
    #[arg(long)]
    description: Option<String>,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    due: Option<String>,
  },
  /// Mark a task completed
  Done { id: String },
  Rm { id: String },
}

#[derive(Subcommand, Debug)]
pub enum BoardCommand {
  /// Open announcements from other students
  Ls,
  /// Your own announcements
  Mine,
  Add {
    title: String,
    #[arg(long)]
    category: String,
    /// "email" or "phone"
    #[arg(long, default_value = "email")]
    contact_method: String,
    #[arg(long)]
    contact: Option<String>,
  },
  /// Flip an announcement between open and closed
  Toggle { id: String },
  Rm { id: String },
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
  Show,
  Complete {
    full_name: String,
    /// Academic level: CP1, CP2, GI1, GI2, GI3
    level: String,
    #[arg(long)]
    specialization: Option<String>,
    #[arg(long)]
    anonymous: bool,
  },
  /// Upload a profile image
  Image { path: PathBuf },
  /// Change the account password (current from STUDYHUB_PASSWORD)
  ChangePassword { new_password: String },
  /// Request an email change (password from STUDYHUB_PASSWORD)
  ChangeEmail { new_email: String },
  /// Delete the profile
  Delete,
}

pub async fn run(command: Command, client: &CachedHubClient) -> Result<()> {
  match command {
    Command::Login { email } => {
      let password = Config::get_password()?;
      let response = client.login(&email, &password).await?;
      println!("Logged in as {}", response.email);
      if let Route::CompleteProfile = session::landing_route(&client.session_state()) {
        println!("Profile incomplete - run `studyhub profile complete` first.");
      }
    }
    Command::Register { email } => {
      let password = Config::get_password()?;
      client.register(&email, &password).await?;
      match session::route_after_register(&email) {
        Route::ConfirmEmail { email } => {
          println!("Confirmation email sent to {}. Follow the link, then run `studyhub verify <token>`.", email);
        }
        _ => unreachable!("registration always routes to confirmation"),
      }
    }
    Command::Verify { token } => {
      let response = client.verify_email(&token).await?;
      println!("Email verified for {}", response.email);
    }
    Command::Logout => {
      client.logout().await?;
      println!("Logged out.");
    }
    Command::Refresh => {
      let refreshed = client.api().refresh_session().await?;
      println!("Session refreshed (expires in {}s).", refreshed.expires_in);
    }
    Command::Whoami => match client.session_state() {
      SessionState::Anonymous => println!("Not logged in."),
      SessionState::ProfileIncomplete(claims) => {
        println!("{} (profile incomplete)", claims.email);
      }
      SessionState::Active(claims) => println!("{}", claims.email),
    },
    Command::Dashboard => {
      let dashboard = client.dashboard().await?;
      let stats = &dashboard.stats;
      println!(
        "{} courses, {} files, {} notes",
        stats.total_courses, stats.total_files, stats.total_notes
      );
      match &stats.upcoming_exam {
        Some(exam) => println!("Next exam: {} on {}", exam.title, exam.exam_date),
        None => println!("No exams planned."),
      }
      println!(
        "{} tasks due today, {} overdue",
        stats.tasks_due_today.len(),
        stats.overdue_tasks.len()
      );
      for announcement in dashboard.data.announcements.iter().take(3) {
        println!("board: {} [{}]", announcement.title, announcement.category);
      }
    }
    Command::Courses(command) => run_courses(command, client).await?,
    Command::Files(command) => run_files(command, client).await?,
    Command::Notes(command) => run_notes(command, client).await?,
    Command::Exams(command) => run_exams(command, client).await?,
    Command::Tasks(command) => run_tasks(command, client).await?,
    Command::Board(command) => run_board(command, client).await?,
    Command::Profile(command) => run_profile(command, client).await?,
    Command::Chat { message, conversation } => {
      if message.trim().is_empty() {
        return Err(eyre!("Message must not be empty"));
      }
      let history: Vec<OutgoingMessage> = match &conversation {
        Some(id) => client
          .conversation_messages(id)
          .await?
          .data
          .into_iter()
          .map(|m| OutgoingMessage {
            role: m.role,
            content: m.content,
          })
          .collect(),
        None => Vec::new(),
      };
      let (conversation_id, reply) = client.chat_turn(conversation, &history, &message).await?;
      println!("{}", reply);
      println!("(conversation {})", conversation_id);
    }
  }

  Ok(())
}

async fn run_courses(command: CourseCommand, client: &CachedHubClient) -> Result<()> {
  match command {
    CourseCommand::List => {
      let courses = client.courses().await?;
      let pinned = client.pinned_courses();
      for course in &courses.data {
        let pin = if pinned.contains(&course.id) { "*" } else { " " };
        println!(
          "{} {}  {}  [{}]",
          pin,
          course.id,
          course.title,
          course.category.as_deref().unwrap_or("-")
        );
      }
    }
    CourseCommand::Categories => {
      for option in &client.categories().await?.data {
        println!("{}", option.label);
      }
    }
    CourseCommand::Add { title, description, category } => {
      if title.trim().is_empty() {
        return Err(eyre!("Course title must not be empty"));
      }
      let course = client
        .create_course(&CourseCreate { title, description, category })
        .await?;
      println!("Created course {} ({})", course.title, course.id);
    }
    CourseCommand::Edit { id, title, description, category } => {
      let course = client
        .update_course(&id, &CourseUpdate { title, description, category })
        .await?;
      println!("Updated course {}", course.id);
    }
    CourseCommand::Rm { id } => {
      client.delete_course(&id).await?;
      println!("Deleted course {}", id);
    }
    CourseCommand::Pin { id } => {
      let pinned = client.toggle_course_pin(&id);
      println!("Pinned courses: {}", pinned.join(", "));
    }
    CourseCommand::Open { id } => {
      client.record_course_opened(&id);
      let course = client.course(&id).await?;
      println!("{}: {}", course.data.title, course.data.description);
      for file in &client.course_files(&id).await?.data {
        println!("file: {}  {}", file.id, file.file_name);
      }
      for note in &client.course_notes(&id).await?.data {
        println!("note: {}  {}", note.id, note.title);
      }
    }
  }
  Ok(())
}

async fn run_files(command: FileCommand, client: &CachedHubClient) -> Result<()> {
  match command {
    FileCommand::Ls { course_id } => {
      let files = client.course_files(&course_id).await?;
      let pinned = client.pinned_files(&course_id);
      for file in &files.data {
        let pin = if pinned.contains(&file.id) { "*" } else { " " };
        println!("{} {}  {}  {} bytes", pin, file.id, file.file_name, file.file_size);
      }
    }
    FileCommand::Upload { course_id, paths } => {
      let uploads = paths
        .iter()
        .map(|path| read_upload(path))
        .collect::<Result<Vec<_>>>()?;
      if uploads.is_empty() {
        println!("Nothing to upload.");
        return Ok(());
      }
      let files = client.upload_files(&course_id, uploads).await?;
      println!("Uploaded {} file(s).", files.len());
    }
    FileCommand::Rm { course_id, file_id } => {
      client.delete_file(&course_id, &file_id).await?;
      println!("Deleted file {}", file_id);
    }
    FileCommand::Preview { course_id, file_name } => {
      println!("{}", client.file_preview_url(&course_id, &file_name).await?);
    }
    FileCommand::Download { course_id, file_name } => {
      println!("{}", client.file_download_url(&course_id, &file_name).await?);
    }
    FileCommand::Fetch { course_id, file_name, out } => {
      let bytes = client.api().preview_file(&course_id, &file_name).await?;
      let out = out.unwrap_or_else(|| PathBuf::from(&file_name));
      std::fs::write(&out, &bytes).map_err(|e| eyre!("Failed to write {}: {}", out.display(), e))?;
      println!("Wrote {} ({} bytes)", out.display(), bytes.len());
    }
    FileCommand::Pin { course_id, file_id } => {
      let pinned = client.toggle_file_pin(&course_id, &file_id);
      println!("Pinned files: {}", pinned.join(", "));
    }
  }
  Ok(())
}

async fn run_notes(command: NoteCommand, client: &CachedHubClient) -> Result<()> {
  match command {
    NoteCommand::Ls { course } => {
      let notes = match course {
        Some(course_id) => client.course_notes(&course_id).await?.data,
        None => client.notes().await?.data,
      };
      let pinned = client.pinned_notes();
      for note in &notes {
        let pin = if pinned.contains(&note.id) { "*" } else { " " };
        println!("{} {}  {}", pin, note.id, note.title);
      }
    }
    NoteCommand::Add { title, text, course } => {
      if title.trim().is_empty() {
        return Err(eyre!("Note title must not be empty"));
      }
      let note = client
        .create_note(&NoteCreate {
          title,
          content: text_document(&text),
          course_id: course,
        })
        .await?;
      println!("Created note {} ({})", note.title, note.id);
    }
    NoteCommand::Show { id } => {
      let note = client.api().get_note(&id).await?;
      println!("{}", note.title);
      for line in note_text(&note.content) {
        println!("{}", line);
      }
      let images = note.content.image_urls();
      if !images.is_empty() {
        println!("images: {}", images.join(", "));
      }
    }
    NoteCommand::Rename { id, title } => {
      let current = current_note(client, &id).await;
      let note = client
        .update_note_with_image_cleanup(
          &id,
          &NoteUpdate {
            title: Some(title),
            content: current.as_ref().map(|n| n.content.clone()),
            course_id: current.as_ref().and_then(|n| n.course_id.clone()),
          },
          &current.map(|n| n.content).unwrap_or_default(),
        )
        .await?;
      println!("Renamed note {}", note.id);
    }
    NoteCommand::Image { id, path } => {
      let upload = read_upload(&path)?;
      let stored_path = client.upload_note_image(&id, upload).await?;
      println!("{}", stored_path);
    }
    NoteCommand::Rm { id } => {
      client.delete_note(&id).await?;
      println!("Deleted note {}", id);
    }
    NoteCommand::Pin { id } => {
      let pinned = client.toggle_note_pin(&id);
      println!("Pinned notes: {}", pinned.join(", "));
    }
  }
  Ok(())
}

/// Best-effort lookup of a note's current state from the cached list.
async fn current_note(client: &CachedHubClient, note_id: &str) -> Option<Note> {
  client
    .notes()
    .await
    .ok()
    .and_then(|notes| notes.data.into_iter().find(|note| note.id == note_id))
}

#[derive(Debug, Deserialize)]
struct ExamSpec {
  title: String,
  exam_date: String,
  #[serde(default = "default_priority")]
  priority: u8,
}

fn default_priority() -> u8 {
  3
}

async fn run_exams(command: ExamCommand, client: &CachedHubClient) -> Result<()> {
  match command {
    ExamCommand::Ls => {
      // The course picker in the exam form reads mirrored titles so this page
      // works before any course fetch has run.
      let titles = client.course_titles();
      if !titles.is_empty() {
        println!("Courses: {}", titles.join(", "));
      }
      for exam in &client.exams().await?.data {
        println!("{}  {}  {} (priority {})", exam.id, exam.title, exam.exam_date, exam.priority);
      }
    }
    ExamCommand::Add { title, date, priority } => {
      if !(1..=5).contains(&priority) {
        return Err(eyre!("Priority must be between 1 (highest) and 5 (lowest)"));
      }
      let exam = client
        .add_exam(&ExamCreate {
          title,
          exam_date: date,
          priority,
        })
        .await?;
      println!("Planned exam {} ({})", exam.title, exam.id);
    }
    ExamCommand::Import { path } => {
      let contents = std::fs::read_to_string(&path)
        .map_err(|e| eyre!("Failed to read {}: {}", path.display(), e))?;
      let specs: Vec<ExamSpec> = serde_yaml::from_str(&contents)
        .map_err(|e| eyre!("Failed to parse {}: {}", path.display(), e))?;
      let batch: Vec<ExamCreate> = specs
        .into_iter()
        .map(|spec| ExamCreate {
          title: spec.title,
          exam_date: spec.exam_date,
          priority: spec.priority,
        })
        .collect();
      let created = client.add_exams(&batch).await?;
      println!("Planned {} exam(s).", created.len());
    }
    ExamCommand::Rm { id } => {
      client.delete_exam(&id).await?;
      println!("Deleted exam {}", id);
    }
    ExamCommand::Plan { out } => {
      let pdf = client.generate_plan().await?;
      std::fs::write(&out, &pdf).map_err(|e| eyre!("Failed to write {}: {}", out.display(), e))?;
      println!("Wrote {}", out.display());
    }
  }
  Ok(())
}

async fn run_tasks(command: TaskCommand, client: &CachedHubClient) -> Result<()> {
  match command {
    TaskCommand::Ls => {
      for task in &client.tasks().await?.data {
        let mark = if task.completed { "x" } else { " " };
        let due = task.due_date.as_deref().unwrap_or("-");
        println!("[{}] {}  {}  due {}", mark, task.id, task.title, due);
      }
    }
    TaskCommand::Add { title, category, description, due } => {
      if title.trim().is_empty() {
        return Err(eyre!("Task title must not be empty"));
      }
      let task = client
        .create_task(&TaskCreate {
          title,
          description,
          category,
          due_date: due,
          completed: false,
        })
        .await?;
      println!("Created task {} ({})", task.title, task.id);
    }
    TaskCommand::Done { id } => {
      let tasks = client.tasks().await?.data;
      let task = tasks
        .iter()
        .find(|task| task.id == id)
        .ok_or_else(|| eyre!("No task with id {}", id))?;
      client.update_task(&id, &completed_payload(task)).await?;
      println!("Completed task {}", id);
    }
    TaskCommand::Rm { id } => {
      client.delete_task(&id).await?;
      println!("Deleted task {}", id);
    }
  }
  Ok(())
}

fn completed_payload(task: &Task) -> TaskCreate {
  TaskCreate {
    title: task.title.clone(),
    description: task.description.clone(),
    category: task.category.clone(),
    due_date: task.due_date.clone(),
    completed: true,
  }
}

async fn run_board(command: BoardCommand, client: &CachedHubClient) -> Result<()> {
  match command {
    BoardCommand::Ls => {
      for announcement in &client.open_announcements().await?.data {
        let who = announcement.full_name.as_deref().unwrap_or("anonymous");
        println!("{}  {} [{}] - {}", announcement.id, announcement.title, announcement.category, who);
      }
    }
    BoardCommand::Mine => {
      for announcement in &client.my_announcements().await?.data {
        println!("{}  {} ({:?})", announcement.id, announcement.title, announcement.status);
      }
    }
    BoardCommand::Add { title, category, contact_method, contact } => {
      if title.trim().is_empty() {
        return Err(eyre!("Announcement title must not be empty"));
      }
      let contact_method = match contact_method.as_str() {
        "email" => ContactMethod::Email,
        "phone" => ContactMethod::Phone,
        other => return Err(eyre!("Unknown contact method '{}': use email or phone", other)),
      };
      let announcement = client
        .create_announcement(&AnnouncementCreate {
          title,
          category,
          contact_method,
          contact_value: contact,
          status: None,
        })
        .await?;
      println!("Posted announcement {}", announcement.id);
    }
    BoardCommand::Toggle { id } => {
      let announcement = client.toggle_announcement_status(&id).await?;
      println!("Announcement {} is now {:?}", announcement.id, announcement.status);
    }
    BoardCommand::Rm { id } => {
      client.delete_announcement(&id).await?;
      println!("Deleted announcement {}", id);
    }
  }
  Ok(())
}

async fn run_profile(command: ProfileCommand, client: &CachedHubClient) -> Result<()> {
  match command {
    ProfileCommand::Show => match client.profile().await? {
      Some(profile) => {
        println!("{}", profile.full_name);
        println!("Level: {:?}", profile.academic_level);
        if let Some(specialization) = profile.specialization {
          println!("Specialization: {:?}", specialization);
        }
        println!("Anonymous on the help board: {}", profile.is_anonymous);
      }
      None => println!("Profile not completed yet."),
    },
    ProfileCommand::Complete { full_name, level, specialization, anonymous } => {
      if full_name.trim().is_empty() {
        return Err(eyre!("Full name must not be empty"));
      }
      let payload = ProfilePayload {
        full_name,
        academic_level: parse_level(&level)?,
        specialization: specialization.as_deref().map(parse_specialization).transpose()?,
        is_anonymous: anonymous,
        image_url: None,
      };
      client.complete_profile(&payload).await?;
      println!("Profile completed.");
    }
    ProfileCommand::Image { path } => {
      let upload = read_upload(&path)?;
      let url = client.upload_profile_image(upload).await?;
      println!("{}", url);
    }
    ProfileCommand::ChangePassword { new_password } => {
      let current = Config::get_password()?;
      let message = client.api().change_password(&current, &new_password).await?;
      println!("{}", message);
    }
    ProfileCommand::ChangeEmail { new_email } => {
      let current = Config::get_password()?;
      let message = client.api().request_email_change(&new_email, &current).await?;
      println!("{}", message);
    }
    ProfileCommand::Delete => {
      client.delete_profile().await?;
      println!("Profile deleted.");
    }
  }
  Ok(())
}

/// Flatten a document tree back to plain-text lines for terminal display.
fn note_text(document: &NoteDocument) -> Vec<String> {
  fn collect(node: &serde_json::Value, out: &mut String) {
    if let Some(text) = node.get("text").and_then(serde_json::Value::as_str) {
      out.push_str(text);
    }
    if let Some(children) = node.get("content").and_then(serde_json::Value::as_array) {
      for child in children {
        collect(child, out);
      }
    }
  }

  document
    .content
    .iter()
    .map(|node| {
      let mut line = String::new();
      collect(node, &mut line);
      line
    })
    .filter(|line| !line.is_empty())
    .collect()
}

/// Wrap plain text into the rich-text document shape.
fn text_document(text: &str) -> NoteDocument {
  if text.is_empty() {
    return NoteDocument::empty();
  }
  NoteDocument {
    kind: "doc".to_string(),
    content: vec![serde_json::json!({
      "type": "paragraph",
      "content": [ { "type": "text", "text": text } ]
    })],
  }
}

fn parse_level(raw: &str) -> Result<AcademicLevel> {
  serde_json::from_value(serde_json::Value::String(raw.to_uppercase()))
    .map_err(|_| eyre!("Unknown academic level '{}': use CP1, CP2, GI1, GI2 or GI3", raw))
}

fn parse_specialization(raw: &str) -> Result<Specialization> {
  serde_json::from_value(serde_json::Value::String(raw.to_string()))
    .map_err(|_| eyre!("Unknown specialization '{}'", raw))
}

fn read_upload(path: &Path) -> Result<FileUpload> {
  let bytes =
    std::fs::read(path).map_err(|e| eyre!("Failed to read {}: {}", path.display(), e))?;
  let file_name = path
    .file_name()
    .and_then(|name| name.to_str())
    .ok_or_else(|| eyre!("Invalid file name: {}", path.display()))?
    .to_string();
  let mime_type = mime_for(path).to_string();

  Ok(FileUpload {
    file_name,
    mime_type,
    bytes,
  })
}

/// MIME type by extension, covering what the file views categorize.
fn mime_for(path: &Path) -> &'static str {
  match path
    .extension()
    .and_then(|ext| ext.to_str())
    .map(str::to_lowercase)
    .as_deref()
  {
    Some("pdf") => "application/pdf",
    Some("png") => "image/png",
    Some("jpg") | Some("jpeg") => "image/jpeg",
    Some("gif") => "image/gif",
    Some("webp") => "image/webp",
    Some("svg") => "image/svg+xml",
    Some("txt") | Some("md") => "text/plain",
    Some("csv") => "text/csv",
    Some("doc") => "application/msword",
    Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    Some("ppt") => "application/vnd.ms-powerpoint",
    Some("pptx") => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    Some("zip") => "application/zip",
    _ => "application/octet-stream",
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_note_text_round_trips_plain_paragraphs() {
    let doc = text_document("study greedy algorithms");
    assert_eq!(note_text(&doc), vec!["study greedy algorithms"]);
    assert!(note_text(&NoteDocument::empty()).is_empty());
  }

  #[test]
  fn test_text_document_shape() {
    let doc = text_document("hello");
    assert_eq!(doc.kind, "doc");
    assert_eq!(doc.content.len(), 1);
    assert_eq!(doc.content[0]["type"], "paragraph");

    assert_eq!(text_document(""), NoteDocument::empty());
  }

  #[test]
  fn test_parse_level() {
    assert_eq!(parse_level("gi2").unwrap(), AcademicLevel::Gi2);
    assert!(parse_level("PhD").is_err());
  }

  #[test]
  fn test_parse_specialization() {
    assert_eq!(
      parse_specialization("Génie Industriel").unwrap(),
      Specialization::Industriel
    );
    assert!(parse_specialization("Astrology").is_err());
  }

  #[test]
  fn test_mime_for_common_extensions() {
    assert_eq!(mime_for(Path::new("a.PDF")), "application/pdf");
    assert_eq!(mime_for(Path::new("photo.jpeg")), "image/jpeg");
    assert_eq!(mime_for(Path::new("mystery.bin")), "application/octet-stream");
  }
}
