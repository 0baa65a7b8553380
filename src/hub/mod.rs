//! StudyHub backend API: transport, typed per-domain accessors, and the cached
//! client the view layer talks to.

pub mod api_types;
mod auth;
mod cache;
mod cached_client;
mod chat;
mod courses;
mod dashboard;
mod error;
mod files;
mod help;
mod notes;
mod planning;
mod profile;
mod tasks;
mod transport;
pub mod types;

pub use cache::HubQuery;
pub use cached_client::CachedHubClient;
pub use dashboard::{Dashboard, DashboardData, DashboardStats};
pub use error::ApiError;
pub use files::FileUpload;
pub use transport::HubClient;
