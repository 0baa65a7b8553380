mod commands;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;

use studyhub::cache::{MirrorStore, QueryCache};
use studyhub::config::Config;
use studyhub::hub::{ApiError, CachedHubClient, HubClient};

#[derive(Parser, Debug)]
#[command(name = "studyhub")]
#[command(about = "A caching client for the StudyHub student workspace")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/studyhub/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: commands::Command,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();
  let config = Config::load(args.config.as_deref())?;

  let data_dir = config.data_dir()?;
  std::fs::create_dir_all(&data_dir)?;
  let _log_guard = init_tracing(&data_dir);

  // Explicitly constructed and injected: the cache and mirror live exactly as
  // long as this process, and the janitor stops when main returns.
  let api = HubClient::new(&config.api.base_url)?;
  let cache = QueryCache::new();
  let mirror = MirrorStore::open(&data_dir.join("mirror.db"))?;
  let client = CachedHubClient::new(api, cache.clone(), mirror);
  let _janitor = cache.start_janitor(Duration::from_secs(60));

  if let Err(report) = commands::run(args.command, &client).await {
    if is_session_failure(&report) {
      eprintln!("Session expired - log in again with `studyhub login <email>`.");
      std::process::exit(2);
    }
    return Err(report);
  }

  Ok(())
}

/// A 401/403 anywhere in the chain means the session is gone; the user gets
/// sent back to login instead of a raw error dump. Cached reads flatten their
/// error chain into a message, so the rendered text is checked as a fallback.
fn is_session_failure(report: &color_eyre::Report) -> bool {
  let typed = report.chain().any(|cause| {
    cause
      .downcast_ref::<ApiError>()
      .map(ApiError::is_auth_failure)
      .unwrap_or(false)
  });

  typed || {
    let rendered = format!("{:#}", report);
    rendered.contains("server returned 401") || rendered.contains("server returned 403")
  }
}

fn init_tracing(data_dir: &Path) -> tracing_appender::non_blocking::WorkerGuard {
  let appender = tracing_appender::rolling::daily(data_dir.join("logs"), "studyhub.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_writer(writer)
    .with_ansi(false)
    .init();

  guard
}
