use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub api: ApiConfig,
  /// Override for the data directory holding the mirror database and logs.
  pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  /// Base URL of the StudyHub backend.
  #[serde(default = "default_base_url")]
  pub base_url: String,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: default_base_url(),
    }
  }
}

fn default_base_url() -> String {
  "http://localhost:8000".to_string()
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./studyhub.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/studyhub/config.yaml
  ///
  /// Missing config files fall back to defaults. STUDYHUB_API_URL overrides
  /// the base URL either way.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let mut config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => Config::default(),
    };

    if let Ok(url) = std::env::var("STUDYHUB_API_URL") {
      config.api.base_url = url;
    }

    Ok(config)
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("studyhub.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("studyhub").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let config: Config = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

    Ok(config)
  }

  /// Get the account password from the environment for non-interactive auth
  /// commands.
  ///
  /// Checks STUDYHUB_PASSWORD.
  pub fn get_password() -> Result<String> {
    std::env::var("STUDYHUB_PASSWORD")
      .map_err(|_| eyre!("Password not found. Set the STUDYHUB_PASSWORD environment variable."))
  }

  /// Resolve the data directory for the mirror database and logs.
  pub fn data_dir(&self) -> Result<PathBuf> {
    if let Some(dir) = &self.data_dir {
      return Ok(dir.clone());
    }

    dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .map(|p| p.join("studyhub"))
      .ok_or_else(|| eyre!("Could not determine data directory"))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.api.base_url, "http://localhost:8000");
    assert!(config.data_dir.is_none());
  }

  #[test]
  fn test_parse_yaml() {
    let config: Config = serde_yaml::from_str(
      "api:\n  base_url: https://api.studyhub.example\ndata_dir: /tmp/studyhub\n",
    )
    .unwrap();
    assert_eq!(config.api.base_url, "https://api.studyhub.example");
    assert_eq!(config.data_dir.unwrap(), PathBuf::from("/tmp/studyhub"));
  }

  #[test]
  fn test_partial_yaml_uses_defaults() {
    let config: Config = serde_yaml::from_str("data_dir: /tmp/studyhub\n").unwrap();
    assert_eq!(config.api.base_url, "http://localhost:8000");
  }
}
