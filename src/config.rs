use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ApiError;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub backend: BackendConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
  /// Base URL of the backend, e.g. "https://admin.gestoria.example"
  pub url: String,
  /// Per-request timeout in seconds
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
  30
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./gestoria.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/gestoria/config.yaml
  pub fn load(explicit_path: Option<&Path>) -> Result<Self, ApiError> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(ApiError::Config(format!(
          "config file not found: {}",
          p.display()
        )));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Err(ApiError::Config(
        "no configuration file found. Create one at ~/.config/gestoria/config.yaml".to_string(),
      )),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("gestoria.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("gestoria").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self, ApiError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
      ApiError::Config(format!("failed to read config file {}: {e}", path.display()))
    })?;

    let config: Config = serde_yaml::from_str(&contents).map_err(|e| {
      ApiError::Config(format!("failed to parse config file {}: {e}", path.display()))
    })?;

    Ok(config)
  }

  /// Get the backend API token from environment variables.
  ///
  /// Checks GESTORIA_API_TOKEN first, then GESTORIA_TOKEN as fallback.
  pub fn api_token() -> Result<String, ApiError> {
    std::env::var("GESTORIA_API_TOKEN")
      .or_else(|_| std::env::var("GESTORIA_TOKEN"))
      .map_err(|_| {
        ApiError::Config(
          "API token not found. Set GESTORIA_API_TOKEN or GESTORIA_TOKEN environment variable."
            .to_string(),
        )
      })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn load_from_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "backend:\n  url: https://admin.gestoria.test\n").unwrap();

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.backend.url, "https://admin.gestoria.test");
    assert_eq!(config.backend.timeout_secs, 30);
  }

  #[test]
  fn explicit_path_must_exist() {
    let err = Config::load(Some(Path::new("/definitely/not/here.yaml"))).unwrap_err();
    assert!(matches!(err, ApiError::Config(_)));
  }

  #[test]
  fn timeout_can_be_overridden() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(
      &path,
      "backend:\n  url: http://localhost:8000\n  timeout_secs: 5\n",
    )
    .unwrap();

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.backend.timeout_secs, 5);
  }

  #[test]
  fn malformed_yaml_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "backend: [not a mapping").unwrap();

    let err = Config::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ApiError::Config(_)));
  }
}
