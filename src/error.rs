//! Error taxonomy for backend calls.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by the API client and the cache layer.
///
/// Reads and writes fail with distinct variants so callers can keep showing
/// whatever they already have when a refresh fails, and 404s are split out
/// so "edited here, deleted elsewhere" can be special-cased. Every failure
/// leaves the cache slots involved exactly as they were before the call.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The backend reported 404 for the requested path.
  #[error("not found: {0}")]
  NotFound(String),

  /// A list, detail or history read failed: network error, non-2xx status
  /// or an undecodable response body.
  #[error("fetch failed: {0}")]
  FetchFailed(String),

  /// A create, update or delete failed, or its payload could not be
  /// encoded.
  #[error("mutation failed: {0}")]
  MutationFailed(String),

  /// Missing or malformed configuration: config file, base URL or API
  /// token.
  #[error("config error: {0}")]
  Config(String),
}

impl ApiError {
  /// Classify a non-success status from a read call.
  pub(crate) fn from_read_status(status: StatusCode, path: &str, body: &str) -> Self {
    if status == StatusCode::NOT_FOUND {
      ApiError::NotFound(path.to_string())
    } else {
      ApiError::FetchFailed(format!("GET {path} returned {status}: {body}"))
    }
  }

  /// Classify a non-success status from a write call.
  pub(crate) fn from_write_status(method: &str, status: StatusCode, path: &str, body: &str) -> Self {
    if status == StatusCode::NOT_FOUND {
      ApiError::NotFound(path.to_string())
    } else {
      ApiError::MutationFailed(format!("{method} {path} returned {status}: {body}"))
    }
  }

  /// True if the backend reported the target as absent.
  pub fn is_not_found(&self) -> bool {
    matches!(self, ApiError::NotFound(_))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn read_404_is_not_found() {
    let err = ApiError::from_read_status(StatusCode::NOT_FOUND, "/api/citas/9", "");
    assert!(err.is_not_found());
  }

  #[test]
  fn read_500_is_fetch_failed() {
    let err = ApiError::from_read_status(StatusCode::INTERNAL_SERVER_ERROR, "/api/citas", "boom");
    assert!(matches!(err, ApiError::FetchFailed(_)));
    assert!(!err.is_not_found());
  }

  #[test]
  fn write_422_is_mutation_failed() {
    let err = ApiError::from_write_status(
      "POST",
      StatusCode::UNPROCESSABLE_ENTITY,
      "/api/citas",
      "fecha_cita requerida",
    );
    assert!(matches!(err, ApiError::MutationFailed(_)));
  }

  #[test]
  fn write_404_is_not_found() {
    let err = ApiError::from_write_status("DELETE", StatusCode::NOT_FOUND, "/api/citas/9", "");
    assert!(err.is_not_found());
  }
}
