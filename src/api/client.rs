use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::error::ApiError;

/// One file attached to a multipart create or update.
#[derive(Debug, Clone)]
pub struct FilePart {
  /// Form field name the backend expects, e.g. "imagen" or "archivo".
  pub field: String,
  pub file_name: String,
  pub mime: String,
  pub bytes: Vec<u8>,
}

/// Backend REST API client wrapper.
///
/// Carries the bearer token on every request and maps responses onto the
/// crate's error taxonomy: reads fail as `FetchFailed`, writes as
/// `MutationFailed`, 404s as `NotFound` on either path. No retries and no
/// cancellation; a call runs to completion or failure.
#[derive(Clone)]
pub struct ApiClient {
  http: reqwest::Client,
  base_url: Url,
  token: String,
}

impl ApiClient {
  /// Create a client from loaded configuration.
  ///
  /// The API token is read from the environment once, here; see
  /// [`Config::api_token`]. The client never refreshes it.
  pub fn new(config: &Config) -> Result<Self, ApiError> {
    let token = Config::api_token()?;
    Self::from_parts(
      &config.backend.url,
      &token,
      Duration::from_secs(config.backend.timeout_secs),
    )
  }

  /// Create a client against an explicit base URL and token.
  pub fn from_parts(base_url: &str, token: &str, timeout: Duration) -> Result<Self, ApiError> {
    let base_url = Url::parse(base_url)
      .map_err(|e| ApiError::Config(format!("invalid backend url {base_url}: {e}")))?;

    let http = reqwest::Client::builder()
      .timeout(timeout)
      .build()
      .map_err(|e| ApiError::Config(format!("failed to build http client: {e}")))?;

    Ok(Self {
      http,
      base_url,
      token: token.to_string(),
    })
  }

  fn request_url(&self, path: &str) -> Result<Url, ApiError> {
    self
      .base_url
      .join(path)
      .map_err(|e| ApiError::Config(format!("invalid request path {path}: {e}")))
  }

  /// GET a JSON resource.
  pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
    let response = self
      .http
      .get(self.request_url(path)?)
      .bearer_auth(&self.token)
      .send()
      .await
      .map_err(|e| ApiError::FetchFailed(format!("GET {path}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      warn!(%status, path, "read request failed");
      return Err(ApiError::from_read_status(status, path, &body));
    }

    debug!(%status, path, "GET");
    response
      .json()
      .await
      .map_err(|e| ApiError::FetchFailed(format!("GET {path}: invalid response body: {e}")))
  }

  /// POST a JSON body, decoding the created record from the response.
  pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
  where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
  {
    let response = self
      .http
      .post(self.request_url(path)?)
      .bearer_auth(&self.token)
      .json(body)
      .send()
      .await
      .map_err(|e| ApiError::MutationFailed(format!("POST {path}: {e}")))?;

    self.decode_write("POST", path, response).await
  }

  /// PUT a JSON body, decoding the updated record from the response.
  pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
  where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
  {
    let response = self
      .http
      .put(self.request_url(path)?)
      .bearer_auth(&self.token)
      .json(body)
      .send()
      .await
      .map_err(|e| ApiError::MutationFailed(format!("PUT {path}: {e}")))?;

    self.decode_write("PUT", path, response).await
  }

  /// DELETE a resource. The backend answers 204 or 200; the body is
  /// ignored either way.
  pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
    let response = self
      .http
      .delete(self.request_url(path)?)
      .bearer_auth(&self.token)
      .send()
      .await
      .map_err(|e| ApiError::MutationFailed(format!("DELETE {path}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      warn!(%status, path, "delete failed");
      return Err(ApiError::from_write_status("DELETE", status, path, &body));
    }

    debug!(%status, path, "DELETE");
    Ok(())
  }

  /// POST multipart form data (create with attachments).
  pub async fn post_form<T: DeserializeOwned>(
    &self,
    path: &str,
    fields: Value,
    files: Vec<FilePart>,
  ) -> Result<T, ApiError> {
    let form = multipart_form(fields, files, false)?;
    self.send_form(path, form).await
  }

  /// POST multipart form data carrying the `_method=PUT` override field.
  ///
  /// Multipart PUT does not survive browsers reliably, so the backend
  /// expects file-bearing updates as POST plus the override field.
  pub async fn post_form_as_put<T: DeserializeOwned>(
    &self,
    path: &str,
    fields: Value,
    files: Vec<FilePart>,
  ) -> Result<T, ApiError> {
    let form = multipart_form(fields, files, true)?;
    self.send_form(path, form).await
  }

  async fn send_form<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T, ApiError> {
    let response = self
      .http
      .post(self.request_url(path)?)
      .bearer_auth(&self.token)
      .multipart(form)
      .send()
      .await
      .map_err(|e| ApiError::MutationFailed(format!("POST {path}: {e}")))?;

    self.decode_write("POST", path, response).await
  }

  async fn decode_write<T: DeserializeOwned>(
    &self,
    method: &str,
    path: &str,
    response: reqwest::Response,
  ) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      warn!(%status, method, path, "write request failed");
      return Err(ApiError::from_write_status(method, status, path, &body));
    }

    debug!(%status, method, path, "write confirmed");
    response.json().await.map_err(|e| {
      ApiError::MutationFailed(format!("{method} {path}: invalid response body: {e}"))
    })
  }
}

/// Build a multipart form: scalar payload fields become text parts
/// (numbers and booleans stringified), files become byte parts, and the
/// method-override field goes last when requested.
fn multipart_form(fields: Value, files: Vec<FilePart>, override_put: bool) -> Result<Form, ApiError> {
  let mut form = Form::new();

  if let Value::Object(fields) = fields {
    for (name, value) in fields {
      let text = match value {
        Value::Null => continue,
        Value::String(s) => s,
        other => other.to_string(),
      };
      form = form.text(name, text);
    }
  }

  for FilePart {
    field,
    file_name,
    mime,
    bytes,
  } in files
  {
    let part = Part::bytes(bytes)
      .file_name(file_name)
      .mime_str(&mime)
      .map_err(|e| ApiError::MutationFailed(format!("invalid mime type {mime}: {e}")))?;
    form = form.part(field, part);
  }

  if override_put {
    form = form.text("_method", "PUT");
  }

  Ok(form)
}
