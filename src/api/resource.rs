//! Cached client for one backend collection.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::client::{ApiClient, FilePart};
use crate::cache::{Entity, ResourceCache};
use crate::error::ApiError;

/// A collection exposed by the backend under `/api/{endpoint}`.
pub trait Resource: Entity {
  /// Path segment for this collection, e.g. "citas".
  fn endpoint() -> &'static str;
}

/// Backend client for one collection, with the read-through cache in
/// front.
///
/// One parameterized implementation serves every entity type, so each
/// screen of a consuming UI talks to the same instance and a mutation made
/// on one screen is visible to the next without a re-fetch. `S` is the
/// history record type for collections that have the history route.
#[derive(Clone)]
pub struct ResourceClient<E: Resource, S = ()> {
  api: ApiClient,
  cache: ResourceCache<E, S>,
}

impl<E, S> ResourceClient<E, S>
where
  E: Resource,
  S: Clone + Send + Sync + DeserializeOwned + 'static,
{
  pub fn new(api: ApiClient) -> Self {
    Self {
      api,
      cache: ResourceCache::new(),
    }
  }

  fn collection_path() -> String {
    format!("/api/{}", E::endpoint())
  }

  fn record_path(id: u64) -> String {
    format!("/api/{}/{}", E::endpoint(), id)
  }

  fn history_path(id: u64) -> String {
    format!("/api/listar_historial_{}/{}", E::endpoint(), id)
  }

  /// List the collection, served from memory after the first fetch.
  pub async fn list(&self) -> Result<Vec<E>, ApiError> {
    self
      .cache
      .get_list(|| {
        let api = self.api.clone();
        let path = Self::collection_path();
        async move { api.get(&path).await }
      })
      .await
  }

  /// Fetch one record, served from memory after the first fetch.
  pub async fn get(&self, id: u64) -> Result<E, ApiError> {
    self
      .cache
      .get_detail(id, || {
        let api = self.api.clone();
        let path = Self::record_path(id);
        async move { api.get(&path).await }
      })
      .await
  }

  /// Fetch the history entries for one record.
  ///
  /// Only collections with a history route answer this; see the per-entity
  /// aliases for which ones do.
  pub async fn history(&self, id: u64) -> Result<Vec<S>, ApiError> {
    self
      .cache
      .get_history(id, || {
        let api = self.api.clone();
        let path = Self::history_path(id);
        async move { api.get(&path).await }
      })
      .await
  }

  /// Create a record; the cached list picks it up without a re-fetch.
  pub async fn create<P: Serialize>(&self, payload: &P) -> Result<E, ApiError> {
    let body = to_body(payload)?;
    self
      .cache
      .create(|| {
        let api = self.api.clone();
        let path = Self::collection_path();
        async move { api.post(&path, &body).await }
      })
      .await
  }

  /// Create a record with file attachments (multipart).
  pub async fn create_with_files<P: Serialize>(
    &self,
    payload: &P,
    files: Vec<FilePart>,
  ) -> Result<E, ApiError> {
    let body = to_body(payload)?;
    self
      .cache
      .create(|| {
        let api = self.api.clone();
        let path = Self::collection_path();
        async move { api.post_form(&path, body, files).await }
      })
      .await
  }

  /// Update a record; the cached list entry is patched in place.
  pub async fn update<P: Serialize>(&self, id: u64, payload: &P) -> Result<E, ApiError> {
    let body = to_body(payload)?;
    let patch = body.clone();
    self
      .cache
      .update(id, &patch, || {
        let api = self.api.clone();
        let path = Self::record_path(id);
        async move { api.put(&path, &body).await }
      })
      .await
  }

  /// Update a record with file attachments.
  ///
  /// Goes out as multipart POST with the `_method=PUT` override field the
  /// backend requires for file-bearing updates.
  pub async fn update_with_files<P: Serialize>(
    &self,
    id: u64,
    payload: &P,
    files: Vec<FilePart>,
  ) -> Result<E, ApiError> {
    let body = to_body(payload)?;
    let patch = body.clone();
    self
      .cache
      .update(id, &patch, || {
        let api = self.api.clone();
        let path = Self::record_path(id);
        async move { api.post_form_as_put(&path, body, files).await }
      })
      .await
  }

  /// Delete a record and drop it from every cache slot.
  pub async fn delete(&self, id: u64) -> Result<(), ApiError> {
    self
      .cache
      .remove(id, || {
        let api = self.api.clone();
        let path = Self::record_path(id);
        async move { api.delete(&path).await }
      })
      .await
  }

  /// Forget everything cached for this collection.
  pub fn invalidate_all(&self) {
    self.cache.invalidate_all();
  }
}

fn to_body<P: Serialize>(payload: &P) -> Result<Value, ApiError> {
  serde_json::to_value(payload)
    .map_err(|e| ApiError::MutationFailed(format!("failed to encode payload: {e}")))
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde::Deserialize;
  use serde_json::json;
  use std::time::Duration;

  #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
  struct Tramite {
    id: u64,
    nombre: String,
    estado: String,
  }

  impl Entity for Tramite {
    fn id(&self) -> u64 {
      self.id
    }
  }

  impl Resource for Tramite {
    fn endpoint() -> &'static str {
      "tramites"
    }
  }

  #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
  struct Evento {
    id: u64,
    estado: String,
  }

  fn client_for(server: &mockito::ServerGuard) -> ResourceClient<Tramite, Evento> {
    let api = ApiClient::from_parts(&server.url(), "test-token", Duration::from_secs(5)).unwrap();
    ResourceClient::new(api)
  }

  #[tokio::test]
  async fn list_hits_the_backend_exactly_once() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("GET", "/api/tramites")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(r#"[{"id":1,"nombre":"Asilo","estado":"Pendiente"}]"#)
      .expect(1)
      .create_async()
      .await;

    let client = client_for(&server);
    let first = client.list().await.unwrap();
    let second = client.list().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 1);
    mock.assert_async().await;
  }

  #[tokio::test]
  async fn create_appends_to_the_cached_list() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/api/tramites")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(r#"[{"id":1,"nombre":"Asilo","estado":"Pendiente"}]"#)
      .expect(1)
      .create_async()
      .await;
    server
      .mock("POST", "/api/tramites")
      .with_status(201)
      .with_header("content-type", "application/json")
      .with_body(r#"{"id":2,"nombre":"Permiso","estado":"Pendiente"}"#)
      .create_async()
      .await;

    let client = client_for(&server);
    client.list().await.unwrap();
    let created = client
      .create(&json!({"nombre": "Permiso", "estado": "Pendiente"}))
      .await
      .unwrap();
    assert_eq!(created.id, 2);

    let list = client.list().await.unwrap();
    assert_eq!(list.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 2]);
  }

  #[tokio::test]
  async fn update_issues_a_real_put_and_patches_the_list() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/api/tramites")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(r#"[{"id":1,"nombre":"Asilo","estado":"Pendiente"}]"#)
      .expect(1)
      .create_async()
      .await;
    let put = server
      .mock("PUT", "/api/tramites/1")
      .match_header("content-type", "application/json")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(r#"{"id":1,"nombre":"Asilo","estado":"Aprobado"}"#)
      .create_async()
      .await;

    let client = client_for(&server);
    client.list().await.unwrap();
    client
      .update(1, &json!({"estado": "Aprobado"}))
      .await
      .unwrap();

    let list = client.list().await.unwrap();
    assert_eq!(list[0].estado, "Aprobado");
    put.assert_async().await;
  }

  #[tokio::test]
  async fn delete_evicts_the_record() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/api/tramites")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(
        r#"[{"id":1,"nombre":"Asilo","estado":"Pendiente"},
            {"id":2,"nombre":"Permiso","estado":"Pendiente"}]"#,
      )
      .expect(1)
      .create_async()
      .await;
    let del = server
      .mock("DELETE", "/api/tramites/1")
      .with_status(204)
      .create_async()
      .await;

    let client = client_for(&server);
    client.list().await.unwrap();
    client.delete(1).await.unwrap();

    let list = client.list().await.unwrap();
    assert_eq!(list.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2]);
    del.assert_async().await;
  }

  #[tokio::test]
  async fn missing_record_surfaces_as_not_found() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/api/tramites/9")
      .with_status(404)
      .create_async()
      .await;

    let client = client_for(&server);
    let err = client.get(9).await.unwrap_err();
    assert!(err.is_not_found());
  }

  #[tokio::test]
  async fn history_uses_the_dedicated_route_and_caches() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("GET", "/api/listar_historial_tramites/1")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(r#"[{"id":10,"estado":"Reprogramada"}]"#)
      .expect(1)
      .create_async()
      .await;

    let client = client_for(&server);
    let first = client.history(1).await.unwrap();
    let second = client.history(1).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first[0].estado, "Reprogramada");
    mock.assert_async().await;
  }

  #[tokio::test]
  async fn invalidate_all_forces_a_fresh_list_fetch() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("GET", "/api/tramites")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(r#"[]"#)
      .expect(2)
      .create_async()
      .await;

    let client = client_for(&server);
    client.list().await.unwrap();
    client.invalidate_all();
    client.list().await.unwrap();
    mock.assert_async().await;
  }
}
