//! Cache layer that orchestrates read-through fetching and local mutation.

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

use super::traits::Entity;
use crate::error::ApiError;

/// In-memory cache for one entity collection.
///
/// `E` is the entity type, `S` the per-id history (sub-resource) record
/// type; collections without a history route leave `S` at the `()` default
/// and never call [`ResourceCache::get_history`].
///
/// The list slot distinguishes "never fetched" (`None`) from "fetched and
/// empty" (`Some` of an empty vec): only the former triggers a network
/// call. Detail and history slots are populated lazily per id,
/// independently of the list. All slots live for the process lifetime
/// unless dropped by a delete or by [`ResourceCache::invalidate_all`].
///
/// State sits behind a mutex that is never held across an await, so
/// interleaving between concurrent callers happens only at the fetch and
/// mutation suspension points. Misses are not de-duplicated: two callers
/// racing on a cold slot both fetch, and the last response to arrive wins
/// the slot.
pub struct ResourceCache<E, S = ()> {
  state: Arc<Mutex<CacheState<E, S>>>,
}

struct CacheState<E, S> {
  list: Option<Vec<E>>,
  details: HashMap<u64, E>,
  history: HashMap<u64, Vec<S>>,
}

impl<E: Entity, S: Clone> ResourceCache<E, S> {
  pub fn new() -> Self {
    Self {
      state: Arc::new(Mutex::new(CacheState {
        list: None,
        details: HashMap::new(),
        history: HashMap::new(),
      })),
    }
  }

  /// Return the cached list, fetching it once on first use.
  ///
  /// A fetch failure propagates to the caller and leaves the slot absent,
  /// so the next call retries the network.
  pub async fn get_list<F, Fut>(&self, fetcher: F) -> Result<Vec<E>, ApiError>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<E>, ApiError>>,
  {
    if let Some(cached) = self.state.lock().list.clone() {
      return Ok(cached);
    }

    let list = fetcher().await?;
    debug!(count = list.len(), "list fetched from backend");
    self.state.lock().list = Some(list.clone());
    Ok(list)
  }

  /// Return the cached detail record for `id`, fetching it on first use.
  ///
  /// The detail record may carry more fields than its list projection; the
  /// two slots are populated and kept independently.
  pub async fn get_detail<F, Fut>(&self, id: u64, fetcher: F) -> Result<E, ApiError>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<E, ApiError>>,
  {
    if let Some(cached) = self.state.lock().details.get(&id).cloned() {
      return Ok(cached);
    }

    let entity = fetcher().await?;
    self.state.lock().details.insert(id, entity.clone());
    Ok(entity)
  }

  /// Return the cached history entries for `id`, fetching them on first
  /// use.
  pub async fn get_history<F, Fut>(&self, id: u64, fetcher: F) -> Result<Vec<S>, ApiError>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<S>, ApiError>>,
  {
    if let Some(cached) = self.state.lock().history.get(&id).cloned() {
      return Ok(cached);
    }

    let entries = fetcher().await?;
    self.state.lock().history.insert(id, entries.clone());
    Ok(entries)
  }

  /// Run a create call and append the confirmed entity to the cached list.
  ///
  /// With the list never fetched there is nothing to append to; the next
  /// [`ResourceCache::get_list`] fetches fresh data that already includes
  /// the new record. A failed create leaves every slot untouched.
  pub async fn create<F, Fut>(&self, op: F) -> Result<E, ApiError>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<E, ApiError>>,
  {
    let created = op().await?;
    let mut state = self.state.lock();
    if let Some(list) = state.list.as_mut() {
      list.push(created.clone());
    }
    Ok(created)
  }

  /// Run an update call and fold the confirmed change into the cache.
  ///
  /// The cached list entry becomes a shallow merge of its previous value
  /// and `patch`: fields the backend computes server-side keep their last
  /// fetched value until the list is re-fetched or invalidated. The detail
  /// slot, when one exists for `id`, is overwritten with the backend's
  /// returned record; an update never creates a detail slot.
  pub async fn update<P, F, Fut>(&self, id: u64, patch: &P, op: F) -> Result<E, ApiError>
  where
    P: Serialize,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<E, ApiError>>,
  {
    let updated = op().await?;
    let mut state = self.state.lock();
    if let Some(entry) = state
      .list
      .as_mut()
      .and_then(|list| list.iter_mut().find(|e| e.id() == id))
    {
      *entry = shallow_merge(entry, patch).unwrap_or_else(|| updated.clone());
    }
    if let Some(slot) = state.details.get_mut(&id) {
      *slot = updated.clone();
    }
    Ok(updated)
  }

  /// Run a delete call and drop `id` from every slot.
  pub async fn remove<F, Fut>(&self, id: u64, op: F) -> Result<(), ApiError>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<(), ApiError>>,
  {
    op().await?;
    let mut state = self.state.lock();
    if let Some(list) = state.list.as_mut() {
      list.retain(|e| e.id() != id);
    }
    state.details.remove(&id);
    state.history.remove(&id);
    Ok(())
  }

  /// Drop everything: the list slot back to never-fetched, both maps
  /// empty.
  ///
  /// Escape hatch for callers that know the backend changed under them
  /// (bulk import, another operator's session). Nothing calls this
  /// automatically.
  pub fn invalidate_all(&self) {
    let mut state = self.state.lock();
    state.list = None;
    state.details.clear();
    state.history.clear();
    debug!("cache invalidated");
  }
}

impl<E: Entity, S: Clone> Default for ResourceCache<E, S> {
  fn default() -> Self {
    Self::new()
  }
}

impl<E, S> Clone for ResourceCache<E, S> {
  fn clone(&self) -> Self {
    Self {
      state: Arc::clone(&self.state),
    }
  }
}

/// Overlay the fields present in `patch` onto `current`.
///
/// A key present in the patch overwrites the field, an explicit `null`
/// included; absent keys leave the field as cached. Returns `None` when
/// either side is not a JSON object or the merged object no longer matches
/// the entity shape; the caller falls back to the server's returned record.
fn shallow_merge<E: Entity, P: Serialize>(current: &E, patch: &P) -> Option<E> {
  let mut base = serde_json::to_value(current).ok()?;
  let patch = serde_json::to_value(patch).ok()?;
  match (base.as_object_mut(), patch) {
    (Some(fields), Value::Object(overrides)) => {
      for (key, value) in overrides {
        fields.insert(key, value);
      }
    }
    _ => return None,
  }
  serde_json::from_value(base).ok()
}
