//! Core trait for records served through the cache.

use serde::{de::DeserializeOwned, Serialize};

/// Trait for entities the cache can hold.
///
/// The backend assigns every record a numeric id, unique within its
/// collection. The cache keys its detail and history maps by it and uses it
/// to match list entries when folding in mutations. Serde bounds are needed
/// because update patches are merged through the JSON representation.
pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
  /// Backend identifier for this record.
  fn id(&self) -> u64;
}
