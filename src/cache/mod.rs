//! In-memory read-through caching for backend collections.
//!
//! This module provides a backend-agnostic caching mechanism that:
//! - Memoizes list, per-id detail and per-id history reads
//! - Applies confirmed create/update/delete results to the cached list
//!   without forcing a re-fetch
//! - Distinguishes "never fetched" from "fetched and empty"
//! - Offers `invalidate_all` as the explicit escape hatch when the backend
//!   changed behind the cache's back

mod layer;
mod traits;

pub use layer::ResourceCache;
pub use traits::Entity;
