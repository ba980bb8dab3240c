//! Client library for the gestoría admin backend.
//!
//! Typed entities over the backend's REST API with a read-through cache in
//! front: list, detail and history reads hit the network once and are served
//! from memory afterwards, while create/update/delete calls fold their
//! confirmed result into the cached list instead of forcing a re-fetch.
//!
//! # Example
//!
//! ```ignore
//! let config = Config::load(None)?;
//! let api = ApiClient::new(&config)?;
//! let citas = AppointmentClient::new(api.clone());
//!
//! let todas = citas.list().await?;    // network
//! let otra_vez = citas.list().await?; // memory, no request
//! citas.delete(7).await?;             // cached list updated in place
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod error;

pub use api::{ApiClient, FilePart, Resource, ResourceClient};
pub use cache::{Entity, ResourceCache};
pub use config::Config;
pub use error::ApiError;
