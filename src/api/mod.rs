//! Typed access to the backend REST API.

mod client;
mod resource;
mod resources;
pub mod types;

pub use client::{ApiClient, FilePart};
pub use resource::{Resource, ResourceClient};
pub use resources::{
  AppointmentClient, CategoryClient, DocumentClient, MigrationCaseClient, ProductClient,
  UserClient,
};
