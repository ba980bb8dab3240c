//! Cache and routing impls for the backend collections.

use super::resource::{Resource, ResourceClient};
use super::types::{
  Appointment, AppointmentHistoryEntry, Category, Document, MigrationCase, Product, User,
};
use crate::cache::Entity;

// ============================================================================
// Entity / Resource implementations
// ============================================================================

impl Entity for Appointment {
  fn id(&self) -> u64 {
    self.id
  }
}

impl Resource for Appointment {
  fn endpoint() -> &'static str {
    "citas"
  }
}

impl Entity for Category {
  fn id(&self) -> u64 {
    self.id
  }
}

impl Resource for Category {
  fn endpoint() -> &'static str {
    "categoria"
  }
}

impl Entity for Product {
  fn id(&self) -> u64 {
    self.id
  }
}

impl Resource for Product {
  fn endpoint() -> &'static str {
    "productos"
  }
}

impl Entity for Document {
  fn id(&self) -> u64 {
    self.id
  }
}

impl Resource for Document {
  fn endpoint() -> &'static str {
    "documentos"
  }
}

impl Entity for MigrationCase {
  fn id(&self) -> u64 {
    self.id
  }
}

impl Resource for MigrationCase {
  fn endpoint() -> &'static str {
    "inmigracion"
  }
}

impl Entity for User {
  fn id(&self) -> u64 {
    self.id
  }
}

impl Resource for User {
  fn endpoint() -> &'static str {
    "usuario"
  }
}

// ============================================================================
// Per-entity clients
// ============================================================================

/// Appointment client, with the scheduling-history sub-resource wired in.
pub type AppointmentClient = ResourceClient<Appointment, AppointmentHistoryEntry>;
pub type CategoryClient = ResourceClient<Category>;
pub type ProductClient = ResourceClient<Product>;
pub type DocumentClient = ResourceClient<Document>;
pub type MigrationCaseClient = ResourceClient<MigrationCase>;
pub type UserClient = ResourceClient<User>;
