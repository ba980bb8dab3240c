//! Domain types for the backend collections.
//!
//! Field names mirror the backend's wire format verbatim (the backend
//! speaks Spanish snake_case), so no serde renames are needed. Payload
//! structs serve create and update alike: absent fields stay out of the
//! request body, which also keeps them out of the cached-list patch.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Appointment as returned by the list and detail endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
  pub id: u64,
  pub usuario_id: u64,
  pub categoria_id: u64,
  pub fecha_cita: NaiveDate,
  pub hora_cita: String,
  pub sede: String,
  pub asunto: String,
  #[serde(default)]
  pub nota: Option<String>,
  pub estado: String,
}

/// One prior scheduling of an appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentHistoryEntry {
  pub id: u64,
  pub cita: AppointmentSnapshot,
}

/// The rescheduled fields captured in a history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentSnapshot {
  pub fecha_cita: NaiveDate,
  pub hora_cita: String,
  pub sede: String,
  pub estado: String,
}

/// Fields accepted by appointment create and update calls.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AppointmentPayload {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub usuario_id: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub categoria_id: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub fecha_cita: Option<NaiveDate>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub hora_cita: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sede: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub asunto: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub nota: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub estado: Option<String>,
}

/// Service category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
  pub id: u64,
  pub nombre: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryPayload {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub nombre: Option<String>,
}

/// Inventory product.
///
/// `imagen_url` is assigned by the backend after an image upload; images
/// go out through the multipart variants with an "imagen" file part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub id: u64,
  pub categoria_id: u64,
  pub nombre: String,
  pub precio_unitario: f64,
  pub precio_compra: f64,
  #[serde(default)]
  pub descripcion: Option<String>,
  pub stock: i64,
  #[serde(default)]
  pub stock_minimo: Option<i64>,
  #[serde(default)]
  pub fecha_vencimiento: Option<NaiveDate>,
  pub estado: String,
  #[serde(default)]
  pub imagen_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductPayload {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub categoria_id: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub nombre: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub precio_unitario: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub precio_compra: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub descripcion: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub stock: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub stock_minimo: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub fecha_vencimiento: Option<NaiveDate>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub estado: Option<String>,
}

/// Uploaded document.
///
/// The file itself goes out as a multipart "archivo" part; the backend
/// stores it and returns the public `url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
  pub id: u64,
  pub nombre: String,
  pub tipo: String,
  pub url: String,
  #[serde(default)]
  pub usuario_id: Option<u64>,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentPayload {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub nombre: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub tipo: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub usuario_id: Option<u64>,
}

/// Immigration case tracked for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationCase {
  pub id: u64,
  pub usuario_id: u64,
  #[serde(default)]
  pub fecha_audiencia: Option<NaiveDate>,
  #[serde(default)]
  pub dias_corte: Option<i64>,
  #[serde(default)]
  pub fecha_envio_asilo: Option<NaiveDate>,
  #[serde(default)]
  pub fecha_permiso_trabajo: Option<NaiveDate>,
  pub estado_caso: String,
  pub estado_asilo: String,
  #[serde(default)]
  pub fecha_cumple_asilo: Option<NaiveDate>,
  #[serde(default)]
  pub nota: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MigrationCasePayload {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub usuario_id: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub fecha_audiencia: Option<NaiveDate>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub dias_corte: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub fecha_envio_asilo: Option<NaiveDate>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub fecha_permiso_trabajo: Option<NaiveDate>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub estado_caso: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub estado_asilo: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub fecha_cumple_asilo: Option<NaiveDate>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub nota: Option<String>,
}

/// Operator or customer account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
  pub id: u64,
  pub nombre: String,
  pub email: String,
  #[serde(default)]
  pub telefono: Option<String>,
  pub codigo_referido: String,
  pub numero_referido: u64,
  #[serde(default)]
  pub fecha_nacimiento: Option<NaiveDate>,
  pub rol: String,
  #[serde(default)]
  pub direccion: Option<String>,
}

/// Fields accepted by user create and update calls. The backend requires
/// `password` on create and ignores it when absent on update.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserPayload {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub nombre: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub telefono: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub password: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub fecha_nacimiento: Option<NaiveDate>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub rol: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub direccion: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn appointment_parses_the_wire_format() {
    let cita: Appointment = serde_json::from_str(
      r#"{
        "id": 7,
        "usuario_id": 3,
        "categoria_id": 2,
        "fecha_cita": "2025-03-14",
        "hora_cita": "09:00",
        "sede": "Central",
        "asunto": "Renovación de permiso",
        "estado": "Pendiente"
      }"#,
    )
    .unwrap();

    assert_eq!(cita.fecha_cita, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
    assert_eq!(cita.nota, None);
  }

  #[test]
  fn product_tolerates_null_optionals() {
    let producto: Product = serde_json::from_str(
      r#"{
        "id": 1,
        "categoria_id": 4,
        "nombre": "Carpeta",
        "precio_unitario": 3.5,
        "precio_compra": 2.0,
        "descripcion": null,
        "stock": 40,
        "stock_minimo": null,
        "fecha_vencimiento": null,
        "estado": "Activo",
        "imagen_url": null
      }"#,
    )
    .unwrap();

    assert_eq!(producto.descripcion, None);
    assert_eq!(producto.fecha_vencimiento, None);
  }

  #[test]
  fn payload_skips_absent_fields() {
    let payload = AppointmentPayload {
      estado: Some("Confirmada".to_string()),
      ..AppointmentPayload::default()
    };

    let body = serde_json::to_value(&payload).unwrap();
    assert_eq!(body, serde_json::json!({"estado": "Confirmada"}));
  }
}
