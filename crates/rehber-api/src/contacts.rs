//! Handlers for `/contacts` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/contacts` | Every contact with its infos |
//! | `POST`   | `/contacts` | Create (201) when `id` is absent or 0, update otherwise |
//! | `GET`    | `/contacts/{id}` | 404 if not found |
//! | `PUT`    | `/contacts/{id}` | The path id wins over any id in the body |
//! | `DELETE` | `/contacts/{id}` | 204; also removes the contact's infos |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use rehber_core::{
  contact::{Contact, Entity as _},
  repository::DirectoryStore,
  service::ContactService,
};

use crate::{
  error::ApiError,
  extract::{ApiJson, ApiPath},
};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /contacts`
pub async fn list<S: DirectoryStore>(
  State(service): State<ContactService<S>>,
) -> Result<Json<Vec<Contact>>, ApiError> {
  Ok(Json(service.get_all_contacts().await?))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /contacts/{id}`
pub async fn get_one<S: DirectoryStore>(
  State(service): State<ContactService<S>>,
  ApiPath(id): ApiPath<i64>,
) -> Result<Json<Contact>, ApiError> {
  let contact = service
    .get_contact_by_id(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("contact {id} not found")))?;
  Ok(Json(contact))
}

// ─── Create or update ─────────────────────────────────────────────────────────

/// `POST /contacts`: 201 + the stored contact when created, 200 when updated.
pub async fn create_or_update<S: DirectoryStore>(
  State(service): State<ContactService<S>>,
  ApiJson(body): ApiJson<Contact>,
) -> Result<impl IntoResponse, ApiError> {
  let status = if body.is_persisted() { StatusCode::OK } else { StatusCode::CREATED };
  let contact = service.create_or_update_contact(body).await?;
  Ok((status, Json(contact)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /contacts/{id}`
pub async fn update_one<S: DirectoryStore>(
  State(service): State<ContactService<S>>,
  ApiPath(id): ApiPath<i64>,
  ApiJson(mut body): ApiJson<Contact>,
) -> Result<Json<Contact>, ApiError> {
  body.id = id;
  Ok(Json(service.update_contact(body).await?))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /contacts/{id}`
pub async fn delete_one<S: DirectoryStore>(
  State(service): State<ContactService<S>>,
  ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
  service.delete_contact(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
