//! Handlers for `/contact-infos` endpoints.
//!
//! Same shape as [`crate::contacts`]. Moving an info to another contact is
//! rejected with 400; delete it and create a new one instead.

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use rehber_core::{
  contact::{ContactInfo, Entity as _},
  repository::DirectoryStore,
  service::ContactService,
};

use crate::{
  error::ApiError,
  extract::{ApiJson, ApiPath},
};

/// `GET /contact-infos`
pub async fn list<S: DirectoryStore>(
  State(service): State<ContactService<S>>,
) -> Result<Json<Vec<ContactInfo>>, ApiError> {
  Ok(Json(service.get_all_contact_infos().await?))
}

/// `GET /contact-infos/{id}`
pub async fn get_one<S: DirectoryStore>(
  State(service): State<ContactService<S>>,
  ApiPath(id): ApiPath<i64>,
) -> Result<Json<ContactInfo>, ApiError> {
  let info = service
    .get_contact_info_by_id(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("contact info {id} not found")))?;
  Ok(Json(info))
}

/// `POST /contact-infos`: 201 when created, 200 when updated.
pub async fn create_or_update<S: DirectoryStore>(
  State(service): State<ContactService<S>>,
  ApiJson(body): ApiJson<ContactInfo>,
) -> Result<impl IntoResponse, ApiError> {
  let status = if body.is_persisted() { StatusCode::OK } else { StatusCode::CREATED };
  let info = service.create_or_update_contact_info(body).await?;
  Ok((status, Json(info)))
}

/// `PUT /contact-infos/{id}`
pub async fn update_one<S: DirectoryStore>(
  State(service): State<ContactService<S>>,
  ApiPath(id): ApiPath<i64>,
  ApiJson(mut body): ApiJson<ContactInfo>,
) -> Result<Json<ContactInfo>, ApiError> {
  body.id = id;
  Ok(Json(service.update_contact_info(body).await?))
}

/// `DELETE /contact-infos/{id}`
pub async fn delete_one<S: DirectoryStore>(
  State(service): State<ContactService<S>>,
  ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
  service.delete_contact_info(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
