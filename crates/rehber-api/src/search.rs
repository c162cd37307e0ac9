//! Handlers for `GET /contacts/search` and `GET /contacts/report`.
//!
//! Search params become an [`InfoFilter`]; every given param must hold for
//! the same info entry. With no params, every contact owning at least one
//! info entry is returned.

use axum::{Json, extract::State};
use rehber_core::{
  contact::Contact,
  filter::InfoFilter,
  report::ContactReport,
  repository::DirectoryStore,
  service::ContactService,
};
use serde::Deserialize;

use crate::{error::ApiError, extract::ApiQuery};

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  /// Exact, case-sensitive location.
  pub location:    Option<String>,
  /// Case-sensitive substring of the info's `information`.
  pub information: Option<String>,
  pub saved:       Option<bool>,
}

impl SearchParams {
  pub fn to_filter(&self) -> InfoFilter {
    let mut filters = Vec::new();
    if let Some(location) = &self.location {
      filters.push(InfoFilter::location(location.as_str()));
    }
    if let Some(text) = &self.information {
      filters.push(InfoFilter::information_contains(text.as_str()));
    }
    if let Some(saved) = self.saved {
      filters.push(InfoFilter::Saved(saved));
    }
    InfoFilter::All(filters)
  }
}

/// `GET /contacts/search[?location=...][&information=...][&saved=true|false]`
pub async fn handler<S: DirectoryStore>(
  State(service): State<ContactService<S>>,
  ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<Json<Vec<Contact>>, ApiError> {
  let contacts = service.find_by_contact_info(&params.to_filter()).await?;
  Ok(Json(contacts))
}

#[derive(Debug, Deserialize, Default)]
pub struct ReportParams {
  pub location: Option<String>,
}

/// `GET /contacts/report?location=...`; 400 on a blank or missing location.
pub async fn report<S: DirectoryStore>(
  State(service): State<ContactService<S>>,
  ApiQuery(params): ApiQuery<ReportParams>,
) -> Result<Json<ContactReport>, ApiError> {
  let location = params.location.unwrap_or_default();
  Ok(Json(service.get_report_data(&location).await?))
}
