//! JSON REST API for Rehber.
//!
//! Exposes an axum [`Router`] backed by any [`DirectoryStore`]. Auth, TLS,
//! and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", rehber_api::api_router(store.clone()))
//! ```

pub mod contact_infos;
pub mod contacts;
pub mod error;
pub mod extract;
pub mod search;

use std::sync::Arc;

use axum::{Router, routing::get};
use rehber_core::{repository::DirectoryStore, service::ContactService};

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S: DirectoryStore>(store: Arc<S>) -> Router<()> {
  Router::new()
    // Contacts
    .route("/contacts", get(contacts::list::<S>).post(contacts::create_or_update::<S>))
    .route("/contacts/search", get(search::handler::<S>))
    .route("/contacts/report", get(search::report::<S>))
    .route(
      "/contacts/{id}",
      get(contacts::get_one::<S>)
        .put(contacts::update_one::<S>)
        .delete(contacts::delete_one::<S>),
    )
    // Contact infos
    .route(
      "/contact-infos",
      get(contact_infos::list::<S>).post(contact_infos::create_or_update::<S>),
    )
    .route(
      "/contact-infos/{id}",
      get(contact_infos::get_one::<S>)
        .put(contact_infos::update_one::<S>)
        .delete(contact_infos::delete_one::<S>),
    )
    .with_state(ContactService::new(store))
}
