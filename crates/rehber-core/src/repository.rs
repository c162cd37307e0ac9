//! Repository traits.
//!
//! [`Repository`] is implemented once per entity type by each storage backend
//! (`rehber-store-sqlite`, [`crate::memory::MemoryStore`]). The two extension
//! traits add the only cross-entity queries the directory needs. Higher
//! layers depend on these abstractions, not on any concrete backend.
//!
//! All methods return `Send` futures so a store can be shared behind an `Arc`
//! in a multi-threaded runtime (e.g. tokio with `axum`).

use std::future::Future;

use crate::{
  contact::{Contact, ContactInfo, Entity},
  filter::InfoFilter,
};

// ─── Generic CRUD ────────────────────────────────────────────────────────────

/// Uniform CRUD and full-scan enumeration for one entity type.
pub trait Repository<T: Entity>: Send + Sync {
  /// Backend error. Must convert into [`crate::Error`] so that not-found and
  /// validation failures keep their meaning across the boundary.
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  /// Persist a new entity and return it with its assigned id.
  ///
  /// Fails validation if required fields are missing or the entity already
  /// carries an id.
  fn add(&self, entity: T) -> impl Future<Output = Result<T, Self::Error>> + Send + '_;

  /// Returns `None` if no entity has this id.
  fn get_by_id(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<T>, Self::Error>> + Send + '_;

  /// Every stored entity. A full scan with no pagination.
  fn get_all(&self) -> impl Future<Output = Result<Vec<T>, Self::Error>> + Send + '_;

  /// Replace the stored fields of the entity with the same id. Fails with
  /// not-found if the id does not exist; the id itself never changes.
  fn update(&self, entity: T) -> impl Future<Output = Result<T, Self::Error>> + Send + '_;

  /// Remove the entity with the same id. Deleting a missing entity is an
  /// error, not a no-op.
  fn delete<'a>(
    &'a self,
    entity: &'a T,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

// ─── Relationship queries ────────────────────────────────────────────────────

pub trait ContactRepository: Repository<Contact> {
  /// Every contact owning at least one info entry matching `filter`, each
  /// exactly once, ordered by contact id.
  fn find_by_contact_info<'a>(
    &'a self,
    filter: &'a InfoFilter,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + 'a;
}

pub trait ContactInfoRepository: Repository<ContactInfo> {
  /// Every info entry matching `filter`, read as one consistent snapshot.
  fn find_infos<'a>(
    &'a self,
    filter: &'a InfoFilter,
  ) -> impl Future<Output = Result<Vec<ContactInfo>, Self::Error>> + Send + 'a;
}

/// A backend serving both entity types; what [`crate::service::ContactService`]
/// runs on.
pub trait DirectoryStore: ContactRepository + ContactInfoRepository + 'static {}

impl<S> DirectoryStore for S where S: ContactRepository + ContactInfoRepository + 'static {}
