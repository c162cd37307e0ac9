//! [`ContactService`]: the facade the transport layer talks to.
//!
//! It owns no state beyond a handle to the store. Every call is one unit of
//! work against the backend; store errors are converted into [`Error`] and
//! passed through untouched.

use std::sync::Arc;

use tracing::{debug, info};

use crate::{
  Error, Result,
  contact::{Contact, ContactInfo, Entity},
  filter::InfoFilter,
  report::{self, ContactReport},
  repository::{DirectoryStore, Repository},
};

fn store_err<E: Into<Error>>(e: E) -> Error { e.into() }

pub struct ContactService<S> {
  store: Arc<S>,
}

impl<S> Clone for ContactService<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: DirectoryStore> ContactService<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  // ── Generic plumbing ─────────────────────────────────────────────────────

  async fn get<T: Entity>(&self, id: i64) -> Result<Option<T>>
  where
    S: Repository<T>,
  {
    <S as Repository<T>>::get_by_id(&*self.store, id)
      .await
      .map_err(store_err)
  }

  async fn add<T: Entity>(&self, entity: T) -> Result<T>
  where
    S: Repository<T>,
  {
    let stored = <S as Repository<T>>::add(&*self.store, entity)
      .await
      .map_err(store_err)?;
    info!(entity = T::NAME, id = stored.id(), "added");
    Ok(stored)
  }

  async fn update<T: Entity>(&self, entity: T) -> Result<T>
  where
    S: Repository<T>,
  {
    let stored = <S as Repository<T>>::update(&*self.store, entity)
      .await
      .map_err(store_err)?;
    info!(entity = T::NAME, id = stored.id(), "updated");
    Ok(stored)
  }

  async fn delete_by_id<T: Entity>(&self, id: i64) -> Result<()>
  where
    S: Repository<T>,
  {
    let entity = self
      .get::<T>(id)
      .await?
      .ok_or(Error::NotFound { entity: T::NAME, id })?;
    <S as Repository<T>>::delete(&*self.store, &entity)
      .await
      .map_err(store_err)?;
    info!(entity = T::NAME, id, "deleted");
    Ok(())
  }

  // ── Contacts ─────────────────────────────────────────────────────────────

  pub async fn get_all_contacts(&self) -> Result<Vec<Contact>> {
    <S as Repository<Contact>>::get_all(&*self.store)
      .await
      .map_err(store_err)
  }

  pub async fn get_contact_by_id(&self, id: i64) -> Result<Option<Contact>> {
    self.get(id).await
  }

  pub async fn add_contact(&self, contact: Contact) -> Result<Contact> {
    self.add(contact).await
  }

  pub async fn update_contact(&self, contact: Contact) -> Result<Contact> {
    self.update(contact).await
  }

  /// Insert when `contact.id` is `0`, update otherwise.
  pub async fn create_or_update_contact(&self, contact: Contact) -> Result<Contact> {
    if contact.is_persisted() {
      self.update(contact).await
    } else {
      self.add(contact).await
    }
  }

  /// Delete a contact together with its info entries.
  pub async fn delete_contact(&self, id: i64) -> Result<()> {
    self.delete_by_id::<Contact>(id).await
  }

  // ── Contact infos ────────────────────────────────────────────────────────

  pub async fn get_all_contact_infos(&self) -> Result<Vec<ContactInfo>> {
    <S as Repository<ContactInfo>>::get_all(&*self.store)
      .await
      .map_err(store_err)
  }

  pub async fn get_contact_info_by_id(&self, id: i64) -> Result<Option<ContactInfo>> {
    self.get(id).await
  }

  pub async fn add_contact_info(&self, info: ContactInfo) -> Result<ContactInfo> {
    self.add(info).await
  }

  pub async fn update_contact_info(&self, info: ContactInfo) -> Result<ContactInfo> {
    self.update(info).await
  }

  /// Insert when `info.id` is `0`, update otherwise.
  pub async fn create_or_update_contact_info(
    &self,
    info: ContactInfo,
  ) -> Result<ContactInfo> {
    if info.is_persisted() {
      self.update(info).await
    } else {
      self.add(info).await
    }
  }

  pub async fn delete_contact_info(&self, id: i64) -> Result<()> {
    self.delete_by_id::<ContactInfo>(id).await
  }

  // ── Queries ──────────────────────────────────────────────────────────────

  /// Contacts owning at least one info entry that matches `filter`.
  pub async fn find_by_contact_info(&self, filter: &InfoFilter) -> Result<Vec<Contact>> {
    let contacts = self
      .store
      .find_by_contact_info(filter)
      .await
      .map_err(store_err)?;
    debug!(%filter, matched = contacts.len(), "contacts by info");
    Ok(contacts)
  }

  /// Aggregate the info entries at `location`. A location nobody is at
  /// yields a zeroed report; a blank one is a validation error.
  pub async fn get_report_data(&self, location: &str) -> Result<ContactReport> {
    report::validate_location(location)?;

    let filter = report::location_filter(location);
    let infos = self.store.find_infos(&filter).await.map_err(store_err)?;
    let report = report::aggregate(location, &infos);

    debug!(
      location,
      people = report.nearby_people_count,
      saved = report.nearby_saved_phone_count,
      "location report"
    );
    Ok(report)
  }
}
