//! [`MemoryStore`]: an in-process backend with no persistence.
//!
//! Filters are evaluated with [`InfoFilter::matches`]. Every operation takes
//! the table lock once, so reads see a consistent snapshot.

use std::{
  collections::BTreeMap,
  sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use tracing::debug;

use crate::{
  Error, Result,
  contact::{Contact, ContactInfo, Entity},
  filter::{InfoFilter, contacts_matching},
  repository::{ContactInfoRepository, ContactRepository, Repository},
};

#[derive(Default)]
struct Tables {
  /// Contact rows; `infos` is always empty here and filled in on read.
  contacts:        BTreeMap<i64, Contact>,
  infos:           BTreeMap<i64, ContactInfo>,
  last_contact_id: i64,
  last_info_id:    i64,
}

impl Tables {
  fn hydrate(&self, row: &Contact) -> Contact {
    let mut contact = row.clone();
    contact.infos = self
      .infos
      .values()
      .filter(|i| i.contact_id == row.id)
      .cloned()
      .collect();
    contact
  }

  fn all_contacts(&self) -> Vec<Contact> {
    self.contacts.values().map(|row| self.hydrate(row)).collect()
  }
}

/// A directory held entirely in memory.
///
/// Cloning is cheap; clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
  tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
    self
      .tables
      .read()
      .map_err(|e| Error::Store(e.to_string().into()))
  }

  fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
    self
      .tables
      .write()
      .map_err(|e| Error::Store(e.to_string().into()))
  }
}

fn reparent_error(info_id: i64, owner: i64) -> Error {
  Error::validation(format!(
    "contact info {info_id} belongs to contact {owner}; re-parenting is not allowed"
  ))
}

// ─── Contacts ────────────────────────────────────────────────────────────────

impl Repository<Contact> for MemoryStore {
  type Error = Error;

  async fn add(&self, mut contact: Contact) -> Result<Contact> {
    contact.validate()?;
    contact.ensure_new()?;
    for info in &contact.infos {
      info.ensure_new()?;
    }

    let mut tables = self.write()?;
    tables.last_contact_id += 1;
    contact.id = tables.last_contact_id;
    contact.adopt_infos();
    for info in &mut contact.infos {
      tables.last_info_id += 1;
      info.id = tables.last_info_id;
      tables.infos.insert(info.id, info.clone());
    }
    let row = Contact { infos: Vec::new(), ..contact.clone() };
    tables.contacts.insert(contact.id, row);
    Ok(contact)
  }

  async fn get_by_id(&self, id: i64) -> Result<Option<Contact>> {
    let tables = self.read()?;
    Ok(tables.contacts.get(&id).map(|row| tables.hydrate(row)))
  }

  async fn get_all(&self) -> Result<Vec<Contact>> {
    Ok(self.read()?.all_contacts())
  }

  async fn update(&self, mut contact: Contact) -> Result<Contact> {
    contact.validate()?;
    contact.adopt_infos();

    let mut tables = self.write()?;
    if !tables.contacts.contains_key(&contact.id) {
      return Err(Error::NotFound { entity: Contact::NAME, id: contact.id });
    }
    // Check every existing entry before writing anything.
    for info in contact.infos.iter().filter(|i| i.is_persisted()) {
      match tables.infos.get(&info.id) {
        None => {
          return Err(Error::NotFound { entity: ContactInfo::NAME, id: info.id });
        }
        Some(stored) if stored.contact_id != contact.id => {
          return Err(reparent_error(info.id, stored.contact_id));
        }
        Some(_) => {}
      }
    }

    for info in &mut contact.infos {
      if !info.is_persisted() {
        tables.last_info_id += 1;
        info.id = tables.last_info_id;
      }
      tables.infos.insert(info.id, info.clone());
    }
    let row = Contact { infos: Vec::new(), ..contact.clone() };
    tables.contacts.insert(contact.id, row);
    Ok(tables.hydrate(&contact))
  }

  async fn delete(&self, contact: &Contact) -> Result<()> {
    let mut tables = self.write()?;
    if tables.contacts.remove(&contact.id).is_none() {
      return Err(Error::NotFound { entity: Contact::NAME, id: contact.id });
    }
    tables.infos.retain(|_, info| info.contact_id != contact.id);
    Ok(())
  }
}

impl ContactRepository for MemoryStore {
  async fn find_by_contact_info(&self, filter: &InfoFilter) -> Result<Vec<Contact>> {
    debug!(%filter, "memory: find contacts by info");
    let contacts = self.read()?.all_contacts();
    Ok(contacts_matching(&contacts, |info| filter.matches(info)))
  }
}

// ─── Contact infos ───────────────────────────────────────────────────────────

impl Repository<ContactInfo> for MemoryStore {
  type Error = Error;

  async fn add(&self, mut info: ContactInfo) -> Result<ContactInfo> {
    info.validate()?;
    info.ensure_new()?;

    let mut tables = self.write()?;
    if !tables.contacts.contains_key(&info.contact_id) {
      return Err(Error::NotFound { entity: Contact::NAME, id: info.contact_id });
    }
    tables.last_info_id += 1;
    info.id = tables.last_info_id;
    tables.infos.insert(info.id, info.clone());
    Ok(info)
  }

  async fn get_by_id(&self, id: i64) -> Result<Option<ContactInfo>> {
    Ok(self.read()?.infos.get(&id).cloned())
  }

  async fn get_all(&self) -> Result<Vec<ContactInfo>> {
    Ok(self.read()?.infos.values().cloned().collect())
  }

  async fn update(&self, info: ContactInfo) -> Result<ContactInfo> {
    info.validate()?;

    let mut tables = self.write()?;
    let Some(row) = tables.infos.get_mut(&info.id) else {
      return Err(Error::NotFound { entity: ContactInfo::NAME, id: info.id });
    };
    if row.contact_id != info.contact_id {
      return Err(reparent_error(info.id, row.contact_id));
    }
    *row = info.clone();
    Ok(info)
  }

  async fn delete(&self, info: &ContactInfo) -> Result<()> {
    let mut tables = self.write()?;
    if tables.infos.remove(&info.id).is_none() {
      return Err(Error::NotFound { entity: ContactInfo::NAME, id: info.id });
    }
    Ok(())
  }
}

impl ContactInfoRepository for MemoryStore {
  async fn find_infos(&self, filter: &InfoFilter) -> Result<Vec<ContactInfo>> {
    debug!(%filter, "memory: find infos");
    let tables = self.read()?;
    Ok(
      tables
        .infos
        .values()
        .filter(|info| filter.matches(info))
        .cloned()
        .collect(),
    )
  }
}
