//! Entity types: contacts and the contact-info entries they own.
//!
//! Identity is an integer assigned by the store. An id of `0` marks an entity
//! that has not been persisted yet.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Entity ──────────────────────────────────────────────────────────────────

/// Common surface of every type a [`Repository`](crate::repository::Repository)
/// can hold.
pub trait Entity: Clone + Send + Sync + 'static {
  /// Human-readable entity name used in error messages.
  const NAME: &'static str;

  fn id(&self) -> i64;

  /// Check that required fields are present. Called by stores before any
  /// write.
  fn validate(&self) -> Result<()>;

  fn is_persisted(&self) -> bool { self.id() != 0 }

  /// Fails validation if the entity already carries an id. Stores call this
  /// before inserting.
  fn ensure_new(&self) -> Result<()> {
    if self.is_persisted() {
      return Err(Error::validation(format!(
        "new {} must not carry an id (got {})",
        Self::NAME,
        self.id()
      )));
    }
    Ok(())
  }
}

fn is_blank(value: Option<&str>) -> bool {
  value.is_none_or(|v| v.trim().is_empty())
}

// ─── Contact ─────────────────────────────────────────────────────────────────

/// A person record. Owns its [`ContactInfo`] entries exclusively; deleting
/// the contact deletes them too.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
  #[serde(default)]
  pub id:         i64,
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub company:    Option<String>,
  /// Populated by the store on every read, ordered by info id. On `add`
  /// every entry is inserted with the contact; on `update` new entries are
  /// inserted and existing ones rewritten. Stored entries missing from the
  /// list are left alone.
  #[serde(default)]
  pub infos:      Vec<ContactInfo>,
}

impl Contact {
  /// An unpersisted contact with a first and last name.
  pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
    Self {
      first_name: Some(first_name.into()),
      last_name: Some(last_name.into()),
      ..Self::default()
    }
  }

  pub fn with_company(mut self, company: impl Into<String>) -> Self {
    self.company = Some(company.into());
    self
  }

  /// Point every owned info entry at this contact.
  pub fn adopt_infos(&mut self) {
    for info in &mut self.infos {
      info.contact_id = self.id;
    }
  }
}

impl Entity for Contact {
  const NAME: &'static str = "contact";

  fn id(&self) -> i64 { self.id }

  fn validate(&self) -> Result<()> {
    if is_blank(self.first_name.as_deref()) && is_blank(self.last_name.as_deref()) {
      return Err(Error::validation("contact needs a first or last name"));
    }
    for info in &self.infos {
      if info.contact_id != 0 && info.contact_id != self.id {
        return Err(Error::validation(format!(
          "contact info {} belongs to contact {}, not {}",
          info.id, info.contact_id, self.id
        )));
      }
      info.check_fields()?;
    }
    Ok(())
  }
}

// ─── ContactInfo ─────────────────────────────────────────────────────────────

/// A single piece of contact data (phone number, address, ...) tagged with a
/// location. Belongs to exactly one contact for its whole life.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
  #[serde(default)]
  pub id:          i64,
  pub contact_id:  i64,
  pub information: String,
  /// Free-text tag; the key for location reports.
  pub location:    String,
  /// Durably retained (as opposed to transient) entry.
  #[serde(default)]
  pub is_saved:    bool,
}

impl ContactInfo {
  pub fn new(
    contact_id: i64,
    information: impl Into<String>,
    location: impl Into<String>,
    is_saved: bool,
  ) -> Self {
    Self {
      id: 0,
      contact_id,
      information: information.into(),
      location: location.into(),
      is_saved,
    }
  }

  fn check_fields(&self) -> Result<()> {
    if is_blank(Some(&self.information)) {
      return Err(Error::validation("contact info needs information"));
    }
    if is_blank(Some(&self.location)) {
      return Err(Error::validation("contact info needs a location"));
    }
    Ok(())
  }
}

impl Entity for ContactInfo {
  const NAME: &'static str = "contact info";

  fn id(&self) -> i64 { self.id }

  fn validate(&self) -> Result<()> {
    if self.contact_id <= 0 {
      return Err(Error::validation("contact info must reference a contact"));
    }
    self.check_fields()
  }
}
