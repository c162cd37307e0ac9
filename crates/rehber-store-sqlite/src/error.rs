//! Error type for `rehber-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] rehber_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("contact not found: {0}")]
  ContactNotFound(i64),

  #[error("contact info not found: {0}")]
  ContactInfoNotFound(i64),

  /// An update tried to move a contact info to another contact.
  #[error("contact info {info_id} belongs to contact {owner}; re-parenting is not allowed")]
  Reparent { info_id: i64, owner: i64 },
}

impl From<Error> for rehber_core::Error {
  fn from(e: Error) -> Self {
    use rehber_core::contact::{Contact, ContactInfo, Entity as _};

    match e {
      Error::Core(core) => core,
      Error::ContactNotFound(id) => Self::NotFound { entity: Contact::NAME, id },
      Error::ContactInfoNotFound(id) => {
        Self::NotFound { entity: ContactInfo::NAME, id }
      }
      e @ Error::Reparent { .. } => Self::Validation(e.to_string()),
      e @ Error::Database(_) => Self::Store(Box::new(e)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
