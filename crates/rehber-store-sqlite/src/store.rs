//! [`SqliteStore`]: the SQLite implementation of the repository traits.

use std::path::Path;

use rehber_core::{
  contact::{Contact, ContactInfo, Entity},
  filter::InfoFilter,
  repository::{ContactInfoRepository, ContactRepository, Repository},
};
use rusqlite::OptionalExtension as _;
use tracing::debug;

use crate::{
  Error, Result,
  encode::{CONTACT_COLUMNS, INFO_COLUMNS, attach_infos, contact_from_row, info_from_row},
  query::Condition,
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A contact directory backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Contacts (with their infos), optionally restricted to those owning an
  /// info matching `filter`. Both reads share one transaction.
  async fn select_contacts(&self, filter: Option<&InfoFilter>) -> Result<Vec<Contact>> {
    let (where_clause, params) = match filter.map(|f| Condition::from_filter(f, "m")) {
      Some(cond) => (
        format!(
          "WHERE EXISTS (
             SELECT 1 FROM contact_infos m
             WHERE m.contact_id = c.contact_id AND {}
           )",
          cond.sql
        ),
        cond.params,
      ),
      None => (String::new(), Vec::new()),
    };

    let contacts = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let mut contacts = {
          let mut stmt = tx.prepare(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts c
             {where_clause}
             ORDER BY c.contact_id"
          ))?;
          stmt
            .query_map(rusqlite::params_from_iter(params.iter()), contact_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };

        let infos = {
          let mut stmt = tx.prepare(&format!(
            "SELECT {INFO_COLUMNS} FROM contact_infos i
             WHERE i.contact_id IN (
               SELECT c.contact_id FROM contacts c {where_clause}
             )
             ORDER BY i.contact_info_id"
          ))?;
          stmt
            .query_map(rusqlite::params_from_iter(params.iter()), info_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };

        tx.commit()?;
        attach_infos(&mut contacts, infos);
        Ok(contacts)
      })
      .await?;

    Ok(contacts)
  }
}

fn load_infos(
  conn: &rusqlite::Connection,
  contact_id: i64,
) -> rusqlite::Result<Vec<ContactInfo>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {INFO_COLUMNS} FROM contact_infos i
     WHERE i.contact_id = ?1
     ORDER BY i.contact_info_id"
  ))?;
  let infos = stmt
    .query_map(rusqlite::params![contact_id], info_from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(infos)
}

fn insert_info(
  conn: &rusqlite::Connection,
  contact_id: i64,
  info: &ContactInfo,
) -> rusqlite::Result<i64> {
  conn.execute(
    "INSERT INTO contact_infos (contact_id, information, location, is_saved)
     VALUES (?1, ?2, ?3, ?4)",
    rusqlite::params![contact_id, info.information, info.location, info.is_saved],
  )?;
  Ok(conn.last_insert_rowid())
}

fn update_info(conn: &rusqlite::Connection, info: &ContactInfo) -> rusqlite::Result<()> {
  conn.execute(
    "UPDATE contact_infos SET information = ?2, location = ?3, is_saved = ?4
     WHERE contact_info_id = ?1",
    rusqlite::params![info.id, info.information, info.location, info.is_saved],
  )?;
  Ok(())
}

fn info_owner(conn: &rusqlite::Connection, info_id: i64) -> rusqlite::Result<Option<i64>> {
  conn
    .query_row(
      "SELECT contact_id FROM contact_infos WHERE contact_info_id = ?1",
      rusqlite::params![info_id],
      |r| r.get(0),
    )
    .optional()
}

// ─── Contacts ────────────────────────────────────────────────────────────────

impl Repository<Contact> for SqliteStore {
  type Error = Error;

  async fn add(&self, mut contact: Contact) -> Result<Contact> {
    contact.validate()?;
    contact.ensure_new()?;
    for info in &contact.infos {
      info.ensure_new()?;
    }

    let row = contact.clone();
    let (id, info_ids) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO contacts (first_name, last_name, company) VALUES (?1, ?2, ?3)",
          rusqlite::params![row.first_name, row.last_name, row.company],
        )?;
        let id = tx.last_insert_rowid();
        let info_ids = row
          .infos
          .iter()
          .map(|info| insert_info(&tx, id, info))
          .collect::<rusqlite::Result<Vec<_>>>()?;
        tx.commit()?;
        Ok((id, info_ids))
      })
      .await?;

    contact.id = id;
    contact.adopt_infos();
    for (info, info_id) in contact.infos.iter_mut().zip(info_ids) {
      info.id = info_id;
    }

    debug!(contact_id = id, infos = contact.infos.len(), "sqlite: inserted contact");
    Ok(contact)
  }

  async fn get_by_id(&self, id: i64) -> Result<Option<Contact>> {
    let contact = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let contact = tx
          .query_row(
            &format!("SELECT {CONTACT_COLUMNS} FROM contacts c WHERE c.contact_id = ?1"),
            rusqlite::params![id],
            contact_from_row,
          )
          .optional()?;
        let contact = match contact {
          Some(mut c) => {
            c.infos = load_infos(&tx, id)?;
            Some(c)
          }
          None => None,
        };
        tx.commit()?;
        Ok(contact)
      })
      .await?;
    Ok(contact)
  }

  async fn get_all(&self) -> Result<Vec<Contact>> { self.select_contacts(None).await }

  async fn update(&self, mut contact: Contact) -> Result<Contact> {
    contact.validate()?;
    contact.adopt_infos();

    let id = contact.id;
    let row = contact.clone();
    // Dropping the transaction on an inner error rolls everything back.
    let infos = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE contacts SET first_name = ?2, last_name = ?3, company = ?4
           WHERE contact_id = ?1",
          rusqlite::params![id, row.first_name, row.last_name, row.company],
        )?;
        if changed == 0 {
          return Ok(Err(Error::ContactNotFound(id)));
        }

        for info in &row.infos {
          if !info.is_persisted() {
            insert_info(&tx, id, info)?;
            continue;
          }
          match info_owner(&tx, info.id)? {
            None => return Ok(Err(Error::ContactInfoNotFound(info.id))),
            Some(owner) if owner != id => {
              return Ok(Err(Error::Reparent { info_id: info.id, owner }));
            }
            Some(_) => update_info(&tx, info)?,
          }
        }

        let infos = load_infos(&tx, id)?;
        tx.commit()?;
        Ok(Ok(infos))
      })
      .await??;

    contact.infos = infos;
    debug!(contact_id = id, "sqlite: updated contact");
    Ok(contact)
  }

  async fn delete(&self, contact: &Contact) -> Result<()> {
    let id = contact.id;
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM contacts WHERE contact_id = ?1",
          rusqlite::params![id],
        )?)
      })
      .await?;

    if removed == 0 {
      return Err(Error::ContactNotFound(id));
    }
    debug!(contact_id = id, "sqlite: deleted contact and its infos");
    Ok(())
  }
}

impl ContactRepository for SqliteStore {
  async fn find_by_contact_info(&self, filter: &InfoFilter) -> Result<Vec<Contact>> {
    debug!(%filter, "sqlite: find contacts by info");
    self.select_contacts(Some(filter)).await
  }
}

// ─── Contact infos ───────────────────────────────────────────────────────────

impl Repository<ContactInfo> for SqliteStore {
  type Error = Error;

  async fn add(&self, mut info: ContactInfo) -> Result<ContactInfo> {
    info.validate()?;
    info.ensure_new()?;

    let contact_id = info.contact_id;
    let row = info.clone();
    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let owner_exists = tx
          .query_row(
            "SELECT 1 FROM contacts WHERE contact_id = ?1",
            rusqlite::params![contact_id],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !owner_exists {
          return Ok(None);
        }

        let id = insert_info(&tx, contact_id, &row)?;
        tx.commit()?;
        Ok(Some(id))
      })
      .await?;

    info.id = id.ok_or(Error::ContactNotFound(contact_id))?;
    debug!(contact_info_id = info.id, contact_id, "sqlite: inserted contact info");
    Ok(info)
  }

  async fn get_by_id(&self, id: i64) -> Result<Option<ContactInfo>> {
    let info = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {INFO_COLUMNS} FROM contact_infos i WHERE i.contact_info_id = ?1"
              ),
              rusqlite::params![id],
              info_from_row,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(info)
  }

  async fn get_all(&self) -> Result<Vec<ContactInfo>> {
    self.find_infos(&InfoFilter::All(Vec::new())).await
  }

  async fn update(&self, info: ContactInfo) -> Result<ContactInfo> {
    info.validate()?;

    let id = info.id;
    let contact_id = info.contact_id;
    let row = info.clone();
    let owner = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let owner = info_owner(&tx, id)?;
        if owner == Some(contact_id) {
          update_info(&tx, &row)?;
          tx.commit()?;
        }
        Ok(owner)
      })
      .await?;

    match owner {
      None => Err(Error::ContactInfoNotFound(id)),
      Some(owner) if owner != contact_id => {
        Err(Error::Reparent { info_id: id, owner })
      }
      Some(_) => {
        debug!(contact_info_id = id, "sqlite: updated contact info");
        Ok(info)
      }
    }
  }

  async fn delete(&self, info: &ContactInfo) -> Result<()> {
    let id = info.id;
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM contact_infos WHERE contact_info_id = ?1",
          rusqlite::params![id],
        )?)
      })
      .await?;

    if removed == 0 {
      return Err(Error::ContactInfoNotFound(id));
    }
    debug!(contact_info_id = id, "sqlite: deleted contact info");
    Ok(())
  }
}

impl ContactInfoRepository for SqliteStore {
  async fn find_infos(&self, filter: &InfoFilter) -> Result<Vec<ContactInfo>> {
    debug!(%filter, "sqlite: find infos");
    let cond = Condition::from_filter(filter, "i");

    let infos = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {INFO_COLUMNS} FROM contact_infos i
           WHERE {}
           ORDER BY i.contact_info_id",
          cond.sql
        ))?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(cond.params.iter()), info_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(infos)
  }
}
