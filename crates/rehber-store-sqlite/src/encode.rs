//! Mapping between SQLite rows and the domain types.
//!
//! Every `SELECT` goes through the column lists below so the row mappers can
//! read by position.

use rehber_core::contact::{Contact, ContactInfo};
use rusqlite::Row;

/// Columns read by [`contact_from_row`], qualified with the `c` alias.
pub const CONTACT_COLUMNS: &str = "c.contact_id, c.first_name, c.last_name, c.company";

/// Columns read by [`info_from_row`], qualified with the `i` alias.
pub const INFO_COLUMNS: &str =
  "i.contact_info_id, i.contact_id, i.information, i.location, i.is_saved";

/// A contact row; `infos` is left empty for the caller to attach.
pub fn contact_from_row(row: &Row<'_>) -> rusqlite::Result<Contact> {
  Ok(Contact {
    id:         row.get(0)?,
    first_name: row.get(1)?,
    last_name:  row.get(2)?,
    company:    row.get(3)?,
    infos:      Vec::new(),
  })
}

pub fn info_from_row(row: &Row<'_>) -> rusqlite::Result<ContactInfo> {
  Ok(ContactInfo {
    id:          row.get(0)?,
    contact_id:  row.get(1)?,
    information: row.get(2)?,
    location:    row.get(3)?,
    is_saved:    row.get(4)?,
  })
}

/// Distribute `infos` onto their owners. Both slices are expected in id
/// order; infos whose owner is not in `contacts` are dropped.
pub fn attach_infos(contacts: &mut [Contact], infos: Vec<ContactInfo>) {
  for info in infos {
    if let Ok(idx) = contacts.binary_search_by_key(&info.contact_id, |c| c.id) {
      contacts[idx].infos.push(info);
    }
  }
}
