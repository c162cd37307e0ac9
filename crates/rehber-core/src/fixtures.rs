//! Shared test data.

use std::sync::Arc;

use crate::{
  contact::{Contact, ContactInfo},
  memory::MemoryStore,
  service::ContactService,
};

/// Ids of the three seeded contacts, in insertion order.
pub struct Seeded {
  pub service: ContactService<MemoryStore>,
  pub ids:     [i64; 3],
}

pub async fn service() -> ContactService<MemoryStore> {
  ContactService::new(Arc::new(MemoryStore::new()))
}

/// Three contacts. The first has two entries at "Hatay" (one saved), the
/// second one saved entry at "Hatay", the third only an entry at "Adana".
pub async fn hatay() -> Seeded {
  let service = service().await;

  let mut ids = [0; 3];
  for (slot, (first, last, company)) in ids.iter_mut().zip([
    ("Jhon", "Doe", "Corp"),
    ("Jhon1", "Doe1", "Corp1"),
    ("Jhon2", "Doe2", "Corp2"),
  ]) {
    let contact = service
      .add_contact(Contact::new(first, last).with_company(company))
      .await
      .unwrap();
    *slot = contact.id;
  }

  for info in [
    ContactInfo::new(ids[0], "+90 555 000 0001", "Hatay", true),
    ContactInfo::new(ids[0], "+90 555 000 0002", "Hatay", false),
    ContactInfo::new(ids[1], "+90 555 000 0003", "Hatay", true),
    ContactInfo::new(ids[2], "Kuruköprü Mah.", "Adana", false),
  ] {
    service.add_contact_info(info).await.unwrap();
  }

  Seeded { service, ids }
}
