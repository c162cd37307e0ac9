//! Service-level tests against [`MemoryStore`](crate::memory::MemoryStore).

use crate::{
  Error, ErrorKind,
  contact::{Contact, ContactInfo},
  filter::{InfoField, InfoFilter},
  fixtures::{hatay, service},
  report::ContactReport,
};

// ─── Contacts ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_assigns_ids_and_get_returns_same() {
  let s = service().await;

  let a = s.add_contact(Contact::new("Jhon", "Doe")).await.unwrap();
  let b = s.add_contact(Contact::new("Jhon1", "Doe1")).await.unwrap();
  assert_ne!(a.id, 0);
  assert_ne!(a.id, b.id);

  let first = s.get_contact_by_id(a.id).await.unwrap();
  let second = s.get_contact_by_id(a.id).await.unwrap();
  assert_eq!(first, Some(a));
  assert_eq!(first, second);
}

#[tokio::test]
async fn get_missing_contact_is_none() {
  let s = service().await;
  assert!(s.get_contact_by_id(42).await.unwrap().is_none());
}

#[tokio::test]
async fn add_rejects_invalid_or_preassigned() {
  let s = service().await;

  let err = s.add_contact(Contact::default()).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Validation);

  let mut with_id = Contact::new("Jhon", "Doe");
  with_id.id = 9;
  let err = s.add_contact(with_id).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn update_preserves_identity() {
  let seeded = hatay().await;
  let s = &seeded.service;
  let id = seeded.ids[0];

  let mut contact = s.get_contact_by_id(id).await.unwrap().unwrap();
  contact.company = Some("NewComp".into());
  let updated = s.update_contact(contact).await.unwrap();
  assert_eq!(updated.id, id);

  let fetched = s.get_contact_by_id(id).await.unwrap().unwrap();
  assert_eq!(fetched.company.as_deref(), Some("NewComp"));
  assert_eq!(fetched.infos.len(), 2);
}

#[tokio::test]
async fn update_missing_contact_is_not_found() {
  let s = service().await;
  let mut ghost = Contact::new("No", "One");
  ghost.id = 77;
  let err = s.update_contact(ghost).await.unwrap_err();
  assert!(matches!(err, Error::NotFound { id: 77, .. }));
}

#[tokio::test]
async fn create_or_update_dispatches_on_id() {
  let s = service().await;

  let created = s
    .create_or_update_contact(Contact::new("Jhon", "Doe"))
    .await
    .unwrap();
  assert_ne!(created.id, 0);

  let mut changed = created.clone();
  changed.last_name = Some("Roe".into());
  let updated = s.create_or_update_contact(changed).await.unwrap();
  assert_eq!(updated.id, created.id);
  assert_eq!(s.get_all_contacts().await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_cascades_to_infos() {
  let seeded = hatay().await;
  let s = &seeded.service;

  s.delete_contact(seeded.ids[0]).await.unwrap();

  assert!(s.get_contact_by_id(seeded.ids[0]).await.unwrap().is_none());
  let infos = s.get_all_contact_infos().await.unwrap();
  assert!(infos.iter().all(|i| i.contact_id != seeded.ids[0]));
  assert_eq!(infos.len(), 2);

  let found = s.find_by_contact_info(&InfoFilter::location("Hatay")).await.unwrap();
  assert_eq!(found.iter().map(|c| c.id).collect::<Vec<_>>(), vec![seeded.ids[1]]);
}

#[tokio::test]
async fn delete_missing_is_an_error() {
  let s = service().await;
  let err = s.delete_contact(5).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);

  let contact = s.add_contact(Contact::new("Jhon", "Doe")).await.unwrap();
  s.delete_contact(contact.id).await.unwrap();
  let err = s.delete_contact(contact.id).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn add_contact_persists_owned_infos() {
  let s = service().await;

  let mut contact = Contact::new("Jhon", "Doe");
  contact.infos = vec![
    ContactInfo::new(0, "+90 555 000 0001", "Hatay", true),
    ContactInfo::new(0, "+90 555 000 0002", "Adana", false),
  ];
  let stored = s.add_contact(contact).await.unwrap();
  assert_eq!(stored.infos.len(), 2);
  assert!(stored.infos.iter().all(|i| i.id != 0 && i.contact_id == stored.id));

  let fetched = s.get_contact_by_id(stored.id).await.unwrap().unwrap();
  assert_eq!(fetched, stored);

  let report = s.get_report_data("Hatay").await.unwrap();
  assert_eq!(report.nearby_people_count, 1);
  assert_eq!(report.nearby_saved_phone_count, 1);
}

#[tokio::test]
async fn add_contact_with_bad_infos_writes_nothing() {
  let s = service().await;

  let mut contact = Contact::new("Jhon", "Doe");
  contact.infos = vec![ContactInfo::new(0, "555", "", true)];
  let err = s.add_contact(contact.clone()).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Validation);

  contact.infos = vec![ContactInfo::new(0, "555", "Hatay", true)];
  contact.infos[0].id = 3;
  let err = s.add_contact(contact.clone()).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Validation);

  contact.infos = vec![ContactInfo::new(8, "555", "Hatay", true)];
  let err = s.add_contact(contact).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Validation);

  assert!(s.get_all_contacts().await.unwrap().is_empty());
  assert!(s.get_all_contact_infos().await.unwrap().is_empty());
}

#[tokio::test]
async fn update_contact_upserts_infos() {
  let seeded = hatay().await;
  let s = &seeded.service;
  let id = seeded.ids[1];

  let mut contact = s.get_contact_by_id(id).await.unwrap().unwrap();
  contact.infos[0].is_saved = false;
  contact.infos.push(ContactInfo::new(0, "+90 555 000 0009", "Hatay", true));
  let updated = s.update_contact(contact).await.unwrap();

  assert_eq!(updated.infos.len(), 2);
  assert!(!updated.infos[0].is_saved);
  assert_ne!(updated.infos[1].id, 0);
  assert_eq!(updated.infos[1].contact_id, id);
  assert_eq!(s.get_contact_by_id(id).await.unwrap().unwrap(), updated);

  // Entries left out of the payload stay stored.
  let mut bare = updated.clone();
  bare.infos.clear();
  assert_eq!(s.update_contact(bare).await.unwrap().infos.len(), 2);
}

#[tokio::test]
async fn update_contact_cannot_take_foreign_or_unknown_infos() {
  let seeded = hatay().await;
  let s = &seeded.service;

  let foreign = s.get_contact_info_by_id(4).await.unwrap().unwrap();
  let mut contact = s.get_contact_by_id(seeded.ids[0]).await.unwrap().unwrap();
  contact.infos.push(ContactInfo { contact_id: 0, ..foreign });
  let err = s.update_contact(contact.clone()).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Validation);

  let mut ghost = ContactInfo::new(0, "555", "Hatay", true);
  ghost.id = 99;
  contact.infos.pop();
  contact.infos.push(ghost);
  contact.company = Some("Changed".into());
  let err = s.update_contact(contact).await.unwrap_err();
  assert!(matches!(err, Error::NotFound { entity: "contact info", id: 99 }));

  let owner = s.get_contact_info_by_id(4).await.unwrap().unwrap().contact_id;
  assert_eq!(owner, seeded.ids[2]);
  let unchanged = s.get_contact_by_id(seeded.ids[0]).await.unwrap().unwrap();
  assert_eq!(unchanged.company.as_deref(), Some("Corp"));
  assert_eq!(unchanged.infos.len(), 2);
}

// ─── Contact infos ───────────────────────────────────────────────────────────

#[tokio::test]
async fn info_for_missing_contact_is_not_found() {
  let s = service().await;
  let err = s
    .add_contact_info(ContactInfo::new(3, "555", "Hatay", true))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NotFound { entity: "contact", id: 3 }));
}

#[tokio::test]
async fn info_cannot_be_reparented() {
  let seeded = hatay().await;
  let s = &seeded.service;

  let mut info = s.get_contact_info_by_id(1).await.unwrap().unwrap();
  info.contact_id = seeded.ids[2];
  let err = s.update_contact_info(info).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn info_update_and_delete() {
  let seeded = hatay().await;
  let s = &seeded.service;

  let mut info = s.get_contact_info_by_id(4).await.unwrap().unwrap();
  info.information = "Adana".into();
  info.is_saved = true;
  let updated = s.create_or_update_contact_info(info).await.unwrap();
  assert_eq!(updated.id, 4);
  assert_eq!(
    s.get_contact_info_by_id(4).await.unwrap().unwrap().information,
    "Adana"
  );

  s.delete_contact_info(4).await.unwrap();
  assert!(s.get_contact_info_by_id(4).await.unwrap().is_none());
  let owner = s.get_contact_by_id(seeded.ids[2]).await.unwrap().unwrap();
  assert!(owner.infos.is_empty());
}

// ─── Filtered query ──────────────────────────────────────────────────────────

#[tokio::test]
async fn find_by_contact_info_is_existential_and_distinct() {
  let seeded = hatay().await;
  let s = &seeded.service;

  let hatay = s.find_by_contact_info(&InfoFilter::location("Hatay")).await.unwrap();
  assert_eq!(
    hatay.iter().map(|c| c.id).collect::<Vec<_>>(),
    vec![seeded.ids[0], seeded.ids[1]]
  );
  // Matched contacts come back with all of their infos.
  assert_eq!(hatay[0].infos.len(), 2);

  let unsaved = s.find_by_contact_info(&InfoFilter::Saved(false)).await.unwrap();
  assert_eq!(
    unsaved.iter().map(|c| c.id).collect::<Vec<_>>(),
    vec![seeded.ids[0], seeded.ids[2]]
  );

  let none = s
    .find_by_contact_info(&InfoFilter::location("Hatay").and(InfoFilter::Contains(
      InfoField::Information,
      "Mah.".into(),
    )))
    .await
    .unwrap();
  assert!(none.is_empty());
}

#[tokio::test]
async fn every_result_has_a_matching_entry() {
  let seeded = hatay().await;
  let s = &seeded.service;

  let filter = InfoFilter::Saved(true).or(InfoFilter::location("Adana"));
  let found = s.find_by_contact_info(&filter).await.unwrap();
  let all = s.get_all_contacts().await.unwrap();

  for contact in &all {
    let expected = contact.infos.iter().any(|i| filter.matches(i));
    assert_eq!(found.iter().any(|c| c.id == contact.id), expected);
  }
  let mut ids: Vec<_> = found.iter().map(|c| c.id).collect();
  ids.dedup();
  assert_eq!(ids.len(), found.len());
}

// ─── Reports ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn hatay_report() {
  let seeded = hatay().await;
  let report = seeded.service.get_report_data("Hatay").await.unwrap();
  assert_eq!(report, ContactReport {
    location:                 "Hatay".into(),
    nearby_people_count:      2,
    nearby_saved_phone_count: 2,
  });
}

#[tokio::test]
async fn unknown_location_reports_zero() {
  let seeded = hatay().await;
  let report = seeded.service.get_report_data("Nowhere").await.unwrap();
  assert_eq!(report, ContactReport::empty("Nowhere"));
}

#[tokio::test]
async fn report_is_case_sensitive() {
  let seeded = hatay().await;
  let report = seeded.service.get_report_data("hatay").await.unwrap();
  assert_eq!(report, ContactReport::empty("hatay"));
}

#[tokio::test]
async fn blank_location_is_a_validation_error() {
  let seeded = hatay().await;
  for location in ["", "   "] {
    let err = seeded.service.get_report_data(location).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
  }
}

#[tokio::test]
async fn report_follows_deletes() {
  let seeded = hatay().await;
  let s = &seeded.service;

  s.delete_contact(seeded.ids[1]).await.unwrap();
  let report = s.get_report_data("Hatay").await.unwrap();
  assert_eq!(report.nearby_people_count, 1);
  assert_eq!(report.nearby_saved_phone_count, 1);
}
