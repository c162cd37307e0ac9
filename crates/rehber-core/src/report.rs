//! Location reports.
//!
//! Location matching is exact: case-sensitive and untrimmed. `"Hatay"`,
//! `"hatay"` and `"Hatay "` are three different locations. A blank location
//! is rejected rather than reported on.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  contact::ContactInfo,
  filter::InfoFilter,
};

/// Per-location aggregate, computed fresh for every query and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactReport {
  pub location:                 String,
  /// Distinct contacts with at least one entry at `location`.
  pub nearby_people_count:      usize,
  /// Entries at `location` flagged as saved. Counts entries, not contacts.
  pub nearby_saved_phone_count: usize,
}

impl ContactReport {
  pub fn empty(location: impl Into<String>) -> Self {
    Self {
      location:                 location.into(),
      nearby_people_count:      0,
      nearby_saved_phone_count: 0,
    }
  }
}

pub fn validate_location(location: &str) -> Result<()> {
  if location.trim().is_empty() {
    return Err(Error::validation("location must not be blank"));
  }
  Ok(())
}

/// The selection a store must run to feed [`aggregate`].
pub fn location_filter(location: &str) -> InfoFilter {
  InfoFilter::location(location)
}

/// Fold the entries at `location` into a [`ContactReport`]. Entries for other
/// locations are ignored, so callers may pass a superset.
pub fn aggregate<'a, I>(location: &str, infos: I) -> ContactReport
where
  I: IntoIterator<Item = &'a ContactInfo>,
{
  let mut people = HashSet::new();
  let mut saved = 0;

  for info in infos.into_iter().filter(|i| i.location == location) {
    people.insert(info.contact_id);
    if info.is_saved {
      saved += 1;
    }
  }

  ContactReport {
    location:                 location.to_owned(),
    nearby_people_count:      people.len(),
    nearby_saved_phone_count: saved,
  }
}
