//! Filters over [`ContactInfo`] entries.
//!
//! An [`InfoFilter`] is a small boolean expression tree built from enumerated
//! comparisons. It is evaluated in memory by [`InfoFilter::matches`], and
//! storage backends translate the same tree into their own query language.
//! Both evaluations must agree, so every string comparison is exact and
//! case-sensitive.

use std::fmt;

use crate::contact::{Contact, ContactInfo};

/// The string-valued [`ContactInfo`] fields a filter can compare against.
/// `as_ref()` yields the storage column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum InfoField {
  Information,
  Location,
}

impl InfoField {
  pub fn get(self, info: &ContactInfo) -> &str {
    match self {
      Self::Information => &info.information,
      Self::Location => &info.location,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfoFilter {
  Eq(InfoField, String),
  Contains(InfoField, String),
  StartsWith(InfoField, String),
  Saved(bool),
  ContactId(i64),
  /// Conjunction; an empty list matches everything.
  All(Vec<InfoFilter>),
  /// Disjunction; an empty list matches nothing.
  Any(Vec<InfoFilter>),
  Not(Box<InfoFilter>),
}

impl InfoFilter {
  pub fn location(location: impl Into<String>) -> Self {
    Self::Eq(InfoField::Location, location.into())
  }

  pub fn information_contains(text: impl Into<String>) -> Self {
    Self::Contains(InfoField::Information, text.into())
  }

  pub fn and(self, other: InfoFilter) -> Self {
    match self {
      Self::All(mut filters) => {
        filters.push(other);
        Self::All(filters)
      }
      this => Self::All(vec![this, other]),
    }
  }

  pub fn or(self, other: InfoFilter) -> Self {
    match self {
      Self::Any(mut filters) => {
        filters.push(other);
        Self::Any(filters)
      }
      this => Self::Any(vec![this, other]),
    }
  }

  pub fn negate(self) -> Self { Self::Not(Box::new(self)) }

  pub fn matches(&self, info: &ContactInfo) -> bool {
    match self {
      Self::Eq(field, value) => field.get(info) == value,
      Self::Contains(field, value) => field.get(info).contains(value.as_str()),
      Self::StartsWith(field, value) => {
        field.get(info).starts_with(value.as_str())
      }
      Self::Saved(saved) => info.is_saved == *saved,
      Self::ContactId(id) => info.contact_id == *id,
      Self::All(filters) => filters.iter().all(|f| f.matches(info)),
      Self::Any(filters) => filters.iter().any(|f| f.matches(info)),
      Self::Not(filter) => !filter.matches(info),
    }
  }
}

impl fmt::Display for InfoFilter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fn join(
      f: &mut fmt::Formatter<'_>,
      filters: &[InfoFilter],
      op: &str,
      empty: &str,
    ) -> fmt::Result {
      if filters.is_empty() {
        return f.write_str(empty);
      }
      f.write_str("(")?;
      for (i, filter) in filters.iter().enumerate() {
        if i > 0 {
          write!(f, " {op} ")?;
        }
        write!(f, "{filter}")?;
      }
      f.write_str(")")
    }

    match self {
      Self::Eq(field, value) => write!(f, "{field} = {value:?}"),
      Self::Contains(field, value) => write!(f, "{field} contains {value:?}"),
      Self::StartsWith(field, value) => {
        write!(f, "{field} starts with {value:?}")
      }
      Self::Saved(saved) => write!(f, "is_saved = {saved}"),
      Self::ContactId(id) => write!(f, "contact_id = {id}"),
      Self::All(filters) => join(f, filters, "and", "true"),
      Self::Any(filters) => join(f, filters, "or", "false"),
      Self::Not(filter) => write!(f, "not {filter}"),
    }
  }
}

/// In-memory existential scan: every contact owning at least one info entry
/// for which `predicate` holds. Each contact is yielded at most once, in
/// input order.
pub fn contacts_matching<'a, I, P>(contacts: I, predicate: P) -> Vec<Contact>
where
  I: IntoIterator<Item = &'a Contact>,
  P: Fn(&ContactInfo) -> bool,
{
  contacts
    .into_iter()
    .filter(|contact| contact.infos.iter().any(&predicate))
    .cloned()
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn info(information: &str, location: &str, is_saved: bool) -> ContactInfo {
    ContactInfo::new(7, information, location, is_saved)
  }

  #[test]
  fn string_comparisons_are_case_sensitive() {
    let entry = info("+90 555 0100", "Hatay", true);

    assert!(InfoFilter::location("Hatay").matches(&entry));
    assert!(!InfoFilter::location("hatay").matches(&entry));
    assert!(!InfoFilter::location("Hatay ").matches(&entry));
    assert!(InfoFilter::information_contains("555").matches(&entry));
    assert!(
      InfoFilter::StartsWith(InfoField::Information, "+90".into()).matches(&entry)
    );
    assert!(
      !InfoFilter::StartsWith(InfoField::Location, "hat".into()).matches(&entry)
    );
  }

  #[test]
  fn combinators() {
    let entry = info("555-0100", "Adana", false);

    assert!(InfoFilter::All(vec![]).matches(&entry));
    assert!(!InfoFilter::Any(vec![]).matches(&entry));

    let saved_in_adana = InfoFilter::location("Adana").and(InfoFilter::Saved(true));
    assert!(!saved_in_adana.matches(&entry));
    assert!(saved_in_adana.clone().negate().matches(&entry));

    let either = InfoFilter::location("Hatay").or(InfoFilter::ContactId(7));
    assert!(either.matches(&entry));
  }

  #[test]
  fn and_flattens_into_one_conjunction() {
    let filter = InfoFilter::location("Hatay")
      .and(InfoFilter::Saved(true))
      .and(InfoFilter::ContactId(1));
    assert!(matches!(&filter, InfoFilter::All(fs) if fs.len() == 3));
  }

  #[test]
  fn display_renders_readable_expression() {
    let filter = InfoFilter::location("Hatay")
      .and(InfoFilter::Saved(true).negate());
    assert_eq!(
      filter.to_string(),
      r#"(location = "Hatay" and not is_saved = true)"#
    );
    assert_eq!(InfoFilter::Any(vec![]).to_string(), "false");
  }

  #[test]
  fn contacts_matching_is_existential() {
    let mut a = Contact::new("Jhon", "Doe");
    a.id = 1;
    a.infos = vec![info("1", "Hatay", true), info("2", "Hatay", false)];
    let mut b = Contact::new("Jhon1", "Doe1");
    b.id = 2;
    b.infos = vec![info("3", "Adana", true)];
    let mut c = Contact::new("Jhon2", "Doe2");
    c.id = 3;

    let found = contacts_matching([&a, &b, &c], |i| i.location == "Hatay");
    assert_eq!(found.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1]);

    let saved = contacts_matching([&a, &b, &c], |i| i.is_saved);
    assert_eq!(saved.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 2]);

    assert!(contacts_matching([&a, &b, &c], |_| false).is_empty());
  }
}
